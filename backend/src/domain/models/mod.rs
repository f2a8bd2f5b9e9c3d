pub mod cargo_movement;

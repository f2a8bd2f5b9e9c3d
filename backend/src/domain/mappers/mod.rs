pub mod cargo_movement_mapper;

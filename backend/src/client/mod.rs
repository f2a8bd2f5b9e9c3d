//! Outbound clients for sibling services.

pub mod cargo_client;

pub use cargo_client::{CargoClient, HttpCargoClient};

//! # Storage Module
//!
//! Persists cargo movements. The domain layer only sees the traits in
//! [`traits`]; the SQLite implementation lives behind [`DbConnection`].
//!
//! ## Layout
//!
//! One `cargo_movements` table keyed by a generated identity, with a secondary
//! index on `(cargo_id, movement_date)` for per-cargo listing newest first.
//! Dates are stored as RFC 3339 UTC text with millisecond precision, so text
//! ordering matches time ordering.

pub mod cargo_movement_repository;
pub mod connection;
pub mod traits;

pub use cargo_movement_repository::CargoMovementRepository;
pub use connection::DbConnection;
pub use traits::{CargoMovementStorage, Connection};

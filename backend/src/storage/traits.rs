//! # Storage Traits
//!
//! Storage abstraction used by the domain layer, so services can run against
//! SQLite in production and against stubs in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::cargo_movement::{
    CargoMovementCount, CargoMovementDocument, NewCargoMovement,
};

/// Trait defining the interface for cargo movement storage operations
#[async_trait]
pub trait CargoMovementStorage: Send + Sync {
    /// Store a new movement and return it as persisted, identity included
    async fn store_cargo_movement(&self, movement: &NewCargoMovement) -> Result<CargoMovementDocument>;

    /// Check whether at least one movement is recorded for the cargo
    async fn cargo_movement_exists(&self, cargo_id: &str) -> Result<bool>;

    /// List movements for a cargo ordered by movement date descending.
    /// Skips `offset` movements, then takes at most `limit`.
    async fn list_cargo_movements(
        &self,
        cargo_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<CargoMovementDocument>>;

    /// Count movements per cargo id, restricted to `cargo_ids`.
    /// Ids without any movement are not returned.
    async fn count_by_cargo_ids(&self, cargo_ids: &[String]) -> Result<Vec<CargoMovementCount>>;
}

/// Trait defining the interface for storage connections
///
/// Provides the factory for repositories so the domain layer does not depend
/// on a specific backend.
pub trait Connection: Send + Sync + Clone {
    /// The type of CargoMovementStorage this connection creates
    type CargoMovementRepository: CargoMovementStorage + Clone;

    /// Create a new cargo movement repository for this connection
    fn create_cargo_movement_repository(&self) -> Self::CargoMovementRepository;
}

#[derive(Debug, thiserror::Error)]
pub enum CargoMovementError {
    /// Persisting a new movement failed
    #[error("{0}")]
    EntityNotSaved(String),
    /// No movements are recorded for the requested cargo
    #[error("{0}")]
    EntityNotFound(String),
    /// A mandated field was absent at a conversion boundary
    #[error("Invalid input: {field} is null or undefined")]
    InvalidInput { field: &'static str },
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

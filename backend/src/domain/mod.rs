//! # Domain Module
//!
//! Business logic for cargo movements, independent of HTTP and of the storage
//! backend.
//!
//! - **cargo_movement_service**: create, list and count operations
//! - **commands**: typed inputs produced by request validation
//! - **mappers**: commands to records, stored documents to response DTOs
//! - **models**: persisted record shapes
//! - **errors**: failures surfaced to the io layer

pub mod cargo_movement_service;
pub mod commands;
pub mod errors;
pub mod mappers;
pub mod models;

pub use cargo_movement_service::CargoMovementService;
pub use errors::CargoMovementError;

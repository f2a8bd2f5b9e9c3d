//! # REST API Module
//!
//! Axum handlers, request validation and the error envelope.

pub mod cargo_movement_apis;
pub mod error;
pub mod validation;

pub use error::ApiError;

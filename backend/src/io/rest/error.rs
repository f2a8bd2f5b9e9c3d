//! # REST Error Envelope
//!
//! The only place where failures become HTTP status codes. Every body is JSON
//! with a `message` field; validation failures also carry the violations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{ErrorResponse, FieldViolation, ValidationErrorResponse};

use crate::domain::CargoMovementError;

pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{} invalid field(s)", .0.len())]
    Validation(Vec<FieldViolation>),
    #[error("{0}")]
    BadRequest(String),
    /// The cargo service did not confirm the cargo
    #[error("Cargo with ID {0} does not exist. Please verify the cargo ID and try again.")]
    CargoNotFound(i64),
    #[error(transparent)]
    Service(#[from] CargoMovementError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::CargoNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Service(CargoMovementError::EntityNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller
    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(_) => VALIDATION_FAILED_MESSAGE.to_string(),
            ApiError::Service(
                e @ (CargoMovementError::EntityNotFound(_) | CargoMovementError::EntityNotSaved(_)),
            ) => e.to_string(),
            ApiError::Service(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        match self {
            ApiError::Validation(violations) => {
                (status, Json(ValidationErrorResponse { message, violations })).into_response()
            }
            _ => (status, Json(ErrorResponse::new(message))).into_response(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single recorded transition of a cargo between two locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoMovementResponse {
    /// Identity generated by the store on creation
    #[serde(rename = "_id")]
    pub id: String,
    /// Identifier of the cargo owned by the cargo service
    pub cargo_id: String,
    /// When the movement happened (RFC 3339)
    pub movement_date: DateTime<Utc>,
    pub from_location: String,
    pub to_location: String,
}

/// Body of `POST /api/cargo-movement` as a client sends it. The service
/// reads the body loosely so that type errors surface as field violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoMovementRequest {
    pub cargo_id: i64,
    /// Optional date override - the service assigns one if not provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_date: Option<DateTime<Utc>>,
    pub from_location: String,
    pub to_location: String,
}

/// Body of `POST /api/cargo-movement/_counts` as a client sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoMovementCountsRequest {
    #[serde(rename = "cargosIds")]
    pub cargos_ids: Vec<String>,
}

/// Movement count per cargo id. Ids without movements are absent.
pub type CargoMovementCountsResponse = BTreeMap<String, u64>;

/// Generic error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A rejected request field and the reason it was rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error body for requests rejected by validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub message: String,
    /// Violations in field declaration order
    pub violations: Vec<FieldViolation>,
}

use chrono::{DateTime, Utc};

/// A cargo movement that passed validation and is ready to be persisted.
/// The store assigns the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCargoMovement {
    pub cargo_id: String,
    pub movement_date: DateTime<Utc>,
    pub from_location: String,
    pub to_location: String,
}

/// A cargo movement as read back from the store.
///
/// Every field is optional so that rows which drifted from the expected
/// schema surface as mapping errors instead of decode panics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CargoMovementDocument {
    pub id: Option<String>,
    pub cargo_id: Option<String>,
    pub movement_date: Option<DateTime<Utc>>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
}

/// Number of movements recorded for one cargo id
#[derive(Debug, Clone, PartialEq)]
pub struct CargoMovementCount {
    pub cargo_id: String,
    pub count: u64,
}

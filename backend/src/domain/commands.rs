//! Domain-level command and query types.
//!
//! The REST layer validates the public payloads and hands these typed values
//! to the services.

pub mod cargo_movement {
    use chrono::{DateTime, Utc};

    /// Default page size when the list request does not carry one.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Input for recording a new cargo movement.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CreateCargoMovementCommand {
        pub cargo_id: i64,
        /// Assigned by the service when absent
        pub movement_date: Option<DateTime<Utc>>,
        pub from_location: String,
        pub to_location: String,
    }

    /// Query for one page of a cargo's movements, newest first.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CargoMovementListQuery {
        pub cargo_id: i64,
        /// Number of movements to take
        pub size: u32,
        /// Number of movements to skip
        pub from: u32,
    }

    impl CargoMovementListQuery {
        /// Build a query, defaulting to the first page of [`DEFAULT_PAGE_SIZE`]
        pub fn new(cargo_id: i64, size: Option<u32>, from: Option<u32>) -> Self {
            Self {
                cargo_id,
                size: size.unwrap_or(DEFAULT_PAGE_SIZE),
                from: from.unwrap_or(0),
            }
        }
    }
}

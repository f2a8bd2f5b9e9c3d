//! # Cargo Movement Service
//!
//! Records movements of cargo between locations and serves them back per
//! cargo. Cargo themselves are owned by a separate cargo service, which is
//! asked to confirm a cargo before a movement is recorded for it.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, validation, error envelope)
//!     ↓                            ↘
//! Domain Layer (services, mappers)   Client Layer (cargo service)
//!     ↓
//! Storage Layer (SQLite)
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};

use crate::client::{CargoClient, HttpCargoClient};
use crate::config::ServiceConfig;
use crate::domain::CargoMovementService;
use crate::io::rest::cargo_movement_apis;
use crate::storage::DbConnection;

/// Main application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub cargo_movement_service: CargoMovementService<DbConnection>,
    pub cargo_client: Arc<dyn CargoClient>,
}

impl AppState {
    pub fn new(
        cargo_movement_service: CargoMovementService<DbConnection>,
        cargo_client: Arc<dyn CargoClient>,
    ) -> Self {
        Self {
            cargo_movement_service,
            cargo_client,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &ServiceConfig) -> Result<AppState> {
    let root = info_span!("cargo_movement");

    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain model");
    let cargo_movement_service = CargoMovementService::new(
        Arc::new(db_conn),
        info_span!(parent: &root, "cargo_movement_service"),
    );
    let cargo_client = HttpCargoClient::new(
        &config.cargo_service_url,
        info_span!(parent: &root, "cargo_client"),
    );

    Ok(AppState::new(cargo_movement_service, Arc::new(cargo_client)))
}

/// Create the Axum router with all routes configured.
///
/// With a configured origin, CORS allows credentials from that origin only;
/// otherwise any origin is accepted without credentials.
pub fn create_router(app_state: AppState, cors_origin: Option<&str>) -> Result<Router> {
    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
    };

    Ok(Router::new()
        .nest("/api", cargo_movement_apis::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}

//! # REST API for Cargo Movements
//!
//! - `POST /api/cargo-movement` records a movement for a cargo confirmed by
//!   the cargo service
//! - `GET /api/cargo-movement?cargoId=&size=&from=` lists a cargo's movements,
//!   newest first
//! - `POST /api/cargo-movement/_counts` counts movements per cargo id

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use shared::{CargoMovementCountsResponse, CargoMovementResponse};
use tracing::{error, info, warn};

use crate::io::rest::error::ApiError;
use crate::io::rest::validation::{
    parse_cargo_ids, validate_cargo_movement_list_request, validate_cargo_movement_request,
    CargoMovementListParams, CargoMovementPayload,
};
use crate::AppState;

pub const INVALID_CARGO_IDS_MESSAGE: &str = "Invalid or missing cargoIds";

/// Create a router for cargo movement APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/cargo-movement",
            get(list_cargo_movements).post(create_cargo_movement),
        )
        .route("/cargo-movement/_counts", post(count_cargo_movements))
}

/// Save a new cargo movement
pub async fn create_cargo_movement(
    State(state): State<AppState>,
    payload: Result<Json<CargoMovementPayload>, JsonRejection>,
) -> Response {
    info!("POST /api/cargo-movement");

    match save_cargo_movement(&state, payload).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => failure("Error in creating CargoMovement", e),
    }
}

async fn save_cargo_movement(
    state: &AppState,
    payload: Result<Json<CargoMovementPayload>, JsonRejection>,
) -> Result<CargoMovementResponse, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let command = validate_cargo_movement_request(&payload).map_err(ApiError::Validation)?;

    if !state.cargo_client.cargo_exists(command.cargo_id).await {
        return Err(ApiError::CargoNotFound(command.cargo_id));
    }

    Ok(state.cargo_movement_service.create_cargo_movement(command).await?)
}

/// Get one page of a cargo's movements
pub async fn list_cargo_movements(
    State(state): State<AppState>,
    params: Result<Query<CargoMovementListParams>, QueryRejection>,
) -> Response {
    info!("GET /api/cargo-movement - query: {:?}", params.as_ref().ok().map(|q| &q.0));

    match fetch_cargo_movements(&state, params).await {
        Ok(movements) => (StatusCode::OK, Json(movements)).into_response(),
        Err(e) => failure("Error fetching CargoMovementList", e),
    }
}

async fn fetch_cargo_movements(
    state: &AppState,
    params: Result<Query<CargoMovementListParams>, QueryRejection>,
) -> Result<Vec<CargoMovementResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let query = validate_cargo_movement_list_request(&params).map_err(ApiError::Validation)?;

    Ok(state.cargo_movement_service.list_cargo_movements(query).await?)
}

/// Count movements per cargo id
pub async fn count_cargo_movements(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    info!("POST /api/cargo-movement/_counts");

    match fetch_counts(&state, body).await {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(e) => failure("Error fetching CargoMovement count per cargo Id", e),
    }
}

async fn fetch_counts(
    state: &AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<CargoMovementCountsResponse, ApiError> {
    let cargo_ids = body
        .ok()
        .and_then(|Json(body)| parse_cargo_ids(&body))
        .ok_or_else(|| ApiError::BadRequest(INVALID_CARGO_IDS_MESSAGE.to_string()))?;

    Ok(state.cargo_movement_service.count_by_cargo_ids(&cargo_ids).await?)
}

/// Log a failed request and render its error envelope
fn failure(context: &str, e: ApiError) -> Response {
    if e.status().is_server_error() {
        error!(error = ?e, "{}", context);
    } else {
        warn!("{}: {}", context, e);
    }
    e.into_response()
}

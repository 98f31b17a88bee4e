//! HTTP API for gate address lookups
//!
//! Endpoints:
//! - GET /rest/locate_id/:base/:galaxy/:sgaddress - Where does an address lead
//! - GET /rest/locate_loc/:base/:galaxy/:sglocation - Which address reaches a location
//! - GET /health - Health check

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::core::resolver::AddressResolver;
use crate::error::LookupError;
use crate::types::LocationData;

/// App state
pub struct AppState {
    pub resolver: Arc<dyn AddressResolver>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Lookup failure mapped onto a status code
#[derive(Debug)]
pub struct ApiError(LookupError);

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LookupError::NotFound(_) => StatusCode::NOT_FOUND,
            LookupError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the API router
pub fn create_router(resolver: Arc<dyn AddressResolver>) -> Router {
    let state = Arc::new(AppState { resolver });

    Router::new()
        .route("/health", get(health))
        .route("/rest/locate_id/:base/:galaxy/:sgaddress", get(locate_by_address))
        .route("/rest/locate_loc/:base/:galaxy/:sglocation", get(locate_by_location))
        .with_state(state)
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Resolve a dialed address
async fn locate_by_address(
    State(state): State<Arc<AppState>>,
    Path((base, galaxy, address)): Path<(u32, String, String)>,
) -> Result<Json<LocationData>, ApiError> {
    let found = state
        .resolver
        .lookup_dialed_target(&address, base, &galaxy)
        .await
        .map_err(|err| {
            tracing::debug!(%address, base, %galaxy, error = %err, "address lookup failed");
            err
        })?;
    Ok(Json(found))
}

/// Resolve the address of a gate location
async fn locate_by_location(
    State(state): State<Arc<AppState>>,
    Path((base, galaxy, location)): Path<(u32, String, String)>,
) -> Result<Json<LocationData>, ApiError> {
    let found = state
        .resolver
        .lookup_gate_address(&location, base, &galaxy)
        .await
        .map_err(|err| {
            tracing::debug!(%location, base, %galaxy, error = %err, "location lookup failed");
            err
        })?;
    Ok(Json(found))
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    resolver: Arc<dyn AddressResolver>,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(resolver);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "gate lookup API listening");
    tracing::info!("  GET /rest/locate_id/:base/:galaxy/:sgaddress");
    tracing::info!("  GET /rest/locate_loc/:base/:galaxy/:sglocation");
    tracing::info!("  GET /health");
    axum::serve(listener, router).await?;
    Ok(())
}

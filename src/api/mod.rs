//! REST API for rating meter data against a loaded tariff.
//!
//! Provides two endpoints:
//! - `GET /tariff`: service, units, billing period and the resolved charges
//! - `POST /bill`: rates the posted readings and returns the itemised bill

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::tariff::Tariff;

pub use types::{BillRequest, ChargeSummary, ErrorResponse, ReadingRow, TariffSummary};

/// Immutable application state shared across all request handlers.
///
/// The tariff is validated once at startup and only read afterwards, so no
/// locks are needed.
pub struct AppState {
    pub tariff: Tariff,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tariff", get(handlers::get_tariff))
        .route("/bill", post(handlers::post_bill))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}

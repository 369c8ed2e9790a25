//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::AppState;
use super::types::{BillRequest, ErrorResponse, TariffSummary};
use crate::meter::MeterSeries;
use crate::rating::{self, Bill};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn unprocessable(error: impl ToString) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Describes the loaded tariff.
///
/// `GET /tariff` → 200 + `TariffSummary` JSON
pub async fn get_tariff(State(state): State<Arc<AppState>>) -> Json<TariffSummary> {
    Json(TariffSummary::from(&state.tariff))
}

/// Rates the posted readings.
///
/// `POST /bill` → 200 + `Bill` JSON
/// `POST /bill` with unordered rows or a missing channel → 422 + `ErrorResponse`
pub async fn post_bill(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BillRequest>,
) -> Result<Json<Bill>, ApiError> {
    let rows = request
        .rows
        .into_iter()
        .map(|row| (row.datetime, row.readings));
    let series = MeterSeries::from_rows(rows).map_err(unprocessable)?;
    let bill = rating::bill(&state.tariff, &series).map_err(unprocessable)?;
    Ok(Json(bill))
}

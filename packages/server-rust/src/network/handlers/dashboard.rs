//! Aggregate statistics endpoint.

use axum::extract::State;
use axum::Json;
use agro_core::DashboardStats;

use super::AppState;
use crate::network::error::{ApiError, ErrorBody};

/// Returns the producer count and the summed total area, computed on demand.
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Totals across all producers", body = DashboardStats),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn dashboard_handler(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state.store.aggregate().await?;
    Ok(Json(stats))
}

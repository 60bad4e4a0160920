// src/routes/kpi.rs

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    Json,
};

use super::{dashboard_error, tagged, ApiError};
use crate::{models::RoiComparison, AppState};

pub async fn get_kpi(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let kpis = state.dashboard.get_kpis(&site_id).await.map_err(dashboard_error)?;
    tagged(&headers, kpis.as_ref())
}

pub async fn get_roi(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
) -> Result<Json<RoiComparison>, ApiError> {
    let roi = state.dashboard.get_roi(&site_id).await.map_err(dashboard_error)?;
    Ok(Json(roi))
}

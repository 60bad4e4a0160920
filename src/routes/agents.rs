// src/routes/agents.rs

use axum::{extract::State, http::HeaderMap, response::Response, Json};

use super::{dashboard_error, tagged, ApiError};
use crate::{
    models::{Agent, DataSource},
    AppState,
};

pub async fn list_agents(State(state): State<AppState>) -> Result<Json<Vec<Agent>>, ApiError> {
    let agents = state.dashboard.get_agents().await.map_err(dashboard_error)?;
    Ok(Json(agents))
}

pub async fn activity_log(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let log = state.dashboard.get_activity_log().await.map_err(dashboard_error)?;
    tagged(&headers, log.as_ref())
}

pub async fn data_sources(State(state): State<AppState>) -> Json<Vec<DataSource>> {
    Json(state.dashboard.get_data_sources())
}

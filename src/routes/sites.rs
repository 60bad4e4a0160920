// src/routes/sites.rs

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    Json,
};

use super::{dashboard_error, tagged, ApiError};
use crate::{models::Site, AppState};

pub async fn list_sites(State(state): State<AppState>) -> Json<Vec<Site>> {
    Json(state.dashboard.sites().to_vec())
}

// Trucks and recommendations follow the session's simulation overlay.
pub async fn get_trucks(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let simulation = state.dashboard.session().simulation;
    let trucks = state
        .dashboard
        .get_trucks(&site_id, &simulation)
        .await
        .map_err(dashboard_error)?;
    tagged(&headers, trucks.as_ref())
}

pub async fn get_docks(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let docks = state.dashboard.get_docks(&site_id).await.map_err(dashboard_error)?;
    tagged(&headers, docks.as_ref())
}

pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let simulation = state.dashboard.session().simulation;
    let recs = state
        .dashboard
        .get_recommendations(&site_id, &simulation)
        .await
        .map_err(dashboard_error)?;
    tagged(&headers, recs.as_ref())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, get, send};

    #[tokio::test]
    async fn lists_the_four_demo_sites() {
        let (app, _) = app();
        let (status, body) = get(&app, "/api/v1/sites").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body.as_array().unwrap().iter().map(|s| s["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["ulm", "giengen", "heidenheim", "stuttgart"]);
        assert_eq!(body[2]["has_time_slot_system"], false);
    }

    #[tokio::test]
    async fn trucks_serialize_with_wire_names() {
        let (app, _) = app();
        let (status, body) = get(&app, "/api/v1/sites/ulm/trucks").await;
        assert_eq!(status, StatusCode::OK);
        let first = &body[0];
        assert_eq!(first["id"], "LKW-4821");
        assert_eq!(first["status"], "approaching");
        assert_eq!(first["eta"], "08:15:00");
        assert!(first["dock_id"].is_null());
    }

    #[tokio::test]
    async fn traffic_jam_shows_in_trucks_and_recommendations() {
        let (app, _) = app();
        let (status, _) = send(&app, Method::POST, "/api/v1/simulation/start", json!({ "scenario": "traffic_jam_a8" })).await;
        assert_eq!(status, StatusCode::OK);

        let (_, trucks) = get(&app, "/api/v1/sites/ulm/trucks").await;
        let jammed = trucks.as_array().unwrap().iter().find(|t| t["id"] == "LKW-1056").unwrap();
        assert_eq!(jammed["delay_min"], 25);

        let (_, recs) = get(&app, "/api/v1/sites/ulm/recommendations").await;
        assert_eq!(recs[0]["id"], 100);
        assert_eq!(recs[0]["type"], "alert");
        assert_eq!(recs[0]["confidence"], 94);
        assert_eq!(recs[1]["impact"]["wait_time_min"], json!([10, 15]));
    }

    #[tokio::test]
    async fn procedural_site_docks() {
        let (app, _) = app();
        let (status, docks) = get(&app, "/api/v1/sites/stuttgart/docks").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(docks.as_array().unwrap().len(), 4);
        assert_eq!(docks[2]["type"], "heavy");
        assert_eq!(docks[2]["current_truck"], "LKW-1002");
    }
}

// src/routes/assignments.rs

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{dashboard_error, ApiError};
use crate::{
    dashboard::AssignmentOutcome,
    models::{DockId, TruckId},
    AppState,
};

/// The dropped truck travels with the request instead of being remembered
/// server-side between drag start and drop.
#[derive(Deserialize)]
pub struct AssignBody {
    pub truck_id: TruckId,
    pub dock_id: DockId,
}

pub async fn assign_truck(
    State(state): State<AppState>,
    Json(b): Json<AssignBody>,
) -> Result<Json<AssignmentOutcome>, ApiError> {
    let outcome = state
        .dashboard
        .assign_truck_to_dock(&b.truck_id, b.dock_id)
        .await
        .map_err(dashboard_error)?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::config::Config;
    use crate::dashboard::IntentPolicy;
    use crate::routes::test_support::{app, app_with, get, send};

    #[tokio::test]
    async fn drag_and_drop_assignment() {
        let (app, _) = app();
        get(&app, "/api/v1/sites/ulm/trucks").await;
        get(&app, "/api/v1/sites/ulm/docks").await;
        get(&app, "/api/v1/sites/ulm/kpi").await;

        let (status, outcome) =
            send(&app, Method::POST, "/api/v1/assignments", json!({ "truck_id": "LKW-3847", "dock_id": 7 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["truck_matched"], true);
        assert_eq!(outcome["kpis"]["avg_wait_time_min"], 33);

        let (_, trucks) = get(&app, "/api/v1/sites/ulm/trucks").await;
        let truck = trucks.as_array().unwrap().iter().find(|t| t["id"] == "LKW-3847").unwrap();
        assert_eq!(truck["status"], "assigned");
        assert_eq!(truck["dock_id"], 7);

        let (_, docks) = get(&app, "/api/v1/sites/ulm/docks").await;
        assert_eq!(docks[6]["status"], "reserved");
    }

    #[tokio::test]
    async fn strict_mode_maps_to_conflict() {
        let (app, _) = app_with(Config {
            latency_scale: 0.0,
            intent_policy: IntentPolicy::Strict,
            ..Config::default()
        });
        get(&app, "/api/v1/sites/ulm/trucks").await;
        get(&app, "/api/v1/sites/ulm/docks").await;

        let (status, body) =
            send(&app, Method::POST, "/api/v1/assignments", json!({ "truck_id": "LKW-3847", "dock_id": 8 })).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "dock_unavailable");

        let (status, body) =
            send(&app, Method::POST, "/api/v1/assignments", json!({ "truck_id": "LKW-0001", "dock_id": 1 })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }
}

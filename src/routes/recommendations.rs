// src/routes/recommendations.rs

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{dashboard_error, ApiError};
use crate::{
    dashboard::ApplyOutcome,
    models::{Recommendation, RecommendationId},
    AppState,
};

#[derive(Deserialize)]
pub struct ApplyBody {
    pub recommendation: Recommendation,
}

#[derive(Serialize)]
pub struct ApplyAllResp {
    pub scheduled: Vec<RecommendationId>,
    pub stagger_ms: u128,
}

pub async fn apply_recommendation(
    State(state): State<AppState>,
    Json(b): Json<ApplyBody>,
) -> Result<Json<ApplyOutcome>, ApiError> {
    let outcome = state
        .dashboard
        .apply_recommendation(&b.recommendation)
        .await
        .map_err(dashboard_error)?;
    Ok(Json(outcome))
}

/// Schedules the applications and returns right away; clients observe the
/// recommendation list shrinking as each one commits.
pub async fn apply_all(State(state): State<AppState>) -> Json<ApplyAllResp> {
    let scheduled = state.dashboard.apply_all_recommendations().await;
    Json(ApplyAllResp {
        scheduled: scheduled.iter().map(|s| s.recommendation_id).collect(),
        stagger_ms: state.dashboard.apply_stagger().as_millis(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::config::Config;
    use crate::routes::test_support::{app, app_with, get, send};

    #[tokio::test]
    async fn applying_removes_the_recommendation() {
        let (app, _) = app();
        get(&app, "/api/v1/sites/ulm/trucks").await;
        get(&app, "/api/v1/sites/ulm/docks").await;
        get(&app, "/api/v1/sites/ulm/kpi").await;
        let (_, recs) = get(&app, "/api/v1/sites/ulm/recommendations").await;
        let first = recs[0].clone();

        let (status, outcome) =
            send(&app, Method::POST, "/api/v1/recommendations/apply", json!({ "recommendation": first })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["removed"], true);
        assert_eq!(outcome["kpis"]["ramp_utilization_pct"], 75);

        let (_, left) = get(&app, "/api/v1/sites/ulm/recommendations").await;
        assert_eq!(left.as_array().unwrap().len(), 3);
        assert!(left.as_array().unwrap().iter().all(|r| r["id"] != 1));
    }

    #[tokio::test]
    async fn alerts_are_unprocessable() {
        let (app, _) = app();
        let (_, recs) = get(&app, "/api/v1/sites/ulm/recommendations").await;
        let alert = recs[3].clone();
        let (status, body) =
            send(&app, Method::POST, "/api/v1/recommendations/apply", json!({ "recommendation": alert })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "not_actionable");
    }

    #[tokio::test]
    async fn malformed_recommendations_are_rejected_before_applying() {
        let (app, _) = app();
        let (_, recs) = get(&app, "/api/v1/sites/ulm/recommendations").await;

        let mut reversed = recs[0].clone();
        reversed["impact"]["wait_time_min"] = json!([15, 10]);
        let (status, _) =
            send(&app, Method::POST, "/api/v1/recommendations/apply", json!({ "recommendation": reversed })).await;
        assert!(status.is_client_error());

        let mut overconfident = recs[0].clone();
        overconfident["confidence"] = json!(150);
        let (status, _) =
            send(&app, Method::POST, "/api/v1/recommendations/apply", json!({ "recommendation": overconfident })).await;
        assert!(status.is_client_error());

        let (_, left) = get(&app, "/api/v1/sites/ulm/recommendations").await;
        assert_eq!(left.as_array().unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn apply_all_schedules_actionable_ones() {
        let (app, dashboard) = app_with(Config { latency_scale: 0.0, ..Config::default() });
        get(&app, "/api/v1/sites/ulm/recommendations").await;

        let (status, body) = send(&app, Method::POST, "/api/v1/recommendations/apply-all", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scheduled"], json!([1, 2, 3]));
        assert_eq!(body["stagger_ms"], 600);

        tokio::time::sleep(Duration::from_millis(1300)).await;
        let left = dashboard.store().recommendations.get().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, 4);
    }
}

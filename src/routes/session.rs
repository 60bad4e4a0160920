// src/routes/session.rs

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{dashboard_error, ApiError};
use crate::{
    models::{Locale, OperatingMode, PanelPatch},
    session::Session,
    AppState,
};

#[derive(Deserialize)]
pub struct SiteBody {
    pub site_id: String,
}

#[derive(Deserialize)]
pub struct ModeBody {
    pub mode: OperatingMode,
}

#[derive(Deserialize)]
pub struct LocaleBody {
    pub locale: Locale,
}

pub async fn get_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.dashboard.session())
}

pub async fn put_site(
    State(state): State<AppState>,
    Json(b): Json<SiteBody>,
) -> Result<Json<Session>, ApiError> {
    let session = state.dashboard.select_site(&b.site_id).map_err(dashboard_error)?;
    Ok(Json(session))
}

pub async fn put_mode(State(state): State<AppState>, Json(b): Json<ModeBody>) -> Json<Session> {
    Json(state.dashboard.set_mode(b.mode))
}

pub async fn put_locale(State(state): State<AppState>, Json(b): Json<LocaleBody>) -> Json<Session> {
    Json(state.dashboard.set_locale(b.locale))
}

pub async fn patch_panels(State(state): State<AppState>, Json(b): Json<PanelPatch>) -> Json<Session> {
    Json(state.dashboard.set_panels(b))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, get, send};

    #[tokio::test]
    async fn default_session() {
        let (app, _) = app();
        let (status, body) = get(&app, "/api/v1/session").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["site"]["id"], "ulm");
        assert_eq!(body["mode"], "integrated");
        assert_eq!(body["locale"], "de");
        assert_eq!(body["simulation"]["active"], false);
        assert_eq!(body["panels"]["ai_panel"], true);
    }

    #[tokio::test]
    async fn switching_site_resets_mode() {
        let (app, _) = app();
        send(&app, Method::PUT, "/api/v1/session/mode", json!({ "mode": "standalone" })).await;

        let (status, body) = send(&app, Method::PUT, "/api/v1/session/site", json!({ "site_id": "giengen" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["site"]["id"], "giengen");
        assert_eq!(body["mode"], "integrated");

        let (status, body) = send(&app, Method::PUT, "/api/v1/session/site", json!({ "site_id": "paris" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown_site");
    }

    #[tokio::test]
    async fn panel_patch_is_partial() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::PATCH, "/api/v1/session/panels", json!({ "agents": true })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["panels"]["agents"], true);
        assert_eq!(body["panels"]["ai_panel"], true);
        assert_eq!(body["panels"]["comparison"], false);
    }

    #[tokio::test]
    async fn invalid_mode_is_rejected_by_the_extractor() {
        let (app, _) = app();
        let (status, _) = send(&app, Method::PUT, "/api/v1/session/mode", json!({ "mode": "hybrid" })).await;
        assert!(status.is_client_error());
    }
}

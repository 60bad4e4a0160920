// src/main.rs

use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod config;
mod dashboard;
mod error;
mod generator;
mod latency;
mod models;
mod routes;
mod session;
mod store;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::session::Session;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

pub fn router(state: AppState) -> Router {
    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // health
        .route("/health", get(routes::health::health))
        // sites & per-site snapshots
        .route("/api/v1/sites", get(routes::sites::list_sites))
        .route("/api/v1/sites/:site_id/trucks", get(routes::sites::get_trucks))
        .route("/api/v1/sites/:site_id/docks", get(routes::sites::get_docks))
        .route(
            "/api/v1/sites/:site_id/recommendations",
            get(routes::sites::get_recommendations),
        )
        .route("/api/v1/sites/:site_id/kpi", get(routes::kpi::get_kpi))
        .route("/api/v1/sites/:site_id/roi", get(routes::kpi::get_roi))
        // agents
        .route("/api/v1/agents", get(routes::agents::list_agents))
        .route("/api/v1/activity", get(routes::agents::activity_log))
        .route("/api/v1/data-sources", get(routes::agents::data_sources))
        // session
        .route("/api/v1/session", get(routes::session::get_session))
        .route("/api/v1/session/site", put(routes::session::put_site))
        .route("/api/v1/session/mode", put(routes::session::put_mode))
        .route("/api/v1/session/locale", put(routes::session::put_locale))
        .route("/api/v1/session/panels", patch(routes::session::patch_panels))
        // simulation
        .route("/api/v1/scenarios", get(routes::scenarios::list_scenarios))
        .route("/api/v1/simulation", get(routes::scenarios::get_simulation))
        .route("/api/v1/simulation/start", post(routes::scenarios::start_simulation))
        .route("/api/v1/simulation/stop", post(routes::scenarios::stop_simulation))
        // intents
        .route("/api/v1/assignments", post(routes::assignments::assign_truck))
        .route(
            "/api/v1/recommendations/apply",
            post(routes::recommendations::apply_recommendation),
        )
        .route(
            "/api/v1/recommendations/apply-all",
            post(routes::recommendations::apply_all),
        )
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Logs every change of the data context (site or active scenario).
fn spawn_context_logger(mut rx: watch::Receiver<Session>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut current = rx.borrow_and_update().context();
        while rx.changed().await.is_ok() {
            let next = rx.borrow_and_update().context();
            if next != current {
                tracing::info!(site = %next.site_id, scenario = ?next.scenario, "data context changed");
                current = next;
            }
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ramp_optimizer_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let dashboard = Arc::new(Dashboard::new(&config)?);
    tracing::info!(
        site = %config.default_site,
        latency_scale = config.latency_scale,
        policy = ?config.intent_policy,
        "dashboard ready"
    );

    dashboard::spawn_activity_refresh(Arc::clone(&dashboard), config.activity_refresh);
    spawn_context_logger(dashboard.subscribe());

    let app = router(AppState { dashboard });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("API listening on http://127.0.0.1:{}", config.port);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

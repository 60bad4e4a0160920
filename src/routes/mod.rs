// src/routes/mod.rs

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::DashboardError;

pub mod agents;
pub mod assignments;
pub mod health;
pub mod kpi;
pub mod recommendations;
pub mod scenarios;
pub mod session;
pub mod sites;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

// Common error mappers
pub fn dashboard_error(e: DashboardError) -> ApiError {
    if e.status().is_server_error() {
        tracing::error!(error = %e, "request failed");
    } else {
        tracing::debug!(code = e.code(), error = %e, "request rejected");
    }
    (e.status(), Json(ErrorBody { error: e.code(), message: e.to_string() }))
}

pub fn internal_error<E: std::fmt::Display>(e: E) -> ApiError {
    tracing::error!(error = %e, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { error: "internal", message: format!("internal error: {e}") }),
    )
}

/// Serializes a snapshot with a content-hash `ETag`, answering `304` when the
/// caller already holds the same body.
pub fn tagged<T: Serialize>(headers: &HeaderMap, value: &T) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(value).map_err(internal_error)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let etag = format!("\"{:x}\"", hasher.finalize());
    let etag_value = HeaderValue::from_str(&etag).map_err(internal_error)?;

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|candidate| candidate.trim() == etag));
    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag_value)]).into_response());
    }

    Ok((
        [
            (header::ETAG, etag_value),
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{HeaderMap, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::dashboard::Dashboard;
    use crate::AppState;

    pub(crate) fn app() -> (Router, Arc<Dashboard>) {
        app_with(Config { latency_scale: 0.0, ..Config::default() })
    }

    pub(crate) fn app_with(config: Config) -> (Router, Arc<Dashboard>) {
        let dashboard = Arc::new(Dashboard::new(&config).unwrap());
        let router = crate::router(AppState { dashboard: Arc::clone(&dashboard) });
        (router, dashboard)
    }

    pub(crate) async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> (StatusCode, HeaderMap, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let req = match body {
            Some(json) => req
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        // extractor rejections come back as plain text
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, headers, value)
    }

    pub(crate) async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let (status, _, value) = call(app, Method::GET, uri, None, &[]).await;
        (status, value)
    }

    pub(crate) async fn send(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, _, value) = call(app, method, uri, Some(body), &[]).await;
        (status, value)
    }
}

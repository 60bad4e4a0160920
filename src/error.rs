// src/error.rs

use axum::http::StatusCode;
use thiserror::Error;

use crate::models::{DockId, DockStatus, RecommendationId};
use crate::store::{EntityKind, QueryKey};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unknown site '{0}'")]
    UnknownSite(String),

    #[error("{kind} entry '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("dock {dock_id} is {status:?} and cannot take a truck")]
    DockUnavailable { dock_id: DockId, status: DockStatus },

    #[error("recommendation {0} does not target a truck and cannot be applied")]
    NotActionable(RecommendationId),

    #[error("session context changed while {kind} for {key:?} was in flight")]
    Superseded { kind: &'static str, key: QueryKey },
}

impl DashboardError {
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::UnknownSite(_) => "unknown_site",
            DashboardError::NotFound { .. } => "not_found",
            DashboardError::DockUnavailable { .. } => "dock_unavailable",
            DashboardError::NotActionable(_) => "not_actionable",
            DashboardError::Superseded { .. } => "superseded",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DashboardError::UnknownSite(_) | DashboardError::NotFound { .. } => StatusCode::NOT_FOUND,
            DashboardError::DockUnavailable { .. } | DashboardError::Superseded { .. } => StatusCode::CONFLICT,
            DashboardError::NotActionable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

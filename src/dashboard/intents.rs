// src/dashboard/intents.rs
//
// Assignment intents. Each one is an ordered series of independent commits,
// one per entity kind; readers may briefly see some applied and not others.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::error::DashboardError;
use crate::latency::{APPLY_DELAY_MS, ASSIGN_DELAY_MS};
use crate::models::{DockId, DockStatus, Kpis, Recommendation, RecommendationId};
use crate::store::{EntityKind, QueryKey};

use super::{Dashboard, IntentPolicy};

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentOutcome {
    pub truck_id: String,
    pub dock_id: DockId,
    pub truck_matched: bool,
    pub dock_matched: bool,
    pub kpis: Option<Kpis>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyOutcome {
    pub recommendation_id: RecommendationId,
    pub truck_matched: bool,
    pub dock_matched: bool,
    pub removed: bool,
    pub kpis: Option<Kpis>,
}

/// One staggered application started by "apply all".
pub struct ScheduledApply {
    pub recommendation_id: RecommendationId,
    pub handle: JoinHandle<Result<ApplyOutcome, DashboardError>>,
}

impl Dashboard {
    pub async fn assign_truck_to_dock(
        &self,
        truck_id: &str,
        dock_id: DockId,
    ) -> Result<AssignmentOutcome, DashboardError> {
        let mut rx = self.session.subscribe();
        let (truck_key, site_key) = {
            let s = rx.borrow_and_update();
            (s.simulation_key(), s.site_key())
        };
        self.latency.settle(ASSIGN_DELAY_MS, "assignment", &mut rx, &truck_key).await?;

        if self.policy == IntentPolicy::Strict {
            self.check_target(&truck_key, &site_key, truck_id, Some(dock_id)).await?;
        }

        let mut truck_matched = false;
        self.store
            .trucks
            .update_for(&truck_key, |trucks| {
                trucks
                    .iter()
                    .map(|t| {
                        if t.id == truck_id {
                            truck_matched = true;
                            t.assigned_to(Some(dock_id))
                        } else {
                            t.clone()
                        }
                    })
                    .collect()
            })
            .await;

        let mut dock_matched = false;
        self.store
            .docks
            .update_for(&site_key, |docks| {
                docks
                    .iter()
                    .map(|d| {
                        if d.id != dock_id {
                            return d.clone();
                        }
                        dock_matched = true;
                        if d.status != DockStatus::Free {
                            tracing::warn!(dock_id, status = ?d.status, "reserving a dock that is not free");
                        }
                        d.reserved()
                    })
                    .collect()
            })
            .await;

        let kpis = self.store.kpis.update_for(&site_key, Kpis::after_assignment).await;

        if !truck_matched || !dock_matched {
            tracing::warn!(truck_id, dock_id, truck_matched, dock_matched, "assignment referenced unknown entities");
        }
        tracing::info!(truck_id, dock_id, "truck assigned to dock");

        Ok(AssignmentOutcome {
            truck_id: truck_id.to_string(),
            dock_id,
            truck_matched,
            dock_matched,
            kpis: kpis.map(|k| *k),
        })
    }

    /// Applies the caller's copy of a recommendation; the stored list is not
    /// consulted to resolve it.
    pub async fn apply_recommendation(
        &self,
        rec: &Recommendation,
    ) -> Result<ApplyOutcome, DashboardError> {
        let (sim_key, site_key) = self.intent_keys();
        self.apply_recommendation_in(rec, &sim_key, &site_key).await
    }

    /// Applies `rec` against a context captured earlier. Fails with
    /// `Superseded` and commits nothing once that context is no longer the
    /// session's.
    async fn apply_recommendation_in(
        &self,
        rec: &Recommendation,
        sim_key: &QueryKey,
        site_key: &QueryKey,
    ) -> Result<ApplyOutcome, DashboardError> {
        let Some(truck_id) = rec.truck_id.as_deref() else {
            return Err(DashboardError::NotActionable(rec.id));
        };

        let mut rx = self.session.subscribe();
        let current = rx.borrow_and_update().covers(sim_key);
        if !current {
            tracing::debug!(recommendation_id = rec.id, key = ?sim_key, "context changed before apply");
            return Err(DashboardError::Superseded { kind: "recommendation", key: sim_key.clone() });
        }
        self.latency.settle(APPLY_DELAY_MS, "recommendation", &mut rx, sim_key).await?;

        if self.policy == IntentPolicy::Strict {
            self.check_target(sim_key, site_key, truck_id, rec.dock_id).await?;
        }

        // 1. trucks
        let mut truck_matched = false;
        self.store
            .trucks
            .update_for(sim_key, |trucks| {
                trucks
                    .iter()
                    .map(|t| {
                        if t.id == truck_id {
                            truck_matched = true;
                            t.assigned_to(rec.dock_id)
                        } else {
                            t.clone()
                        }
                    })
                    .collect()
            })
            .await;

        // 2. docks
        let mut dock_matched = false;
        if let Some(dock_id) = rec.dock_id {
            self.store
                .docks
                .update_for(site_key, |docks| {
                    docks
                        .iter()
                        .map(|d| {
                            if d.id != dock_id {
                                return d.clone();
                            }
                            dock_matched = true;
                            let mut reserved = d.reserved();
                            reserved.queue += 1;
                            reserved
                        })
                        .collect()
                })
                .await;
        }

        // 3. kpis
        let kpis = self.store.kpis.update_for(site_key, Kpis::after_recommendation).await;

        // 4. recommendation list
        let mut removed = false;
        self.store
            .recommendations
            .update_for(sim_key, |recs| {
                let kept: Vec<Recommendation> = recs.iter().filter(|r| r.id != rec.id).cloned().collect();
                removed = kept.len() < recs.len();
                kept
            })
            .await;

        if !truck_matched || (rec.dock_id.is_some() && !dock_matched) {
            tracing::warn!(recommendation_id = rec.id, truck_matched, dock_matched, "recommendation referenced unknown entities");
        }
        tracing::info!(recommendation_id = rec.id, truck_id, dock_id = ?rec.dock_id, "recommendation applied");

        Ok(ApplyOutcome {
            recommendation_id: rec.id,
            truck_matched,
            dock_matched,
            removed,
            kpis: kpis.map(|k| *k),
        })
    }

    /// Applies every actionable recommendation of the current list in order,
    /// each one `apply_stagger` after the previous one started.
    ///
    /// The whole batch is bound to the context current at the call; entries
    /// still pending after a site or scenario switch fail with `Superseded`.
    pub async fn apply_all_recommendations(self: &Arc<Self>) -> Vec<ScheduledApply> {
        let (sim_key, site_key) = self.intent_keys();
        let Some(recs) = self.store.recommendations.get_for(&sim_key).await else {
            tracing::debug!(key = ?sim_key, "no recommendations loaded, nothing to apply");
            return Vec::new();
        };

        recs.iter()
            .filter(|r| r.is_actionable())
            .enumerate()
            .map(|(i, rec)| {
                let rec = rec.clone();
                let recommendation_id = rec.id;
                let this = Arc::clone(self);
                let (sim_key, site_key) = (sim_key.clone(), site_key.clone());
                let wait = this.apply_stagger * i as u32;
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(wait).await;
                    let result = this.apply_recommendation_in(&rec, &sim_key, &site_key).await;
                    if let Err(e) = &result {
                        tracing::warn!(recommendation_id = rec.id, error = %e, "staggered apply failed");
                    }
                    result
                });
                ScheduledApply { recommendation_id, handle }
            })
            .collect()
    }

    fn intent_keys(&self) -> (QueryKey, QueryKey) {
        let s = self.session.borrow();
        (s.simulation_key(), s.site_key())
    }

    async fn check_target(
        &self,
        truck_key: &QueryKey,
        site_key: &QueryKey,
        truck_id: &str,
        dock_id: Option<DockId>,
    ) -> Result<(), DashboardError> {
        let trucks = self.store.trucks.get_for(truck_key).await.unwrap_or_default();
        if !trucks.iter().any(|t| t.id == truck_id) {
            return Err(DashboardError::NotFound { kind: EntityKind::Trucks, id: truck_id.to_string() });
        }

        let Some(dock_id) = dock_id else {
            return Ok(());
        };
        let docks = self.store.docks.get_for(site_key).await.unwrap_or_default();
        match docks.iter().find(|d| d.id == dock_id) {
            None => Err(DashboardError::NotFound { kind: EntityKind::Docks, id: dock_id.to_string() }),
            Some(d) if d.status != DockStatus::Free => {
                Err(DashboardError::DockUnavailable { dock_id, status: d.status })
            }
            Some(_) => Ok(()),
        }
    }
}

// src/dashboard/reads.rs

use std::sync::Arc;

use crate::error::DashboardError;
use crate::generator;
use crate::latency::{LIGHT_READ_DELAY_MS, READ_DELAY_MS};
use crate::models::{
    ActivityLogEntry, Agent, DataSource, Dock, Kpis, Recommendation, RoiComparison,
    SimulationState, Truck,
};
use crate::store::{QueryKey, Snapshot};

use super::Dashboard;

impl Dashboard {
    /// Returns the snapshot already committed for `key`, or waits out the
    /// simulated delay and produces one. The result is committed only if
    /// `key` is still the session's context when it arrives.
    async fn load<T, F>(
        &self,
        snapshot: &Snapshot<T>,
        key: QueryKey,
        base_ms: u64,
        generate: F,
    ) -> Result<Arc<T>, DashboardError>
    where
        F: FnOnce() -> T,
    {
        if let Some(hit) = snapshot.get_for(&key).await {
            return Ok(hit);
        }

        let mut rx = self.session.subscribe();
        self.latency.settle(base_ms, snapshot.kind().as_str(), &mut rx, &key).await?;

        let value = generate();
        let committed = snapshot
            .commit_if_absent(key, value, |key| self.session.borrow().covers(key))
            .await;
        match committed {
            Ok(value) => Ok(value),
            Err(value) => {
                tracing::debug!(kind = %snapshot.kind(), "loaded for inactive context, not committed");
                Ok(Arc::new(value))
            }
        }
    }

    pub async fn get_trucks(
        &self,
        site_id: &str,
        simulation: &SimulationState,
    ) -> Result<Arc<Vec<Truck>>, DashboardError> {
        let site = self.site(site_id)?;
        let key = QueryKey::SiteSimulation(site.id.clone(), simulation.active_scenario());
        self.load(&self.store.trucks, key, READ_DELAY_MS, || {
            generator::apply_simulation(generator::generate_initial_trucks(), simulation)
        })
        .await
    }

    pub async fn get_docks(&self, site_id: &str) -> Result<Arc<Vec<Dock>>, DashboardError> {
        let site = self.site(site_id)?;
        let key = QueryKey::Site(site.id.clone());
        self.load(&self.store.docks, key, READ_DELAY_MS, || generator::generate_docks(site))
            .await
    }

    pub async fn get_recommendations(
        &self,
        site_id: &str,
        simulation: &SimulationState,
    ) -> Result<Arc<Vec<Recommendation>>, DashboardError> {
        let site = self.site(site_id)?;
        let key = QueryKey::SiteSimulation(site.id.clone(), simulation.active_scenario());
        self.load(&self.store.recommendations, key, READ_DELAY_MS, || {
            generator::simulation_recommendations(generator::generate_recommendations(), simulation)
        })
        .await
    }

    pub async fn get_kpis(&self, site_id: &str) -> Result<Arc<Kpis>, DashboardError> {
        let site = self.site(site_id)?;
        let key = QueryKey::Site(site.id.clone());
        self.load(&self.store.kpis, key, READ_DELAY_MS, generator::generate_kpis)
            .await
    }

    pub async fn get_activity_log(&self) -> Result<Arc<Vec<ActivityLogEntry>>, DashboardError> {
        self.load(
            &self.store.activity_log,
            QueryKey::Global,
            LIGHT_READ_DELAY_MS,
            generator::generate_activity_log,
        )
        .await
    }

    /// Agents are derived from the session's mode and locale and are not stored.
    pub async fn get_agents(&self) -> Result<Vec<Agent>, DashboardError> {
        let mut rx = self.session.subscribe();
        self.latency
            .settle(LIGHT_READ_DELAY_MS, "agents", &mut rx, &QueryKey::Global)
            .await?;
        let (mode, locale) = {
            let s = rx.borrow();
            (s.mode, s.locale)
        };
        Ok(generator::generate_agents(mode, locale))
    }

    pub fn get_data_sources(&self) -> Vec<DataSource> {
        let session = self.session();
        generator::generate_data_sources(&session.site, session.mode)
    }

    pub async fn get_roi(&self, site_id: &str) -> Result<RoiComparison, DashboardError> {
        let kpis = self.get_kpis(site_id).await?;
        let site = self.site(site_id)?;
        Ok(generator::roi_comparison(site, &kpis))
    }
}

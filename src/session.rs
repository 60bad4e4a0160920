// src/session.rs
//
// The application-state object shared with the view. Only intents mutate it.

use serde::Serialize;

use crate::models::{Locale, OperatingMode, PanelVisibility, Scenario, SimulationState, Site, SiteId};
use crate::store::QueryKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub site: Site,
    pub mode: OperatingMode,
    pub locale: Locale,
    pub simulation: SimulationState,
    pub panels: PanelVisibility,
}

/// The part of the session that decides which data set is relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataContext {
    pub site_id: SiteId,
    pub scenario: Option<Scenario>,
}

impl Session {
    pub fn new(site: Site, mode: Option<OperatingMode>, locale: Locale) -> Self {
        let mode = mode.unwrap_or_else(|| site.default_mode());
        Session {
            site,
            mode,
            locale,
            simulation: SimulationState::inactive(),
            panels: PanelVisibility::default(),
        }
    }

    pub fn context(&self) -> DataContext {
        DataContext {
            site_id: self.site.id.clone(),
            scenario: self.simulation.active_scenario(),
        }
    }

    pub fn site_key(&self) -> QueryKey {
        QueryKey::Site(self.site.id.clone())
    }

    pub fn simulation_key(&self) -> QueryKey {
        QueryKey::SiteSimulation(self.site.id.clone(), self.simulation.active_scenario())
    }

    /// Whether a snapshot produced for `key` still belongs on screen.
    pub fn covers(&self, key: &QueryKey) -> bool {
        if key.site_id().is_some_and(|site| site != self.site.id) {
            return false;
        }
        match key {
            QueryKey::SiteSimulation(_, scenario) => *scenario == self.simulation.active_scenario(),
            QueryKey::Global | QueryKey::Site(_) => true,
        }
    }
}

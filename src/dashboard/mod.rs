// src/dashboard/mod.rs
//
// The dashboard service: owns the entity store and the session, answers reads
// and resolves intents into snapshot commits.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::Config;
use crate::error::DashboardError;
use crate::generator;
use crate::latency::Latency;
use crate::models::{Locale, OperatingMode, PanelPatch, Scenario, SimulationState, Site};
use crate::session::Session;
use crate::store::EntityStore;

mod intents;
mod reads;
mod refresh;

pub use intents::{ApplyOutcome, AssignmentOutcome, ScheduledApply};
pub use refresh::spawn_activity_refresh;

/// How the intent processor treats references it cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentPolicy {
    /// Unknown ids fall through as no-op commits; dock state is not checked.
    Lenient,
    /// Unknown ids and non-free docks are rejected before anything is committed.
    Strict,
}

pub struct Dashboard {
    store: EntityStore,
    session: watch::Sender<Session>,
    sites: Vec<Site>,
    latency: Latency,
    policy: IntentPolicy,
    apply_stagger: Duration,
    refresh_in_flight: AtomicBool,
}

impl Dashboard {
    pub fn new(config: &Config) -> Result<Self, DashboardError> {
        let sites = generator::demo_sites();
        let site = sites
            .iter()
            .find(|s| s.id == config.default_site)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownSite(config.default_site.clone()))?;
        let (session, _) = watch::channel(Session::new(site, config.mode_override, config.locale));

        Ok(Dashboard {
            store: EntityStore::new(),
            session,
            sites,
            latency: Latency::new(config.latency_scale),
            policy: config.intent_policy,
            apply_stagger: config.apply_stagger,
            refresh_in_flight: AtomicBool::new(false),
        })
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    pub fn apply_stagger(&self) -> Duration {
        self.apply_stagger
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, site_id: &str) -> Result<&Site, DashboardError> {
        self.sites
            .iter()
            .find(|s| s.id == site_id)
            .ok_or_else(|| DashboardError::UnknownSite(site_id.to_string()))
    }

    // ───────────────────────────────────────
    // Session intents
    // ───────────────────────────────────────

    /// Switching site also resets the operating mode to the site's default.
    pub fn select_site(&self, site_id: &str) -> Result<Session, DashboardError> {
        let site = self.site(site_id)?.clone();
        tracing::info!(site = %site.id, mode = ?site.default_mode(), "site selected");
        self.session.send_modify(|s| {
            s.mode = site.default_mode();
            s.site = site;
        });
        Ok(self.session())
    }

    pub fn set_mode(&self, mode: OperatingMode) -> Session {
        tracing::info!(?mode, "operating mode changed");
        self.session.send_modify(|s| s.mode = mode);
        self.session()
    }

    pub fn set_locale(&self, locale: Locale) -> Session {
        self.session.send_modify(|s| s.locale = locale);
        self.session()
    }

    pub fn set_panels(&self, patch: PanelPatch) -> Session {
        self.session.send_modify(|s| s.panels = s.panels.patched(patch));
        self.session()
    }

    pub fn start_simulation(&self, scenario: Scenario) -> SimulationState {
        let sim = generator::start_simulation(scenario);
        tracing::info!(?scenario, affected = sim.affected_trucks.len(), "simulation started");
        self.session.send_modify(|s| s.simulation = sim.clone());
        sim
    }

    pub fn stop_simulation(&self) -> SimulationState {
        tracing::info!("simulation stopped");
        self.session.send_modify(|s| s.simulation = SimulationState::inactive());
        SimulationState::inactive()
    }
}

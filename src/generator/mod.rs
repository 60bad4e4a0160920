// src/generator/mod.rs
//
// Stateless producers of demo data. Nothing here holds state; the dashboard
// decides what gets committed.

use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::{
    ActivityLogEntry, Agent, ConnectionStatus, DataSource, DataSourceType, Dock, DockStatus,
    DockType, Kpis, Locale, OperatingMode, Recommendation, RoiComparison, RoiMetric, Scenario,
    SimulationState, Site, Truck, TruckId,
};

pub mod canonical;

pub use canonical::CANONICAL_SITE_ID;

/// Delay added to every truck caught in the A8 traffic jam.
pub const TRAFFIC_JAM_DELAY_MIN: i32 = 25;
/// Delay every early-arrival truck is forced to.
pub const EARLY_ARRIVAL_DELAY_MIN: i32 = -45;

const DOCK_TYPE_PATTERN: [DockType; 10] = [
    DockType::Standard,
    DockType::Standard,
    DockType::Heavy,
    DockType::Cooling,
    DockType::Standard,
    DockType::Standard,
    DockType::Standard,
    DockType::Heavy,
    DockType::Standard,
    DockType::Standard,
];

const DOCK_STATUS_PATTERN: [DockStatus; 10] = [
    DockStatus::Free,
    DockStatus::Free,
    DockStatus::Occupied,
    DockStatus::Free,
    DockStatus::Maintenance,
    DockStatus::Free,
    DockStatus::Free,
    DockStatus::Occupied,
    DockStatus::Free,
    DockStatus::Free,
];

pub fn demo_sites() -> Vec<Site> {
    canonical::sites()
}

pub fn generate_initial_trucks() -> Vec<Truck> {
    canonical::trucks()
}

/// Docks for a site: the canonical site is fixed, everything else is procedural.
pub fn generate_docks(site: &Site) -> Vec<Dock> {
    if site.id == CANONICAL_SITE_ID {
        return canonical::docks();
    }
    generate_docks_with(site.dock_count, &mut rand::thread_rng())
}

pub fn generate_docks_with<R: Rng + ?Sized>(dock_count: u32, rng: &mut R) -> Vec<Dock> {
    (0..dock_count)
        .map(|i| {
            let idx = i as usize % DOCK_STATUS_PATTERN.len();
            let status = DOCK_STATUS_PATTERN[idx];
            let in_service = status != DockStatus::Maintenance;
            Dock {
                id: i + 1,
                name: format!("Dock {}", i + 1),
                dock_type: DOCK_TYPE_PATTERN[idx],
                status,
                current_truck: (status == DockStatus::Occupied).then(|| format!("LKW-{}", 1000 + i)),
                queue: if status == DockStatus::Free { rng.gen_range(0..3) } else { 0 },
                avg_time_min: in_service.then(|| rng.gen_range(20..35)),
                historical_perf_pct: in_service.then(|| rng.gen_range(5..25)),
            }
        })
        .collect()
}

pub fn generate_recommendations() -> Vec<Recommendation> {
    canonical::RECOMMENDATIONS.iter().map(|seed| seed.build()).collect()
}

pub fn generate_kpis() -> Kpis {
    canonical::KPIS
}

pub fn generate_activity_log() -> Vec<ActivityLogEntry> {
    let now = Utc::now();
    canonical::ACTIVITY
        .iter()
        .filter_map(|&(agent_id, secs_ago, message)| {
            let agent = canonical::AGENTS.iter().find(|a| a.id == agent_id)?;
            Some(ActivityLogEntry {
                id: Uuid::new_v4(),
                timestamp: now - Duration::seconds(secs_ago),
                agent_id,
                agent_name: agent.name[0].into(),
                agent_icon: agent.icon.into(),
                message: message.into(),
            })
        })
        .collect()
}

pub fn generate_agents(mode: OperatingMode, locale: Locale) -> Vec<Agent> {
    let lang = match locale {
        Locale::De => 0,
        Locale::En => 1,
    };
    canonical::AGENTS
        .iter()
        .map(|seed| {
            let task = if seed.id == 1 && mode == OperatingMode::Standalone {
                canonical::DATA_AGENT_STANDALONE_TASK[lang]
            } else {
                seed.task[lang]
            };
            Agent {
                id: seed.id,
                name: seed.name[lang].into(),
                icon: seed.icon.into(),
                status: seed.status,
                task: task.into(),
            }
        })
        .collect()
}

/// Integrated sites report one live feed per connected system; everything
/// else is fed by hand plus periodic Excel imports.
pub fn generate_data_sources(site: &Site, mode: OperatingMode) -> Vec<DataSource> {
    let now = Utc::now();
    if mode == OperatingMode::Integrated && !site.systems.is_empty() {
        return site
            .systems
            .iter()
            .map(|&system| DataSource {
                source_type: DataSourceType::from(system),
                status: ConnectionStatus::Connected,
                last_sync: Some(now),
            })
            .collect();
    }
    vec![
        DataSource {
            source_type: DataSourceType::Manual,
            status: ConnectionStatus::Connected,
            last_sync: None,
        },
        DataSource {
            source_type: DataSourceType::ExcelImport,
            status: ConnectionStatus::Connected,
            last_sync: Some(now),
        },
    ]
}

pub fn roi_comparison(site: &Site, kpis: &Kpis) -> RoiComparison {
    let baseline = canonical::KPIS;
    let row = |metric: &str, today: String, with_ai: String| RoiMetric {
        metric: metric.into(),
        today,
        with_ai,
    };
    RoiComparison {
        site_id: site.id.clone(),
        metrics: vec![
            row(
                "avg_wait_time",
                format!("{} min", baseline.avg_wait_time_min),
                format!("{} min (-{}%)", kpis.avg_wait_time_min, kpis.wait_time_reduction_pct),
            ),
            row("overtime", "regular".into(), format!("-{}%", kpis.overtime_reduction_pct)),
            row("dock_assignment", "gut_feeling".into(), "ai_optimized".into()),
            row("ramp_utilization", format!("{}%", baseline.ramp_utilization_pct), format!("{}%", kpis.ramp_utilization_pct)),
            row("monthly_cost", format!("+ €{}", baseline.monthly_savings_eur), format!("€{} saved", kpis.monthly_savings_eur)),
        ],
        yearly_potential_eur: kpis.monthly_savings_eur.saturating_mul(12),
    }
}

// ───────────────────────────────────────
// Simulation overlay
// ───────────────────────────────────────

/// Fixed truck selection per scenario.
pub fn affected_trucks(scenario: Scenario) -> Vec<TruckId> {
    let ids: &[&str] = match scenario {
        Scenario::TrafficJamA8 => &["LKW-4821", "LKW-7293", "LKW-1056"],
        Scenario::StaffAbsence => &[],
        Scenario::EarlyArrival => &["LKW-3847"],
        Scenario::PeakMonday => &["LKW-4821", "LKW-7293", "LKW-1056", "LKW-3847", "LKW-9182"],
    };
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn start_simulation(scenario: Scenario) -> SimulationState {
    SimulationState {
        active: true,
        scenario: Some(scenario),
        affected_trucks: affected_trucks(scenario),
    }
}

/// Perturbs truck delays. Staff absence and peak Monday only select trucks.
pub fn apply_simulation(trucks: Vec<Truck>, sim: &SimulationState) -> Vec<Truck> {
    let Some(scenario) = sim.active_scenario() else {
        return trucks;
    };
    trucks
        .into_iter()
        .map(|truck| {
            if !sim.affects(&truck.id) {
                return truck;
            }
            let delay_min = match scenario {
                Scenario::TrafficJamA8 => truck.delay_min + TRAFFIC_JAM_DELAY_MIN,
                Scenario::EarlyArrival => EARLY_ARRIVAL_DELAY_MIN,
                Scenario::StaffAbsence | Scenario::PeakMonday => truck.delay_min,
            };
            Truck { delay_min, ..truck }
        })
        .collect()
}

pub fn simulation_recommendations(recs: Vec<Recommendation>, sim: &SimulationState) -> Vec<Recommendation> {
    match sim.active_scenario() {
        Some(Scenario::TrafficJamA8) => {
            let mut out = Vec::with_capacity(recs.len() + 1);
            out.push(canonical::TRAFFIC_JAM_ALERT.build());
            out.extend(recs);
            out
        }
        _ => recs,
    }
}

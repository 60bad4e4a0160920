// src/models/mod.rs

use chrono::{DateTime, NaiveTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub type SiteId = String;
pub type TruckId = String;
pub type DockId = u32;
pub type RecommendationId = u32;

/// Average wait time never drops below this many minutes.
pub const WAIT_TIME_FLOOR_MIN: u32 = 18;
/// Utilization ceiling reached through manual assignments.
pub const ASSIGNMENT_UTILIZATION_CAP: u32 = 92;
/// Utilization ceiling reached through applied recommendations.
pub const RECOMMENDATION_UTILIZATION_CAP: u32 = 89;

// ───────────────────────────────────────
// Sites & operating mode
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemType {
    #[serde(rename = "cargoclix")]
    Cargoclix,
    #[serde(rename = "lfs_v8")]
    LfsV8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    Integrated,
    Standalone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    De,
    En,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub city: String,
    pub dock_count: u32,
    pub has_time_slot_system: bool,
    pub systems: Vec<SystemType>,
}

impl Site {
    /// Sites wired to an external time-slot system run integrated by default.
    pub fn default_mode(&self) -> OperatingMode {
        if self.has_time_slot_system {
            OperatingMode::Integrated
        } else {
            OperatingMode::Standalone
        }
    }
}

// ───────────────────────────────────────
// Trucks
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckStatus {
    Approaching,
    Assigned,
    Docking,
    Processing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub id: TruckId,
    pub carrier: String,
    pub eta: NaiveTime,
    pub scheduled_slot: NaiveTime,
    pub cargo: String,
    pub weight_t: u32,
    pub status: TruckStatus,
    pub delay_min: i32,            // negative = early
    pub dock_id: Option<DockId>,   // only set once assigned
}

impl Truck {
    pub fn assigned_to(&self, dock_id: Option<DockId>) -> Truck {
        Truck {
            dock_id,
            status: TruckStatus::Assigned,
            ..self.clone()
        }
    }
}

// ───────────────────────────────────────
// Docks
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockType {
    Standard,
    Heavy,
    Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockStatus {
    Free,
    Occupied,
    Reserved,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dock {
    pub id: DockId,
    pub name: String,
    #[serde(rename = "type")]
    pub dock_type: DockType,
    pub status: DockStatus,
    pub current_truck: Option<TruckId>,   // only while occupied
    pub queue: u32,
    pub avg_time_min: Option<u32>,        // None under maintenance
    pub historical_perf_pct: Option<i32>, // None under maintenance
}

impl Dock {
    /// A reserved dock has no truck at the ramp yet.
    pub fn reserved(&self) -> Dock {
        Dock {
            status: DockStatus::Reserved,
            current_truck: None,
            ..self.clone()
        }
    }
}

// ───────────────────────────────────────
// Recommendations
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Dock,
    Alert,
    Optimization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Closed `[min, max]` estimate, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)")]
pub struct ImpactRange(u32, u32);

impl TryFrom<(u32, u32)> for ImpactRange {
    type Error = String;

    fn try_from((min, max): (u32, u32)) -> Result<Self, Self::Error> {
        if min > max {
            return Err(format!("impact range [{min}, {max}] has min above max"));
        }
        Ok(ImpactRange(min, max))
    }
}

impl ImpactRange {
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b { ImpactRange(a, b) } else { ImpactRange(b, a) }
    }

    pub fn min(&self) -> u32 {
        self.0
    }

    pub fn max(&self) -> u32 {
        self.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impact {
    pub wait_time_min: ImpactRange,
    pub savings_eur: ImpactRange,
    pub co2_kg: ImpactRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: RecommendationId,
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub historical_note: String,
    #[serde(deserialize_with = "percent")]
    pub confidence: u8,
    pub impact: Impact,
    pub truck_id: Option<TruckId>,
    pub dock_id: Option<DockId>,
}

fn percent<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let value = u8::deserialize(d)?;
    if value > 100 {
        return Err(de::Error::custom(format!("confidence {value} is outside 0..=100")));
    }
    Ok(value)
}

impl Recommendation {
    /// Only recommendations that name a truck can be applied; the rest are alerts.
    pub fn is_actionable(&self) -> bool {
        self.truck_id.is_some()
    }
}

// ───────────────────────────────────────
// KPIs
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpis {
    pub avg_wait_time_min: u32,
    pub wait_time_reduction_pct: u32,
    pub ramp_utilization_pct: u32,
    pub overtime_reduction_pct: u32,
    pub monthly_savings_eur: u32,
    pub trucks_processed: u32,
}

impl Kpis {
    pub fn after_assignment(&self) -> Kpis {
        Kpis {
            avg_wait_time_min: self.avg_wait_time_min.saturating_sub(2).max(WAIT_TIME_FLOOR_MIN),
            ramp_utilization_pct: (self.ramp_utilization_pct + 2).min(ASSIGNMENT_UTILIZATION_CAP),
            ..*self
        }
    }

    /// The recommendation cap is lower than the assignment cap, so this can pull
    /// utilization back down to 89 after a run of manual assignments.
    pub fn after_recommendation(&self) -> Kpis {
        Kpis {
            avg_wait_time_min: self.avg_wait_time_min.saturating_sub(4).max(WAIT_TIME_FLOOR_MIN),
            ramp_utilization_pct: (self.ramp_utilization_pct + 3)
                .min(RECOMMENDATION_UTILIZATION_CAP),
            ..*self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiMetric {
    pub metric: String,
    pub today: String,
    pub with_ai: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiComparison {
    pub site_id: SiteId,
    pub metrics: Vec<RoiMetric>,
    pub yearly_potential_eur: u32,
}

// ───────────────────────────────────────
// Agents & activity feed
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    Processing,
    Idle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub name: String,
    pub icon: String,
    pub status: AgentStatus,
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub agent_id: u32,
    pub agent_name: String,
    pub agent_icon: String,
    pub message: String,
}

// ───────────────────────────────────────
// Data sources
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceType {
    #[serde(rename = "cargoclix")]
    Cargoclix,
    #[serde(rename = "lfs_v8")]
    LfsV8,
    #[serde(rename = "manual")]
    Manual,
    #[serde(rename = "excel_import")]
    ExcelImport,
}

impl From<SystemType> for DataSourceType {
    fn from(value: SystemType) -> Self {
        match value {
            SystemType::Cargoclix => DataSourceType::Cargoclix,
            SystemType::LfsV8 => DataSourceType::LfsV8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    // accepted on the wire; the demo feeds are always connected
    #[allow(dead_code)]
    Disconnected,
    #[allow(dead_code)]
    Syncing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(rename = "type")]
    pub source_type: DataSourceType,
    pub status: ConnectionStatus,
    pub last_sync: Option<DateTime<Utc>>,
}

// ───────────────────────────────────────
// Simulation
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "traffic_jam_a8")]
    TrafficJamA8,
    #[serde(rename = "staff_absence")]
    StaffAbsence,
    #[serde(rename = "early_arrival")]
    EarlyArrival,
    #[serde(rename = "peak_monday")]
    PeakMonday,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::TrafficJamA8,
        Scenario::StaffAbsence,
        Scenario::EarlyArrival,
        Scenario::PeakMonday,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    pub active: bool,
    pub scenario: Option<Scenario>,
    pub affected_trucks: Vec<TruckId>,
}

impl SimulationState {
    pub fn inactive() -> Self {
        SimulationState { active: false, scenario: None, affected_trucks: Vec::new() }
    }

    /// The scenario that is actually in effect, if any.
    pub fn active_scenario(&self) -> Option<Scenario> {
        if self.active { self.scenario } else { None }
    }

    pub fn affects(&self, truck_id: &str) -> bool {
        self.affected_trucks.iter().any(|t| t == truck_id)
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationState::inactive()
    }
}

// ───────────────────────────────────────
// UI panels (part of the session, toggled by the view)
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelVisibility {
    pub ai_panel: bool,
    pub agents: bool,
    pub comparison: bool,
    pub activity_feed: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        PanelVisibility { ai_panel: true, agents: false, comparison: false, activity_feed: false }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PanelPatch {
    pub ai_panel: Option<bool>,
    pub agents: Option<bool>,
    pub comparison: Option<bool>,
    pub activity_feed: Option<bool>,
}

impl PanelVisibility {
    pub fn patched(&self, p: PanelPatch) -> PanelVisibility {
        PanelVisibility {
            ai_panel: p.ai_panel.unwrap_or(self.ai_panel),
            agents: p.agents.unwrap_or(self.agents),
            comparison: p.comparison.unwrap_or(self.comparison),
            activity_feed: p.activity_feed.unwrap_or(self.activity_feed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpis(wait: u32, util: u32) -> Kpis {
        Kpis {
            avg_wait_time_min: wait,
            wait_time_reduction_pct: 43,
            ramp_utilization_pct: util,
            overtime_reduction_pct: 20,
            monthly_savings_eur: 21836,
            trucks_processed: 47,
        }
    }

    #[test]
    fn assignment_kpis_clamp_at_floor_and_cap() {
        let mut k = kpis(35, 72);
        for _ in 0..20 {
            k = k.after_assignment();
            assert!(k.avg_wait_time_min >= WAIT_TIME_FLOOR_MIN);
            assert!(k.ramp_utilization_pct <= ASSIGNMENT_UTILIZATION_CAP);
        }
        assert_eq!(k.avg_wait_time_min, 18);
        assert_eq!(k.ramp_utilization_pct, 92);
        assert_eq!(k.trucks_processed, 47);
    }

    #[test]
    fn recommendation_kpis_clamp_at_floor_and_lower_cap() {
        let k = kpis(20, 88).after_recommendation();
        assert_eq!(k.avg_wait_time_min, 18);
        assert_eq!(k.ramp_utilization_pct, 89);

        let pulled_back = kpis(30, 92).after_recommendation();
        assert_eq!(pulled_back.ramp_utilization_pct, 89);
    }

    #[test]
    fn impact_range_orders_bounds_and_serializes_as_pair() {
        let r = ImpactRange::new(15, 10);
        assert_eq!((r.min(), r.max()), (10, 15));
        assert_eq!(serde_json::to_string(&r).unwrap(), "[10,15]");
    }

    #[test]
    fn impact_range_rejects_reversed_bounds_on_the_wire() {
        let r: ImpactRange = serde_json::from_str("[10,15]").unwrap();
        assert_eq!((r.min(), r.max()), (10, 15));
        assert!(serde_json::from_str::<ImpactRange>("[15,10]").is_err());
    }

    #[test]
    fn recommendation_confidence_is_bounded_on_the_wire() {
        let mut json = serde_json::to_value(crate::generator::generate_recommendations().remove(0)).unwrap();
        assert!(serde_json::from_value::<Recommendation>(json.clone()).is_ok());

        json["confidence"] = 100.into();
        assert!(serde_json::from_value::<Recommendation>(json.clone()).is_ok());
        json["confidence"] = 101.into();
        assert!(serde_json::from_value::<Recommendation>(json).is_err());
    }

    #[test]
    fn site_mode_follows_time_slot_system() {
        let mut site = Site {
            id: "x".into(),
            name: "X".into(),
            city: "X".into(),
            dock_count: 4,
            has_time_slot_system: true,
            systems: vec![SystemType::Cargoclix],
        };
        assert_eq!(site.default_mode(), OperatingMode::Integrated);
        site.has_time_slot_system = false;
        assert_eq!(site.default_mode(), OperatingMode::Standalone);
    }

    #[test]
    fn scenario_wire_names() {
        assert_eq!(serde_json::to_string(&Scenario::TrafficJamA8).unwrap(), "\"traffic_jam_a8\"");
        let s: Scenario = serde_json::from_str("\"peak_monday\"").unwrap();
        assert_eq!(s, Scenario::PeakMonday);
    }

    #[test]
    fn connection_status_wire_names() {
        let all = [ConnectionStatus::Connected, ConnectionStatus::Disconnected, ConnectionStatus::Syncing];
        assert_eq!(serde_json::to_string(&all).unwrap(), r#"["connected","disconnected","syncing"]"#);
    }

    #[test]
    fn panel_patch_only_touches_given_fields() {
        let p = PanelVisibility::default().patched(PanelPatch { agents: Some(true), ..Default::default() });
        assert!(p.ai_panel);
        assert!(p.agents);
        assert!(!p.comparison);
    }
}

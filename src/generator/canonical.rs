// src/generator/canonical.rs
//
// Hand-authored demo data. The `ulm` site is the reproducible one.

use chrono::NaiveTime;

use crate::models::{
    AgentStatus, Dock, DockStatus, DockType, Impact, ImpactRange, Kpis, Priority, Recommendation,
    RecommendationKind, Site, SystemType, Truck, TruckStatus,
};

pub const CANONICAL_SITE_ID: &str = "ulm";

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or(NaiveTime::MIN)
}

fn truck(id: &str, carrier: &str, eta: (u32, u32), slot: (u32, u32), cargo: &str, weight_t: u32, delay_min: i32) -> Truck {
    Truck {
        id: id.into(),
        carrier: carrier.into(),
        eta: hm(eta.0, eta.1),
        scheduled_slot: hm(slot.0, slot.1),
        cargo: cargo.into(),
        weight_t,
        status: TruckStatus::Approaching,
        delay_min,
        dock_id: None,
    }
}

pub fn trucks() -> Vec<Truck> {
    vec![
        truck("LKW-4821", "Schenker", (8, 15), (8, 30), "Paletten", 18, 0),
        truck("LKW-7293", "DHL Freight", (8, 45), (8, 30), "Stückgut", 12, 15),
        truck("LKW-1056", "Dachser", (9, 0), (9, 0), "Container", 22, 0),
        truck("LKW-3847", "Noerpel", (9, 10), (9, 30), "Paletten", 15, -20),
        truck("LKW-9182", "Kühne+Nagel", (9, 25), (9, 30), "Kühlware", 16, -5),
        truck("LKW-6574", "DB Schenker", (9, 55), (10, 0), "Stückgut", 14, -5),
    ]
}

fn dock(id: u32, dock_type: DockType, status: DockStatus, current_truck: Option<&str>, queue: u32, perf: Option<(u32, i32)>) -> Dock {
    Dock {
        id,
        name: format!("Dock {id}"),
        dock_type,
        status,
        current_truck: current_truck.map(str::to_string),
        queue,
        avg_time_min: perf.map(|(avg, _)| avg),
        historical_perf_pct: perf.map(|(_, pct)| pct),
    }
}

pub fn docks() -> Vec<Dock> {
    use DockStatus::*;
    use DockType::*;
    vec![
        dock(1, Standard, Free, None, 0, Some((28, 12))),
        dock(2, Standard, Free, None, 1, Some((22, 23))),
        dock(3, Heavy, Occupied, Some("LKW-2201"), 2, Some((35, -5))),
        dock(4, Cooling, Free, None, 0, Some((25, 18))),
        dock(5, Standard, Maintenance, None, 0, None),
        dock(6, Standard, Free, None, 1, Some((30, 8))),
        dock(7, Standard, Free, None, 0, Some((21, 23))),
        dock(8, Heavy, Occupied, Some("LKW-1199"), 1, Some((32, 4))),
    ]
}

pub(crate) struct RecommendationSeed {
    pub id: u32,
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: &'static str,
    pub description: &'static str,
    pub historical_note: &'static str,
    pub confidence: u8,
    pub impact: [(u32, u32); 3],
    pub target: Option<(&'static str, u32)>,
}

impl RecommendationSeed {
    pub fn build(&self) -> Recommendation {
        let [wait, savings, co2] = self.impact;
        Recommendation {
            id: self.id,
            kind: self.kind,
            priority: self.priority,
            title: self.title.into(),
            description: self.description.into(),
            historical_note: self.historical_note.into(),
            confidence: self.confidence.min(100),
            impact: Impact {
                wait_time_min: ImpactRange::new(wait.0, wait.1),
                savings_eur: ImpactRange::new(savings.0, savings.1),
                co2_kg: ImpactRange::new(co2.0, co2.1),
            },
            truck_id: self.target.map(|(truck, _)| truck.to_string()),
            dock_id: self.target.map(|(_, dock)| dock),
        }
    }
}

pub(crate) const RECOMMENDATIONS: [RecommendationSeed; 4] = [
    RecommendationSeed {
        id: 1,
        kind: RecommendationKind::Dock,
        priority: Priority::High,
        title: "Optimale Dock-Zuweisung",
        description: "LKW-3847 (Noerpel, 15t Paletten) → Dock 7, 14:00 Uhr",
        historical_note: "Historisch 23% schneller als Durchschnitt",
        confidence: 86,
        impact: [(10, 15), (320, 360), (12, 18)],
        target: Some(("LKW-3847", 7)),
    },
    RecommendationSeed {
        id: 2,
        kind: RecommendationKind::Dock,
        priority: Priority::High,
        title: "Kühlware priorisieren",
        description: "LKW-9182 (Kühne+Nagel, Kühlware) → Dock 4 (Kühldock)",
        historical_note: "Kühldock reduziert Standzeit um 18%",
        confidence: 92,
        impact: [(5, 10), (200, 240), (8, 12)],
        target: Some(("LKW-9182", 4)),
    },
    RecommendationSeed {
        id: 3,
        kind: RecommendationKind::Dock,
        priority: Priority::Medium,
        title: "Dock 2 nutzen",
        description: "LKW-4821 (Schenker) → Dock 2 statt Dock 6",
        historical_note: "Basierend auf 847 historischen Abfertigungen",
        confidence: 78,
        impact: [(4, 8), (160, 200), (5, 9)],
        target: Some(("LKW-4821", 2)),
    },
    RecommendationSeed {
        id: 4,
        kind: RecommendationKind::Alert,
        priority: Priority::Medium,
        title: "Engpass-Warnung 09:25",
        description: "3 LKW treffen gleichzeitig ein. Dock 3 Warteschlange kritisch.",
        historical_note: "Ähnliche Situation führte gestern zu +22 Min Wartezeit",
        confidence: 81,
        impact: [(12, 18), (380, 440), (15, 22)],
        target: None,
    },
];

pub(crate) const TRAFFIC_JAM_ALERT: RecommendationSeed = RecommendationSeed {
    id: 100,
    kind: RecommendationKind::Alert,
    priority: Priority::High,
    title: "🚨 Stau A8 - Verzögerung",
    description: "3 LKW melden +25 Min Verzögerung wegen Stau auf der A8",
    historical_note: "System empfiehlt Dock-Neuplanung für optimalen Durchsatz",
    confidence: 94,
    impact: [(25, 35), (800, 900), (30, 40)],
    target: None,
};

pub const KPIS: Kpis = Kpis {
    avg_wait_time_min: 35,
    wait_time_reduction_pct: 43,
    ramp_utilization_pct: 72,
    overtime_reduction_pct: 20,
    monthly_savings_eur: 21836,
    trucks_processed: 47,
};

pub(crate) struct AgentSeed {
    pub id: u32,
    pub icon: &'static str,
    pub status: AgentStatus,
    pub name: [&'static str; 2],
    pub task: [&'static str; 2],
}

// [de, en]
pub(crate) const AGENTS: [AgentSeed; 6] = [
    AgentSeed {
        id: 1,
        icon: "📥",
        status: AgentStatus::Active,
        name: ["Daten-Agent", "Data Agent"],
        task: ["Sammelt Daten aus CargoClix & LFS V8", "Collects data from CargoClix & LFS V8"],
    },
    AgentSeed {
        id: 2,
        icon: "🔍",
        status: AgentStatus::Active,
        name: ["Analyse-Agent", "Analysis Agent"],
        task: ["Erkennt Muster in Echtzeit", "Detects patterns in real time"],
    },
    AgentSeed {
        id: 3,
        icon: "🎯",
        status: AgentStatus::Processing,
        name: ["Vorhersage-Agent", "Prediction Agent"],
        task: ["Berechnet optimale Zuweisungen", "Calculates optimal assignments"],
    },
    AgentSeed {
        id: 4,
        icon: "💡",
        status: AgentStatus::Active,
        name: ["Empfehlungs-Agent", "Recommendation Agent"],
        task: ["Gibt Handlungsempfehlungen", "Issues recommendations"],
    },
    AgentSeed {
        id: 5,
        icon: "🧠",
        status: AgentStatus::Idle,
        name: ["Lern-Agent", "Learning Agent"],
        task: ["Verbessert System kontinuierlich", "Continuously improves the system"],
    },
    AgentSeed {
        id: 6,
        icon: "🎼",
        status: AgentStatus::Active,
        name: ["Orchestrator", "Orchestrator"],
        task: ["Koordiniert alle Agenten", "Coordinates all agents"],
    },
];

pub(crate) const DATA_AGENT_STANDALONE_TASK: [&str; 2] = [
    "Verarbeitet manuelle Eingaben & Excel-Importe",
    "Processes manual entries & Excel imports",
];

// (agent id, seconds before now, message)
pub(crate) const ACTIVITY: [(u32, i64, &str); 5] = [
    (1, 5, "Neue ETA für LKW-7293 empfangen"),
    (2, 3, "Muster erkannt: 3 LKW-Cluster um 14:30"),
    (3, 2, "Engpass berechnet: Dock 3, +15 min"),
    (4, 1, "Neue Empfehlung generiert (Konfidenz 86%)"),
    (6, 0, "Empfehlung an Dashboard gesendet"),
];

fn site(id: &str, name: &str, dock_count: u32, systems: &[SystemType]) -> Site {
    Site {
        id: id.into(),
        name: name.into(),
        city: name.into(),
        dock_count,
        has_time_slot_system: !systems.is_empty(),
        systems: systems.to_vec(),
    }
}

pub fn sites() -> Vec<Site> {
    let integrated = [SystemType::Cargoclix, SystemType::LfsV8];
    vec![
        site(CANONICAL_SITE_ID, "Ulm", 8, &integrated),
        site("giengen", "Giengen", 6, &integrated),
        site("heidenheim", "Heidenheim", 10, &[]),
        site("stuttgart", "Stuttgart", 4, &[]),
    ]
}

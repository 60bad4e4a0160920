// src/routes/scenarios.rs

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    generator,
    models::{Scenario, SimulationState, TruckId},
    AppState,
};

#[derive(Serialize)]
pub struct ScenarioInfo {
    pub scenario: Scenario,
    pub affected_trucks: Vec<TruckId>,
}

#[derive(Deserialize)]
pub struct StartBody {
    pub scenario: Scenario,
}

pub async fn list_scenarios() -> Json<Vec<ScenarioInfo>> {
    let rows = Scenario::ALL
        .iter()
        .map(|&scenario| ScenarioInfo {
            scenario,
            affected_trucks: generator::affected_trucks(scenario),
        })
        .collect();
    Json(rows)
}

pub async fn get_simulation(State(state): State<AppState>) -> Json<SimulationState> {
    Json(state.dashboard.session().simulation)
}

pub async fn start_simulation(
    State(state): State<AppState>,
    Json(b): Json<StartBody>,
) -> Json<SimulationState> {
    Json(state.dashboard.start_simulation(b.scenario))
}

pub async fn stop_simulation(State(state): State<AppState>) -> Json<SimulationState> {
    Json(state.dashboard.stop_simulation())
}

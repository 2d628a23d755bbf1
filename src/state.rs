use serde::{Deserialize, Serialize};

use crate::{
    economy::UpgradeTarget,
    error::CommandError,
    furnace::Furnace,
    resources::{Cost, ResourceManager},
    scenario::Scenario,
    session::Scene,
    station::{Station, StationKind},
};

/// Final tally recorded when the last survivor freezes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub env_temperature: i32,
    pub wood: f64,
    pub coal: f64,
    pub elapsed_ms: u64,
    pub days_survived: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnaceSnapshot {
    pub level: u32,
    pub max_level: u32,
    pub working: bool,
    pub heating: bool,
    pub heat_output: i32,
    pub consumption: f64,
    pub upgrade_cost: Option<Cost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub kind: StationKind,
    pub workers: u32,
    pub level: u32,
    pub max_level: u32,
    pub efficiency: f64,
    pub upgrade_cost: Option<Cost>,
}

/// Everything the UI reads, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub scenario: String,
    pub scene: Scene,
    pub elapsed_ms: u64,
    pub days_survived: u64,
    pub wood: f64,
    pub coal: f64,
    pub survivors: u32,
    pub idle_workers: u32,
    pub env_temperature: i32,
    pub current_temperature: i32,
    pub death_threshold: i32,
    pub furnace: FurnaceSnapshot,
    pub stations: Vec<StationSnapshot>,
    pub summary: Option<GameSummary>,
}

/// The whole simulated colony. Systems receive it by `&mut` and nothing else
/// holds game data.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    resources: ResourceManager,
    furnace: Furnace,
    lumber_camp: Station,
    coal_mine: Station,
    env_temperature: i32,
    current_temperature: i32,
    cooling_step: i32,
    death_threshold: i32,
    day_length_ms: u64,
    elapsed_ms: u64,
    outcome: Option<GameSummary>,
}

impl GameState {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let rounding = scenario.rules.production_rounding;
        let mut state = Self {
            resources: ResourceManager::new(&scenario.resources, scenario.rules.worker_loss),
            furnace: Furnace::new(&scenario.furnace),
            lumber_camp: Station::new(StationKind::LumberCamp, &scenario.stations, rounding),
            coal_mine: Station::new(StationKind::CoalMine, &scenario.stations, rounding),
            env_temperature: scenario.climate.start_temperature,
            current_temperature: scenario.climate.start_temperature,
            cooling_step: scenario.climate.cooling_step,
            death_threshold: scenario.climate.death_threshold,
            day_length_ms: scenario.day_length_ms.max(1),
            elapsed_ms: 0,
            outcome: None,
        };
        state.refresh_temperature();
        state
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceManager {
        &mut self.resources
    }

    pub fn furnace(&self) -> &Furnace {
        &self.furnace
    }

    pub fn station(&self, kind: StationKind) -> &Station {
        match kind {
            StationKind::LumberCamp => &self.lumber_camp,
            StationKind::CoalMine => &self.coal_mine,
        }
    }

    pub fn env_temperature(&self) -> i32 {
        self.env_temperature
    }

    pub fn current_temperature(&self) -> i32 {
        self.current_temperature
    }

    pub fn death_threshold(&self) -> i32 {
        self.death_threshold
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub(crate) fn set_elapsed_ms(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
    }

    pub fn days_survived(&self) -> u64 {
        self.elapsed_ms / self.day_length_ms
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&GameSummary> {
        self.outcome.as_ref()
    }

    /// Recomputes the sheltered temperature from the environment and furnace.
    pub fn refresh_temperature(&mut self) -> i32 {
        self.current_temperature = if self.furnace.is_heating(&self.resources) {
            self.env_temperature.saturating_add(self.furnace.heat_output())
        } else {
            self.env_temperature
        };
        self.current_temperature
    }

    pub fn is_freezing(&self) -> bool {
        self.current_temperature < self.death_threshold
    }

    pub fn cool(&mut self) -> i32 {
        self.env_temperature = self.env_temperature.saturating_sub(self.cooling_step);
        self.refresh_temperature();
        self.env_temperature
    }

    pub fn burn_furnace(&mut self) -> bool {
        let working = self.furnace.burn(&mut self.resources);
        self.refresh_temperature();
        working
    }

    pub fn produce(&mut self, kind: StationKind) -> f64 {
        let station = match kind {
            StationKind::LumberCamp => &self.lumber_camp,
            StationKind::CoalMine => &self.coal_mine,
        };
        let amount = station.produce(&mut self.resources);
        self.refresh_temperature();
        amount
    }

    /// Loses one survivor to the cold. Returns whether anyone is left.
    pub fn freeze_survivor(&mut self) -> bool {
        self.resources.kill_survivor()
    }

    /// Marks the game as lost. Only the first call yields a summary.
    pub fn finish(&mut self) -> Option<GameSummary> {
        if self.outcome.is_some() {
            return None;
        }
        let summary = GameSummary {
            env_temperature: self.env_temperature,
            wood: self.resources.wood(),
            coal: self.resources.coal(),
            elapsed_ms: self.elapsed_ms,
            days_survived: self.days_survived(),
        };
        self.outcome = Some(summary.clone());
        Some(summary)
    }

    pub fn assign_worker(&mut self, kind: StationKind) -> Result<(), CommandError> {
        self.resources.assign_worker(kind)
    }

    pub fn remove_worker(&mut self, kind: StationKind) -> Result<(), CommandError> {
        self.resources.remove_worker(kind)
    }

    pub fn upgrade(&mut self, target: UpgradeTarget) -> Result<u32, CommandError> {
        let level = match target {
            UpgradeTarget::Furnace => self.furnace.upgrade(&mut self.resources)?,
            UpgradeTarget::LumberCamp => self.lumber_camp.upgrade(&mut self.resources)?,
            UpgradeTarget::CoalMine => self.coal_mine.upgrade(&mut self.resources)?,
        };
        self.refresh_temperature();
        Ok(level)
    }

    pub fn upgrade_cost(&self, target: UpgradeTarget) -> Option<Cost> {
        let station_terms =
            |station: &Station| (station.level(), station.max_level(), station.upgrade_cost());
        let (level, max_level, cost) = match target {
            UpgradeTarget::Furnace => (
                self.furnace.level(),
                self.furnace.max_level(),
                self.furnace.upgrade_cost(),
            ),
            UpgradeTarget::LumberCamp => station_terms(&self.lumber_camp),
            UpgradeTarget::CoalMine => station_terms(&self.coal_mine),
        };
        (level < max_level).then_some(cost)
    }

    pub fn snapshot(&self, scenario: &str, scene: Scene) -> StateSnapshot {
        let stations = StationKind::ALL
            .iter()
            .map(|&kind| {
                let station = self.station(kind);
                StationSnapshot {
                    kind,
                    workers: self.resources.assigned(kind),
                    level: station.level(),
                    max_level: station.max_level(),
                    efficiency: station.efficiency(),
                    upgrade_cost: self.upgrade_cost(kind.upgrade_target()),
                }
            })
            .collect();

        StateSnapshot {
            scenario: scenario.to_string(),
            scene,
            elapsed_ms: self.elapsed_ms,
            days_survived: self.days_survived(),
            wood: self.resources.wood(),
            coal: self.resources.coal(),
            survivors: self.resources.survivors(),
            idle_workers: self.resources.idle_workers(),
            env_temperature: self.env_temperature,
            current_temperature: self.current_temperature,
            death_threshold: self.death_threshold,
            furnace: FurnaceSnapshot {
                level: self.furnace.level(),
                max_level: self.furnace.max_level(),
                working: self.furnace.is_working(),
                heating: self.furnace.is_heating(&self.resources),
                heat_output: self.furnace.heat_output(),
                consumption: self.furnace.consumption(),
                upgrade_cost: self.upgrade_cost(UpgradeTarget::Furnace),
            },
            stations,
            summary: self.outcome.clone(),
        }
    }
}

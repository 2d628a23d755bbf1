use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::economy::{CostCurve, LinearCost};

fn default_wood() -> f64 {
    50.0
}

fn default_coal() -> f64 {
    30.0
}

fn default_survivors() -> u32 {
    10
}

fn default_day_length_ms() -> u64 {
    10_000
}

/// Balance constants and rule choices for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resources: ResourceInit,
    #[serde(default)]
    pub climate: ClimateConfig,
    #[serde(default)]
    pub furnace: FurnaceConfig,
    #[serde(default)]
    pub stations: StationConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default = "default_day_length_ms")]
    pub day_length_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInit {
    #[serde(default = "default_wood")]
    pub wood: f64,
    #[serde(default = "default_coal")]
    pub coal: f64,
    #[serde(default = "default_survivors")]
    pub survivors: u32,
}

impl Default for ResourceInit {
    fn default() -> Self {
        Self {
            wood: default_wood(),
            coal: default_coal(),
            survivors: default_survivors(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    pub start_temperature: i32,
    pub cooling_step: i32,
    pub death_threshold: i32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            start_temperature: -10,
            cooling_step: 1,
            death_threshold: -20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FurnaceConfig {
    pub max_level: u32,
    pub heat_per_level: i32,
    /// Coal burned per cycle regardless of level.
    pub consumption_base: f64,
    /// Additional coal burned per cycle for each furnace level.
    pub consumption_per_level: f64,
    pub upgrade_cost: CostCurve,
}

impl Default for FurnaceConfig {
    fn default() -> Self {
        Self {
            max_level: 5,
            heat_per_level: 15,
            consumption_base: 0.0,
            consumption_per_level: 2.0,
            upgrade_cost: CostCurve {
                wood: LinearCost::ZERO,
                coal: LinearCost::new(0.0, 20.0),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub max_level: u32,
    pub base_efficiency: f64,
    /// Fractional output bonus per station level.
    pub level_bonus: f64,
    pub lumber_upgrade_cost: CostCurve,
    pub coal_upgrade_cost: CostCurve,
}

impl Default for StationConfig {
    fn default() -> Self {
        let wood_only = CostCurve {
            wood: LinearCost::new(0.0, 15.0),
            coal: LinearCost::ZERO,
        };
        Self {
            max_level: 5,
            base_efficiency: 1.0,
            level_bonus: 0.2,
            lumber_upgrade_cost: wood_only.clone(),
            coal_upgrade_cost: wood_only,
        }
    }
}

/// Periodic system intervals, in simulated milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub cooling_ms: u64,
    pub furnace_ms: u64,
    pub production_ms: u64,
    pub exposure_ms: u64,
    pub bookkeeping_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cooling_ms: 10_000,
            furnace_ms: 5_000,
            production_ms: 3_000,
            exposure_ms: 5_000,
            bookkeeping_ms: 1_000,
        }
    }
}

/// Which worker goes when a survivor freezes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerLossPolicy {
    /// Lumber camp, then coal mine, then the idle pool.
    #[default]
    StationsFirst,
    /// Idle pool, then lumber camp, then coal mine.
    IdleFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionRounding {
    /// Whole units only; fractional output is discarded each cycle.
    #[default]
    Floor,
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub worker_loss: WorkerLossPolicy,
    pub production_rounding: ProductionRounding,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("scenario must define a name")]
    MissingName,
    #[error("scenario must start with at least one survivor")]
    NoSurvivors,
    #[error("starting {0} must be a finite, non-negative amount")]
    InvalidStock(&'static str),
    #[error("{0} max level must be at least 1")]
    InvalidMaxLevel(&'static str),
    #[error("furnace heat per level must be positive, got {0}")]
    InvalidHeat(i32),
    #[error("climate cooling step must be positive, got {0}")]
    InvalidCooling(i32),
    #[error("{0} must be a finite, non-negative number")]
    InvalidRate(&'static str),
    #[error("{0} upgrade cost must be non-negative and grow with level")]
    FlatCostCurve(&'static str),
    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),
}

impl Default for Scenario {
    fn default() -> Self {
        Self::frostbite()
    }
}

impl Scenario {
    /// The built-in balance, identical to `scenarios/frostbite.yaml`.
    pub fn frostbite() -> Self {
        Self {
            name: "frostbite".to_string(),
            description: None,
            resources: ResourceInit::default(),
            climate: ClimateConfig::default(),
            furnace: FurnaceConfig::default(),
            stations: StationConfig::default(),
            schedule: ScheduleConfig::default(),
            rules: RuleConfig::default(),
            day_length_ms: default_day_length_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::MissingName);
        }
        if self.resources.survivors == 0 {
            return Err(ScenarioError::NoSurvivors);
        }
        for (label, amount) in [("wood", self.resources.wood), ("coal", self.resources.coal)] {
            if !is_non_negative(amount) {
                return Err(ScenarioError::InvalidStock(label));
            }
        }

        if self.furnace.max_level == 0 {
            return Err(ScenarioError::InvalidMaxLevel("furnace"));
        }
        if self.stations.max_level == 0 {
            return Err(ScenarioError::InvalidMaxLevel("station"));
        }
        if self.furnace.heat_per_level <= 0 {
            return Err(ScenarioError::InvalidHeat(self.furnace.heat_per_level));
        }
        if self.climate.cooling_step <= 0 {
            return Err(ScenarioError::InvalidCooling(self.climate.cooling_step));
        }

        let rates = [
            ("furnace consumption_base", self.furnace.consumption_base),
            ("furnace consumption_per_level", self.furnace.consumption_per_level),
            ("station base_efficiency", self.stations.base_efficiency),
            ("station level_bonus", self.stations.level_bonus),
        ];
        for (label, rate) in rates {
            if !is_non_negative(rate) {
                return Err(ScenarioError::InvalidRate(label));
            }
        }

        let curves = [
            ("furnace", &self.furnace.upgrade_cost),
            ("lumber camp", &self.stations.lumber_upgrade_cost),
            ("coal mine", &self.stations.coal_upgrade_cost),
        ];
        for (label, curve) in curves {
            if !curve.is_strictly_increasing() {
                return Err(ScenarioError::FlatCostCurve(label));
            }
        }

        let intervals = [
            ("cooling", self.schedule.cooling_ms),
            ("furnace", self.schedule.furnace_ms),
            ("production", self.schedule.production_ms),
            ("exposure", self.schedule.exposure_ms),
            ("bookkeeping", self.schedule.bookkeeping_ms),
            ("day length", self.day_length_ms),
        ];
        for (label, interval) in intervals {
            if interval == 0 {
                return Err(ScenarioError::ZeroInterval(label));
            }
        }

        Ok(())
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_scenario_is_valid() {
        let scenario = Scenario::default();
        assert_eq!(scenario.name, "frostbite");
        assert_eq!(scenario.resources.survivors, 10);
        assert_eq!(scenario.climate.death_threshold, -20);
        scenario.validate().expect("built-in balance validates");
    }

    #[test]
    fn minimal_yaml_fills_in_defaults() {
        let scenario: Scenario = serde_yaml::from_str("name: bare\n").unwrap();
        assert_eq!(scenario.resources, ResourceInit::default());
        assert_eq!(scenario.schedule, ScheduleConfig::default());
        assert_eq!(scenario.rules.worker_loss, WorkerLossPolicy::StationsFirst);
        assert_eq!(scenario.day_length_ms, 10_000);
    }

    #[test]
    fn rules_parse_from_snake_case() {
        let yaml = "name: rules\nrules:\n  worker_loss: idle_first\n  production_rounding: exact\n";
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.rules.worker_loss, WorkerLossPolicy::IdleFirst);
        assert_eq!(scenario.rules.production_rounding, ProductionRounding::Exact);
    }

    #[test]
    fn flat_cost_curve_is_rejected() {
        let mut scenario = Scenario::default();
        scenario.stations.coal_upgrade_cost = CostCurve {
            wood: LinearCost::new(10.0, 0.0),
            coal: LinearCost::ZERO,
        };
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::FlatCostCurve("coal mine"))
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut scenario = Scenario::default();
        scenario.schedule.exposure_ms = 0;
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::ZeroInterval("exposure"))
        );
    }

    #[test]
    fn warming_climate_is_rejected() {
        let mut scenario = Scenario::default();
        scenario.climate.cooling_step = 0;
        assert_eq!(scenario.validate(), Err(ScenarioError::InvalidCooling(0)));
        scenario.climate.cooling_step = -1;
        assert_eq!(scenario.validate(), Err(ScenarioError::InvalidCooling(-1)));
    }

    #[test]
    fn loader_reports_validation_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("empty.yaml")).unwrap();
        writeln!(file, "name: empty\nresources:\n  survivors: 0").unwrap();

        let err = ScenarioLoader::new(dir.path())
            .load("empty.yaml")
            .expect_err("zero survivors is invalid");
        let message = format!("{err:#}");
        assert!(message.contains("Invalid scenario"), "{message}");
        assert!(message.contains("at least one survivor"), "{message}");
    }

    #[test]
    fn loader_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScenarioLoader::new(dir.path())
            .load("missing.yaml")
            .expect_err("file does not exist");
        assert!(format!("{err}").contains("Failed to read scenario file"));
    }
}

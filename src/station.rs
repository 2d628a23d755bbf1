use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    economy::{attempt_upgrade, CostCurve, UpgradeTarget},
    error::CommandError,
    resources::{Cost, ResourceKind, ResourceManager},
    scenario::{ProductionRounding, StationConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    LumberCamp,
    CoalMine,
}

impl StationKind {
    pub const ALL: [StationKind; 2] = [StationKind::LumberCamp, StationKind::CoalMine];

    pub fn resource(self) -> ResourceKind {
        match self {
            StationKind::LumberCamp => ResourceKind::Wood,
            StationKind::CoalMine => ResourceKind::Coal,
        }
    }

    pub fn upgrade_target(self) -> UpgradeTarget {
        match self {
            StationKind::LumberCamp => UpgradeTarget::LumberCamp,
            StationKind::CoalMine => UpgradeTarget::CoalMine,
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.upgrade_target(), f)
    }
}

/// A production building. Worker counts live in the [`ResourceManager`];
/// the station only knows how well each worker performs.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    kind: StationKind,
    level: u32,
    max_level: u32,
    base_efficiency: f64,
    level_bonus: f64,
    rounding: ProductionRounding,
    upgrade_cost: CostCurve,
}

impl Station {
    pub fn new(kind: StationKind, config: &StationConfig, rounding: ProductionRounding) -> Self {
        let upgrade_cost = match kind {
            StationKind::LumberCamp => config.lumber_upgrade_cost.clone(),
            StationKind::CoalMine => config.coal_upgrade_cost.clone(),
        };
        Self {
            kind,
            level: 1,
            max_level: config.max_level,
            base_efficiency: config.base_efficiency,
            level_bonus: config.level_bonus,
            rounding,
            upgrade_cost,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Output of a single worker per production cycle.
    pub fn efficiency(&self) -> f64 {
        self.base_efficiency * (1.0 + self.level_bonus * f64::from(self.level))
    }

    pub fn production_for(&self, workers: u32) -> f64 {
        let raw = f64::from(workers) * self.efficiency();
        match self.rounding {
            ProductionRounding::Floor => raw.floor(),
            ProductionRounding::Exact => raw,
        }
    }

    /// Adds one cycle of output to the matching stockpile and returns it.
    pub fn produce(&self, resources: &mut ResourceManager) -> f64 {
        let amount = self.production_for(resources.assigned(self.kind));
        resources.add(self.kind.resource(), amount);
        amount
    }

    pub fn upgrade_cost(&self) -> Cost {
        self.upgrade_cost.at(self.level)
    }

    pub fn upgrade(&mut self, resources: &mut ResourceManager) -> Result<u32, CommandError> {
        attempt_upgrade(
            self.kind.upgrade_target(),
            &mut self.level,
            self.max_level,
            &self.upgrade_cost,
            resources,
        )
    }
}

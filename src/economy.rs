//! Upgrade cost curves and the shared all-or-nothing upgrade step.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::CommandError,
    resources::{Cost, ResourceManager},
};

/// `base + level * per_level`, in units of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearCost {
    pub base: f64,
    pub per_level: f64,
}

impl LinearCost {
    pub const ZERO: LinearCost = LinearCost {
        base: 0.0,
        per_level: 0.0,
    };

    pub const fn new(base: f64, per_level: f64) -> Self {
        Self { base, per_level }
    }

    pub fn at(&self, level: u32) -> f64 {
        self.base + f64::from(level) * self.per_level
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CostCurve {
    pub wood: LinearCost,
    pub coal: LinearCost,
}

impl CostCurve {
    pub fn at(&self, level: u32) -> Cost {
        Cost {
            wood: self.wood.at(level),
            coal: self.coal.at(level),
        }
    }

    /// True when no component can go negative or shrink and at least one grows.
    pub fn is_strictly_increasing(&self) -> bool {
        let parts = [self.wood, self.coal];
        let well_formed = parts.iter().all(|part| {
            part.base.is_finite()
                && part.per_level.is_finite()
                && part.base >= 0.0
                && part.per_level >= 0.0
        });
        well_formed && parts.iter().any(|part| part.per_level > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeTarget {
    Furnace,
    LumberCamp,
    CoalMine,
}

impl fmt::Display for UpgradeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpgradeTarget::Furnace => "furnace",
            UpgradeTarget::LumberCamp => "lumber camp",
            UpgradeTarget::CoalMine => "coal mine",
        };
        f.write_str(label)
    }
}

/// Raises `level` by one if the cap allows it and the full cost can be paid.
///
/// Either the whole cost is deducted and the new level returned, or nothing
/// is touched.
pub fn attempt_upgrade(
    target: UpgradeTarget,
    level: &mut u32,
    max_level: u32,
    curve: &CostCurve,
    resources: &mut ResourceManager,
) -> Result<u32, CommandError> {
    if *level >= max_level {
        return Err(CommandError::MaxLevel { target, max_level });
    }
    resources.spend(curve.at(*level))?;
    *level += 1;
    Ok(*level)
}

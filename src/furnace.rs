use crate::{
    economy::{attempt_upgrade, UpgradeTarget},
    error::CommandError,
    resources::{Cost, ResourceManager},
    scenario::FurnaceConfig,
};

/// The colony's only heat source.
///
/// The furnace is either working (its last burn found enough coal) or
/// starved. It only adds heat while working and the coal pile is not empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Furnace {
    level: u32,
    is_working: bool,
    config: FurnaceConfig,
}

impl Furnace {
    pub fn new(config: &FurnaceConfig) -> Self {
        Self {
            level: 1,
            is_working: true,
            config: config.clone(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.config.max_level
    }

    pub fn is_working(&self) -> bool {
        self.is_working
    }

    pub fn heat_output(&self) -> i32 {
        let level = i32::try_from(self.level).unwrap_or(i32::MAX);
        level.saturating_mul(self.config.heat_per_level)
    }

    /// Coal needed for one burn at the current level.
    pub fn consumption(&self) -> f64 {
        self.config.consumption_base + self.config.consumption_per_level * f64::from(self.level)
    }

    pub fn is_heating(&self, resources: &ResourceManager) -> bool {
        self.is_working && resources.coal() > 0.0
    }

    /// Feeds one burn's worth of coal and records whether it was enough.
    pub fn burn(&mut self, resources: &mut ResourceManager) -> bool {
        self.is_working = resources.consume_coal(self.consumption());
        self.is_working
    }

    pub fn upgrade_cost(&self) -> Cost {
        self.config.upgrade_cost.at(self.level)
    }

    pub fn upgrade(&mut self, resources: &mut ResourceManager) -> Result<u32, CommandError> {
        attempt_upgrade(
            UpgradeTarget::Furnace,
            &mut self.level,
            self.config.max_level,
            &self.config.upgrade_cost,
            resources,
        )
    }
}

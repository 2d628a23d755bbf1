use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::CommandError,
    scenario::{ResourceInit, WorkerLossPolicy},
    station::StationKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Wood,
    Coal,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Wood => f.write_str("wood"),
            ResourceKind::Coal => f.write_str("coal"),
        }
    }
}

/// A bundle of wood and coal, used for upgrade prices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cost {
    pub wood: f64,
    pub coal: f64,
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} wood / {:.1} coal", self.wood, self.coal)
    }
}

/// Stockpiles and headcount of the colony.
///
/// Every survivor is either idle or working at exactly one station, so
/// `idle_workers + lumber_workers + mine_workers == survivors` holds after
/// every public method.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceManager {
    wood: f64,
    coal: f64,
    survivors: u32,
    idle_workers: u32,
    lumber_workers: u32,
    mine_workers: u32,
    worker_loss: WorkerLossPolicy,
}

impl ResourceManager {
    pub fn new(init: &ResourceInit, worker_loss: WorkerLossPolicy) -> Self {
        Self {
            wood: init.wood.max(0.0),
            coal: init.coal.max(0.0),
            survivors: init.survivors,
            idle_workers: init.survivors,
            lumber_workers: 0,
            mine_workers: 0,
            worker_loss,
        }
    }

    pub fn wood(&self) -> f64 {
        self.wood
    }

    pub fn coal(&self) -> f64 {
        self.coal
    }

    pub fn survivors(&self) -> u32 {
        self.survivors
    }

    pub fn idle_workers(&self) -> u32 {
        self.idle_workers
    }

    pub fn assigned(&self, station: StationKind) -> u32 {
        match station {
            StationKind::LumberCamp => self.lumber_workers,
            StationKind::CoalMine => self.mine_workers,
        }
    }

    pub fn total_workers(&self) -> u32 {
        self.idle_workers + self.lumber_workers + self.mine_workers
    }

    pub fn is_consistent(&self) -> bool {
        self.total_workers() == self.survivors
    }

    /// Overwrites a stockpile. Negative and non-finite amounts are stored as zero.
    pub fn set_stock(&mut self, kind: ResourceKind, amount: f64) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        match kind {
            ResourceKind::Wood => self.wood = amount,
            ResourceKind::Coal => self.coal = amount,
        }
    }

    pub fn add(&mut self, kind: ResourceKind, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        match kind {
            ResourceKind::Wood => self.wood += amount,
            ResourceKind::Coal => self.coal += amount,
        }
    }

    pub fn assign_worker(&mut self, station: StationKind) -> Result<(), CommandError> {
        if self.idle_workers == 0 {
            return Err(CommandError::NoIdleWorkers);
        }
        self.idle_workers -= 1;
        *self.slot_mut(station) += 1;
        Ok(())
    }

    pub fn remove_worker(&mut self, station: StationKind) -> Result<(), CommandError> {
        let slot = self.slot_mut(station);
        if *slot == 0 {
            return Err(CommandError::NoAssignedWorkers(station));
        }
        *slot -= 1;
        self.idle_workers += 1;
        Ok(())
    }

    /// Burns `amount` coal. When the pile is short it is emptied and `false`
    /// is returned.
    pub fn consume_coal(&mut self, amount: f64) -> bool {
        if self.coal >= amount {
            self.coal -= amount;
            true
        } else {
            self.coal = 0.0;
            false
        }
    }

    /// Removes one survivor and the worker slot they held. Returns whether
    /// anyone is left alive.
    pub fn kill_survivor(&mut self) -> bool {
        if self.survivors == 0 {
            return false;
        }
        self.survivors -= 1;

        let order: [&mut u32; 3] = match self.worker_loss {
            WorkerLossPolicy::StationsFirst => [
                &mut self.lumber_workers,
                &mut self.mine_workers,
                &mut self.idle_workers,
            ],
            WorkerLossPolicy::IdleFirst => [
                &mut self.idle_workers,
                &mut self.lumber_workers,
                &mut self.mine_workers,
            ],
        };
        if let Some(slot) = order.into_iter().find(|slot| **slot > 0) {
            *slot -= 1;
        }

        self.survivors > 0
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        self.wood >= cost.wood && self.coal >= cost.coal
    }

    pub fn spend(&mut self, cost: Cost) -> Result<(), CommandError> {
        if !self.can_afford(cost) {
            return Err(CommandError::InsufficientResources {
                needed: cost,
                available: Cost {
                    wood: self.wood,
                    coal: self.coal,
                },
            });
        }
        self.wood -= cost.wood;
        self.coal -= cost.coal;
        Ok(())
    }

    fn slot_mut(&mut self, station: StationKind) -> &mut u32 {
        match station {
            StationKind::LumberCamp => &mut self.lumber_workers,
            StationKind::CoalMine => &mut self.mine_workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colony(policy: WorkerLossPolicy) -> ResourceManager {
        ResourceManager::new(&ResourceInit::default(), policy)
    }

    #[test]
    fn assignment_moves_idle_workers() {
        let mut resources = colony(WorkerLossPolicy::StationsFirst);
        for _ in 0..3 {
            resources.assign_worker(StationKind::LumberCamp).unwrap();
        }
        for _ in 0..2 {
            resources.assign_worker(StationKind::CoalMine).unwrap();
        }
        assert_eq!(resources.idle_workers(), 5);
        assert_eq!(resources.assigned(StationKind::LumberCamp), 3);
        assert_eq!(resources.assigned(StationKind::CoalMine), 2);
        assert!(resources.is_consistent());
    }

    #[test]
    fn assignment_fails_without_idle_workers() {
        let mut resources = colony(WorkerLossPolicy::StationsFirst);
        for _ in 0..10 {
            resources.assign_worker(StationKind::CoalMine).unwrap();
        }
        let before = resources.clone();
        assert_eq!(
            resources.assign_worker(StationKind::LumberCamp),
            Err(CommandError::NoIdleWorkers)
        );
        assert_eq!(resources, before);
    }

    #[test]
    fn removal_needs_an_assigned_worker() {
        let mut resources = colony(WorkerLossPolicy::StationsFirst);
        assert_eq!(
            resources.remove_worker(StationKind::LumberCamp),
            Err(CommandError::NoAssignedWorkers(StationKind::LumberCamp))
        );
        resources.assign_worker(StationKind::LumberCamp).unwrap();
        resources.remove_worker(StationKind::LumberCamp).unwrap();
        assert_eq!(resources.idle_workers(), 10);
        assert_eq!(resources.assigned(StationKind::LumberCamp), 0);
    }

    #[test]
    fn coal_never_goes_negative() {
        let mut resources = colony(WorkerLossPolicy::StationsFirst);
        resources.set_stock(ResourceKind::Coal, 1.0);
        assert!(!resources.consume_coal(2.0));
        assert_eq!(resources.coal(), 0.0);

        resources.set_stock(ResourceKind::Coal, 5.0);
        assert!(resources.consume_coal(2.0));
        assert_eq!(resources.coal(), 3.0);
    }

    #[test]
    fn stations_first_loss_drains_lumber_then_mine() {
        let mut resources = colony(WorkerLossPolicy::StationsFirst);
        resources.assign_worker(StationKind::LumberCamp).unwrap();
        resources.assign_worker(StationKind::CoalMine).unwrap();

        assert!(resources.kill_survivor());
        assert_eq!(resources.assigned(StationKind::LumberCamp), 0);
        assert_eq!(resources.idle_workers(), 8);

        assert!(resources.kill_survivor());
        assert_eq!(resources.assigned(StationKind::CoalMine), 0);
        assert_eq!(resources.idle_workers(), 8);

        assert!(resources.kill_survivor());
        assert_eq!(resources.idle_workers(), 7);
        assert!(resources.is_consistent());
    }

    #[test]
    fn idle_first_loss_spares_stations() {
        let mut resources = colony(WorkerLossPolicy::IdleFirst);
        for _ in 0..9 {
            resources.assign_worker(StationKind::CoalMine).unwrap();
        }
        assert!(resources.kill_survivor());
        assert_eq!(resources.idle_workers(), 0);
        assert_eq!(resources.assigned(StationKind::CoalMine), 9);

        assert!(resources.kill_survivor());
        assert_eq!(resources.assigned(StationKind::CoalMine), 8);
        assert!(resources.is_consistent());
    }

    #[test]
    fn last_death_reports_extinction_once() {
        let mut resources = ResourceManager::new(
            &ResourceInit {
                wood: 0.0,
                coal: 0.0,
                survivors: 1,
            },
            WorkerLossPolicy::StationsFirst,
        );
        assert!(!resources.kill_survivor());
        assert_eq!(resources.survivors(), 0);
        assert!(!resources.kill_survivor());
        assert_eq!(resources.survivors(), 0);
        assert!(resources.is_consistent());
    }

    #[test]
    fn spend_is_all_or_nothing() {
        let mut resources = colony(WorkerLossPolicy::StationsFirst);
        let too_much = Cost {
            wood: 10.0,
            coal: 31.0,
        };
        assert!(!resources.can_afford(too_much));
        assert!(resources.spend(too_much).is_err());
        assert_eq!(resources.wood(), 50.0);
        assert_eq!(resources.coal(), 30.0);

        resources
            .spend(Cost {
                wood: 10.0,
                coal: 30.0,
            })
            .unwrap();
        assert_eq!(resources.wood(), 40.0);
        assert_eq!(resources.coal(), 0.0);
    }
}

use thiserror::Error;

use crate::{economy::UpgradeTarget, resources::Cost, session::Scene, station::StationKind};

/// Why a player command was turned down. The game state is never modified
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("no idle workers available")]
    NoIdleWorkers,
    #[error("no workers assigned to the {0}")]
    NoAssignedWorkers(StationKind),
    #[error("{target} is already at max level {max_level}")]
    MaxLevel {
        target: UpgradeTarget,
        max_level: u32,
    },
    #[error("not enough resources: need {needed}, have {available}")]
    InsufficientResources { needed: Cost, available: Cost },
    #[error("command not available during the {0} scene")]
    WrongScene(Scene),
}

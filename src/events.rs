use serde::{Deserialize, Serialize};

use crate::{
    command::Command, economy::UpgradeTarget, error::CommandError, session::Scene,
    state::GameSummary, station::StationKind,
};

/// Something a renderer may want to show, stamped with the simulation time it
/// happened at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub kind: GameEventKind,
}

impl GameEvent {
    pub fn new(at_ms: u64, kind: GameEventKind) -> Self {
        Self { at_ms, kind }
    }

    pub fn rejected(at_ms: u64, command: &Command, error: &CommandError) -> Self {
        Self::new(
            at_ms,
            GameEventKind::CommandRejected {
                command: *command,
                reason: error.to_string(),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventKind {
    SceneChanged {
        scene: Scene,
    },
    EnvironmentCooled {
        env_temperature: i32,
        current_temperature: i32,
    },
    FurnaceBurned {
        working: bool,
        coal_left: f64,
    },
    Produced {
        station: StationKind,
        amount: f64,
    },
    SurvivorFroze {
        survivors_left: u32,
        current_temperature: i32,
    },
    GameOver {
        summary: GameSummary,
    },
    WorkerAssigned {
        station: StationKind,
        idle_workers: u32,
    },
    WorkerRemoved {
        station: StationKind,
        idle_workers: u32,
    },
    UpgradeCompleted {
        target: UpgradeTarget,
        level: u32,
    },
    CommandRejected {
        command: Command,
        reason: String,
    },
}

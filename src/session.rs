//! Scene flow and player commands for one colony.
//!
//! A session starts in [`Scene::Boot`], moves to [`Scene::Main`] on
//! [`Command::Start`], and lands in [`Scene::GameOver`] when the last survivor
//! freezes. [`Command::Restart`] begins a fresh game from any scene.

use std::{fmt, mem};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    command::Command,
    engine::Engine,
    error::CommandError,
    events::{GameEvent, GameEventKind},
    scenario::{Scenario, ScenarioError},
    state::{GameState, StateSnapshot},
    systems::standard_engine,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Boot,
    Main,
    GameOver,
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scene::Boot => f.write_str("boot"),
            Scene::Main => f.write_str("main"),
            Scene::GameOver => f.write_str("game over"),
        }
    }
}

pub struct Session {
    scenario: Scenario,
    scene: Scene,
    state: GameState,
    engine: Engine,
    clock_ms: u64,
    /// Rejection events waiting for the next [`Session::advance_to`].
    rejections: Vec<GameEvent>,
}

impl Session {
    pub fn new(scenario: Scenario) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        let state = GameState::from_scenario(&scenario);
        let engine = standard_engine(&scenario);
        Ok(Self {
            scenario,
            scene: Scene::Boot,
            state,
            engine,
            clock_ms: 0,
            rejections: Vec::new(),
        })
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Time of the external clock as last seen by [`Session::advance_to`].
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot(&self.scenario.name, self.scene)
    }

    /// Applies one player command. Accepted commands return the events they
    /// caused. Rejected ones leave the game as it was and queue a
    /// `CommandRejected` event for the next [`Session::advance_to`].
    pub fn apply(&mut self, command: Command) -> Result<Vec<GameEvent>, CommandError> {
        self.dispatch(command).map_err(|err| {
            warn!(?command, reason = %err, scene = %self.scene, "command.rejected");
            self.rejections
                .push(GameEvent::rejected(self.state.elapsed_ms(), &command, &err));
            err
        })
    }

    fn dispatch(&mut self, command: Command) -> Result<Vec<GameEvent>, CommandError> {
        let at_ms = self.state.elapsed_ms();
        match command {
            Command::Start => {
                if self.scene != Scene::Boot {
                    return Err(CommandError::WrongScene(self.scene));
                }
                Ok(self.begin_game())
            }
            Command::Restart => {
                info!(scenario = %self.scenario.name, from = %self.scene, "session.restart");
                self.state = GameState::from_scenario(&self.scenario);
                Ok(self.begin_game())
            }
            Command::AssignWorker { station } => {
                self.require_main()?;
                self.state.assign_worker(station)?;
                Ok(vec![GameEvent::new(
                    at_ms,
                    GameEventKind::WorkerAssigned {
                        station,
                        idle_workers: self.state.resources().idle_workers(),
                    },
                )])
            }
            Command::RemoveWorker { station } => {
                self.require_main()?;
                self.state.remove_worker(station)?;
                Ok(vec![GameEvent::new(
                    at_ms,
                    GameEventKind::WorkerRemoved {
                        station,
                        idle_workers: self.state.resources().idle_workers(),
                    },
                )])
            }
            Command::Upgrade { target } => {
                self.require_main()?;
                let level = self.state.upgrade(target)?;
                info!(%target, level, "upgrade.completed");
                Ok(vec![GameEvent::new(
                    at_ms,
                    GameEventKind::UpgradeCompleted { target, level },
                )])
            }
        }
    }

    /// Moves the external clock forward and runs every periodic system that
    /// fell due. Outside the main scene only the clock moves. Pending
    /// rejection events come first in the result.
    pub fn advance_to(&mut self, now_ms: u64) -> Result<Vec<GameEvent>> {
        let mut events = mem::take(&mut self.rejections);
        if now_ms < self.clock_ms {
            return Ok(events);
        }
        self.clock_ms = now_ms;
        if self.scene != Scene::Main {
            return Ok(events);
        }

        events.extend(self.engine.advance_to(&mut self.state, now_ms)?);
        if self.state.is_over() {
            self.scene = Scene::GameOver;
            info!(
                scenario = %self.scenario.name,
                elapsed_ms = self.state.elapsed_ms(),
                "session.game_over"
            );
            events.push(GameEvent::new(
                self.state.elapsed_ms(),
                GameEventKind::SceneChanged {
                    scene: Scene::GameOver,
                },
            ));
        }
        Ok(events)
    }

    pub fn advance_by(&mut self, delta_ms: u64) -> Result<Vec<GameEvent>> {
        self.advance_to(self.clock_ms.saturating_add(delta_ms))
    }

    fn begin_game(&mut self) -> Vec<GameEvent> {
        self.engine.start(self.clock_ms);
        self.scene = Scene::Main;
        info!(scenario = %self.scenario.name, at_ms = self.clock_ms, "session.main");
        vec![GameEvent::new(
            0,
            GameEventKind::SceneChanged { scene: Scene::Main },
        )]
    }

    fn require_main(&self) -> Result<(), CommandError> {
        if self.scene == Scene::Main {
            Ok(())
        } else {
            Err(CommandError::WrongScene(self.scene))
        }
    }
}

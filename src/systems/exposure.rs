use anyhow::Result;
use tracing::{info, warn};

use crate::{
    engine::{System, SystemContext},
    events::{GameEvent, GameEventKind},
    state::GameState,
};

/// The death check. Costs at most one survivor per run while the shelter is
/// below the threshold, and ends the game when nobody is left.
pub struct ExposureSystem {
    interval_ms: u64,
}

impl ExposureSystem {
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }
}

impl System for ExposureSystem {
    fn name(&self) -> &str {
        "exposure"
    }

    fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        state: &mut GameState,
        events: &mut Vec<GameEvent>,
    ) -> Result<()> {
        if state.is_over() {
            return Ok(());
        }
        let current_temperature = state.refresh_temperature();
        if !state.is_freezing() {
            return Ok(());
        }

        let anyone_left = state.freeze_survivor();
        let survivors_left = state.resources().survivors();
        warn!(
            current_temperature,
            survivors_left,
            at_ms = ctx.elapsed_ms,
            "survivor.froze"
        );
        events.push(GameEvent::new(
            ctx.elapsed_ms,
            GameEventKind::SurvivorFroze {
                survivors_left,
                current_temperature,
            },
        ));

        if !anyone_left {
            if let Some(summary) = state.finish() {
                info!(
                    scenario = ctx.scenario_name,
                    days_survived = summary.days_survived,
                    "colony.lost"
                );
                events.push(GameEvent::new(
                    ctx.elapsed_ms,
                    GameEventKind::GameOver { summary },
                ));
            }
        }
        Ok(())
    }
}

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    engine::{System, SystemContext},
    events::{GameEvent, GameEventKind},
    state::GameState,
};

pub struct FurnaceSystem {
    interval_ms: u64,
}

impl FurnaceSystem {
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }
}

impl System for FurnaceSystem {
    fn name(&self) -> &str {
        "furnace"
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
        let was_working = state.furnace().is_working();
        let working = state.burn_furnace();
        let coal_left = state.resources().coal();
        if was_working && !working {
            warn!(at_ms = ctx.elapsed_ms, "furnace.starved");
        } else {
            debug!(working, coal_left, "furnace.burned");
        }
        events.push(GameEvent::new(
            ctx.elapsed_ms,
            GameEventKind::FurnaceBurned { working, coal_left },
        ));
        Ok(())
    }
}

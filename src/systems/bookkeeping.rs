use anyhow::{ensure, Result};

use crate::{
    engine::{System, SystemContext},
    events::GameEvent,
    state::GameState,
};

/// Verifies the headcount and stockpile invariants between the other systems.
pub struct BookkeepingSystem {
    interval_ms: u64,
}

impl BookkeepingSystem {
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &str {
        "bookkeeping"
    }

    fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        state: &mut GameState,
        _events: &mut Vec<GameEvent>,
    ) -> Result<()> {
        let resources = state.resources();
        ensure!(
            resources.is_consistent(),
            "workforce out of balance at {}ms: {} workers for {} survivors",
            ctx.elapsed_ms,
            resources.total_workers(),
            resources.survivors()
        );
        ensure!(
            resources.wood() >= 0.0 && resources.coal() >= 0.0,
            "negative stockpile at {}ms: wood {}, coal {}",
            ctx.elapsed_ms,
            resources.wood(),
            resources.coal()
        );
        Ok(())
    }
}

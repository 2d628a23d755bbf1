use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    events::{GameEvent, GameEventKind},
    state::GameState,
};

/// Lowers the ambient temperature by one step every interval.
pub struct CoolingSystem {
    interval_ms: u64,
}

impl CoolingSystem {
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }
}

impl System for CoolingSystem {
    fn name(&self) -> &str {
        "cooling"
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
        let env_temperature = state.cool();
        debug!(env_temperature, "environment.cooled");
        events.push(GameEvent::new(
            ctx.elapsed_ms,
            GameEventKind::EnvironmentCooled {
                env_temperature,
                current_temperature: state.current_temperature(),
            },
        ));
        Ok(())
    }
}

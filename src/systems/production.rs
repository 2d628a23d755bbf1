use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    events::{GameEvent, GameEventKind},
    state::GameState,
    station::StationKind,
};

/// Runs one production cycle at every station.
pub struct ProductionSystem {
    interval_ms: u64,
}

impl ProductionSystem {
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }
}

impl System for ProductionSystem {
    fn name(&self) -> &str {
        "production"
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
        for station in StationKind::ALL {
            let amount = state.produce(station);
            if amount <= 0.0 {
                continue;
            }
            debug!(%station, amount, "station.produced");
            events.push(GameEvent::new(
                ctx.elapsed_ms,
                GameEventKind::Produced { station, amount },
            ));
        }
        Ok(())
    }
}

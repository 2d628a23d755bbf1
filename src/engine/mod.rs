//! Discrete-event driver for the periodic systems.
//!
//! Each registered [`System`] fires every `interval_ms` of simulated time. The
//! engine keeps one pending entry per system in a min-heap ordered by fire
//! time, then by registration order, and is moved forward by an external clock
//! through [`Engine::advance_to`].

mod queue;

use anyhow::Result;
use tracing::{debug, info};

use crate::{events::GameEvent, state::GameState};

pub use queue::{EventQueue, Scheduled};

pub struct EngineSettings {
    pub scenario_name: String,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            systems: self.systems,
            queue: EventQueue::new(),
            clock_ms: 0,
            started_at_ms: 0,
            settings: self.settings,
        }
    }
}

pub struct Engine {
    systems: Vec<Box<dyn System>>,
    queue: EventQueue,
    clock_ms: u64,
    started_at_ms: u64,
    settings: EngineSettings,
}

impl Engine {
    /// Drops anything pending and schedules every system one interval after
    /// `now_ms`. Game time is measured from this point.
    pub fn start(&mut self, now_ms: u64) {
        self.queue.clear();
        self.clock_ms = now_ms;
        self.started_at_ms = now_ms;
        for (slot, system) in self.systems.iter().enumerate() {
            self.queue.schedule(now_ms.saturating_add(period(&**system)), slot);
        }
        info!(
            scenario = %self.settings.scenario_name,
            systems = self.systems.len(),
            at_ms = now_ms,
            "engine.started"
        );
    }

    /// Runs every system due at or before `target_ms`, in time order, then
    /// moves the clock to `target_ms`.
    ///
    /// Once the state reports game over all pending work is dropped and the
    /// clock stays at the moment the game ended. Targets in the past are
    /// ignored.
    pub fn advance_to(&mut self, state: &mut GameState, target_ms: u64) -> Result<Vec<GameEvent>> {
        let mut events = Vec::new();
        if target_ms < self.clock_ms || state.is_over() {
            return Ok(events);
        }

        while let Some(due) = self.queue.pop_if_ready(target_ms) {
            self.clock_ms = due.fire_at_ms;
            state.set_elapsed_ms(self.clock_ms - self.started_at_ms);

            let system = &mut self.systems[due.slot];
            let ctx = SystemContext {
                now_ms: self.clock_ms,
                elapsed_ms: state.elapsed_ms(),
                scenario_name: &self.settings.scenario_name,
            };
            debug!(system = system.name(), at_ms = ctx.now_ms, "system.run");
            let outcome = system.run(&ctx, state, &mut events);
            let next = due.fire_at_ms.saturating_add(period(&**system));
            if let Err(err) = outcome {
                self.queue.schedule(next, due.slot);
                return Err(err.context(format!(
                    "system {} failed at {} ms",
                    system.name(),
                    self.clock_ms
                )));
            }

            if state.is_over() {
                self.queue.clear();
                info!(
                    scenario = %self.settings.scenario_name,
                    at_ms = self.clock_ms,
                    "engine.halted"
                );
                return Ok(events);
            }

            self.queue.schedule(next, due.slot);
        }

        self.clock_ms = target_ms;
        state.set_elapsed_ms(self.clock_ms - self.started_at_ms);
        Ok(events)
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn is_running(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Fire time of the next pending system run, if any.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.peek_time()
    }
}

/// A zero interval would refire at the same instant forever.
fn period(system: &dyn System) -> u64 {
    system.interval_ms().max(1)
}

pub struct SystemContext<'a> {
    pub now_ms: u64,
    /// Simulated time since the current game started.
    pub elapsed_ms: u64,
    pub scenario_name: &'a str,
}

pub trait System: Send {
    fn name(&self) -> &str;
    fn interval_ms(&self) -> u64;
    fn run(
        &mut self,
        ctx: &SystemContext,
        state: &mut GameState,
        events: &mut Vec<GameEvent>,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        name: &'static str,
        interval_ms: u64,
        log: Arc<Mutex<Vec<(&'static str, u64)>>>,
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn interval_ms(&self) -> u64 {
            self.interval_ms
        }

        fn run(
            &mut self,
            ctx: &SystemContext,
            _state: &mut GameState,
            _events: &mut Vec<GameEvent>,
        ) -> Result<()> {
            self.log.lock().unwrap().push((self.name, ctx.now_ms));
            Ok(())
        }
    }

    struct Doom;

    impl System for Doom {
        fn name(&self) -> &str {
            "doom"
        }

        fn interval_ms(&self) -> u64 {
            1_000
        }

        fn run(
            &mut self,
            _ctx: &SystemContext,
            state: &mut GameState,
            _events: &mut Vec<GameEvent>,
        ) -> Result<()> {
            state.finish();
            Ok(())
        }
    }

    struct Flaky {
        runs: u32,
    }

    impl System for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        fn interval_ms(&self) -> u64 {
            1_000
        }

        fn run(
            &mut self,
            _ctx: &SystemContext,
            _state: &mut GameState,
            _events: &mut Vec<GameEvent>,
        ) -> Result<()> {
            self.runs += 1;
            anyhow::ensure!(self.runs != 2, "second run fails");
            Ok(())
        }
    }

    fn settings() -> EngineSettings {
        EngineSettings {
            scenario_name: "test".into(),
        }
    }

    #[test]
    fn systems_fire_in_time_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut engine = EngineBuilder::new(settings())
            .with_system(Recorder {
                name: "slow",
                interval_ms: 3_000,
                log: log.clone(),
            })
            .with_system(Recorder {
                name: "fast",
                interval_ms: 2_000,
                log: log.clone(),
            })
            .build();
        let mut state = GameState::from_scenario(&Scenario::default());
        engine.start(0);
        engine.advance_to(&mut state, 6_000).unwrap();

        let fired = log.lock().unwrap().clone();
        assert_eq!(
            fired,
            vec![
                ("fast", 2_000),
                ("slow", 3_000),
                ("fast", 4_000),
                ("slow", 6_000),
                ("fast", 6_000),
            ]
        );
        assert_eq!(engine.clock_ms(), 6_000);
        assert_eq!(state.elapsed_ms(), 6_000);
        assert_eq!(engine.next_due_ms(), Some(8_000));
    }

    #[test]
    fn advancing_in_small_steps_matches_one_big_step() {
        let run = |steps: &[u64]| {
            let log = Arc::new(Mutex::new(Vec::new()));
            let mut engine = EngineBuilder::new(settings())
                .with_system(Recorder {
                    name: "tick",
                    interval_ms: 700,
                    log: log.clone(),
                })
                .build();
            let mut state = GameState::from_scenario(&Scenario::default());
            engine.start(0);
            for &step in steps {
                engine.advance_to(&mut state, step).unwrap();
            }
            let fired = log.lock().unwrap().clone();
            fired
        };
        assert_eq!(run(&[5_000]), run(&[100, 1_400, 1_401, 3_333, 5_000]));
    }

    #[test]
    fn past_targets_are_ignored() {
        let mut engine = EngineBuilder::new(settings()).build();
        let mut state = GameState::from_scenario(&Scenario::default());
        engine.start(1_000);
        engine.advance_to(&mut state, 4_000).unwrap();
        let events = engine.advance_to(&mut state, 2_000).unwrap();
        assert!(events.is_empty());
        assert_eq!(engine.clock_ms(), 4_000);
        assert_eq!(state.elapsed_ms(), 3_000);
    }

    #[test]
    fn game_over_tears_down_the_schedule() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut engine = EngineBuilder::new(settings())
            .with_system(Doom)
            .with_system(Recorder {
                name: "after",
                interval_ms: 1_000,
                log: log.clone(),
            })
            .build();
        let mut state = GameState::from_scenario(&Scenario::default());
        engine.start(0);
        engine.advance_to(&mut state, 10_000).unwrap();

        assert!(state.is_over());
        assert!(!engine.is_running());
        assert_eq!(engine.clock_ms(), 1_000);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn zero_interval_fires_once_per_millisecond() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut engine = EngineBuilder::new(settings())
            .with_system(Recorder {
                name: "eager",
                interval_ms: 0,
                log: log.clone(),
            })
            .build();
        let mut state = GameState::from_scenario(&Scenario::default());
        engine.start(0);
        engine.advance_to(&mut state, 5).unwrap();

        let times: Vec<u64> = log.lock().unwrap().iter().map(|(_, at)| *at).collect();
        assert_eq!(times, vec![1, 2, 3, 4, 5]);
        assert_eq!(engine.next_due_ms(), Some(6));
    }

    #[test]
    fn failing_system_stays_scheduled() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut engine = EngineBuilder::new(settings())
            .with_system(Flaky { runs: 0 })
            .with_system(Recorder {
                name: "steady",
                interval_ms: 1_000,
                log: log.clone(),
            })
            .build();
        let mut state = GameState::from_scenario(&Scenario::default());
        engine.start(0);

        let err = engine.advance_to(&mut state, 3_000).unwrap_err();
        assert!(format!("{err:#}").contains("flaky"));
        assert_eq!(engine.clock_ms(), 2_000);
        assert_eq!(engine.next_due_ms(), Some(2_000));

        engine.advance_to(&mut state, 4_000).unwrap();
        let fired: Vec<u64> = log.lock().unwrap().iter().map(|(_, at)| *at).collect();
        assert_eq!(fired, vec![1_000, 2_000, 3_000, 4_000]);
        assert!(engine.is_running());
    }
}

pub mod command;
pub mod economy;
pub mod engine;
pub mod error;
pub mod events;
pub mod furnace;
pub mod logging;
pub mod resources;
pub mod scenario;
pub mod session;
pub mod state;
pub mod station;
pub mod systems;
pub mod web;

pub use command::Command;
pub use economy::UpgradeTarget;
pub use error::CommandError;
pub use events::{GameEvent, GameEventKind};
pub use scenario::{Scenario, ScenarioLoader};
pub use session::{Scene, Session};
pub use state::{GameState, GameSummary, StateSnapshot};
pub use station::StationKind;

mod bookkeeping;
mod climate;
mod exposure;
mod furnace;
mod production;

pub use bookkeeping::BookkeepingSystem;
pub use climate::CoolingSystem;
pub use exposure::ExposureSystem;
pub use furnace::FurnaceSystem;
pub use production::ProductionSystem;

use crate::{
    engine::{Engine, EngineBuilder, EngineSettings},
    scenario::Scenario,
};

/// The full set of periodic systems, registered in the order they resolve
/// when several fall due at the same instant.
pub fn standard_engine(scenario: &Scenario) -> Engine {
    let schedule = &scenario.schedule;
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
    };
    EngineBuilder::new(settings)
        .with_system(CoolingSystem::new(schedule.cooling_ms))
        .with_system(FurnaceSystem::new(schedule.furnace_ms))
        .with_system(ProductionSystem::new(schedule.production_ms))
        .with_system(ExposureSystem::new(schedule.exposure_ms))
        .with_system(BookkeepingSystem::new(schedule.bookkeeping_ms))
        .build()
}

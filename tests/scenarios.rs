use endless_winter::scenario::{
    ProductionRounding, Scenario, ScenarioLoader, WorkerLossPolicy,
};

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn frostbite_preset_matches_built_in_balance() {
    let mut loaded = scenario_loader()
        .load("scenarios/frostbite.yaml")
        .unwrap();
    assert!(loaded.description.is_some());
    loaded.description = None;
    assert_eq!(loaded, Scenario::frostbite());
}

#[test]
fn classic_preset_uses_its_own_rules() {
    let classic = scenario_loader().load("scenarios/classic.yaml").unwrap();
    assert_eq!(classic.name, "classic");
    assert_eq!(classic.resources.survivors, 8);
    assert_eq!(classic.rules.worker_loss, WorkerLossPolicy::IdleFirst);
    assert_eq!(
        classic.rules.production_rounding,
        ProductionRounding::Exact
    );
    assert_eq!(classic.schedule.production_ms, 1_000);

    let cost = classic.furnace.upgrade_cost.at(1);
    assert_eq!(cost.wood, 35.0);
    assert_eq!(cost.coal, 20.0);
}

#[test]
fn missing_preset_reports_the_path() {
    let err = scenario_loader()
        .load("scenarios/does_not_exist.yaml")
        .unwrap_err();
    assert!(format!("{err:#}").contains("does_not_exist.yaml"));
}

//! Integration tests: loaded tables and scenarios fed through the engines.

use std::fs::File;
use std::path::PathBuf;

use fisc_core::calculations::common::round_cents;
use fisc_core::{BracketTable, BracketTableError, BracketTaxEngine, IncomeTaxParameters};
use fisc_data::{BracketLoader, BracketLoaderError, ScenarioLoader, SimulationSlot};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> File {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    File::open(&path).unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()))
}

#[test]
fn test_loaded_table_equals_builtin_2025() {
    let table = BracketLoader::load_table(fixture("brackets_2025.csv")).expect("Failed to load");

    assert_eq!(table, BracketTable::quotient_familial_2025());
}

#[test]
fn test_gap_fixture_is_rejected() {
    let err = BracketLoader::load_table(fixture("brackets_gap.csv")).expect_err("Should fail");

    assert_eq!(
        err,
        BracketLoaderError::InvalidTable(BracketTableError::Discontinuous {
            index: 2,
            expected: dec!(29315),
            found: dec!(30000),
        })
    );
}

#[test]
fn test_scenarios_computed_with_loaded_table() {
    let table = BracketLoader::load_table(fixture("brackets_2025.csv")).expect("Failed to load");
    let scenarios = ScenarioLoader::parse(fixture("scenarios.csv")).expect("Failed to parse");
    let params = IncomeTaxParameters::default();
    let engine = BracketTaxEngine::with_brackets(&params, &table);

    assert_eq!(scenarios.len(), 3);

    let sim1 = engine.compute(&scenarios[0].inputs);
    assert_eq!(scenarios[0].slot, SimulationSlot::Simulation1);
    assert_eq!(round_cents(sim1.final_tax), dec!(2165.48));
    assert_eq!(round_cents(sim1.net_monthly), dec!(2319.54));

    // 27000 taxable: 1705.33 gross tax, 117.34 rebate
    let sim2 = engine.compute(&scenarios[1].inputs);
    assert_eq!(scenarios[1].slot, SimulationSlot::Simulation2);
    assert_eq!(sim2.taxable_income, dec!(27000));
    assert_eq!(round_cents(sim2.final_tax), dec!(1587.99));
}

#[test]
fn test_current_scenario_carries_household_flags() {
    let scenarios = ScenarioLoader::parse(fixture("scenarios.csv")).expect("Failed to parse");

    let current = &scenarios[2];
    assert_eq!(current.slot, SimulationSlot::Current);
    assert_eq!(current.inputs.parts, dec!(2));
    assert!(current.inputs.standard_deduction);
    assert!(current.inputs.is_couple);
    assert_eq!(current.inputs.childcare_cost, dec!(1500));
}

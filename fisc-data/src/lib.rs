//! CSV loaders for bracket tables and simulation scenarios.

mod brackets;
mod scenarios;

pub use brackets::{BracketLoader, BracketLoaderError, BracketRecord};
pub use scenarios::{Scenario, ScenarioLoadError, ScenarioLoader, SimulationSlot};

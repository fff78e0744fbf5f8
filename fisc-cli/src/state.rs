//! Session state for the `fisc` shell.
//!
//! Holds the last income tax result per simulation slot, plus the last
//! payroll and borrowing results, so commands can compare and chain them.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use fisc_core::calculations::{BorrowingResult, PayrollResult, TaxResult};
use rust_decimal::Decimal;

pub use fisc_data::SimulationSlot;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    simulations: BTreeMap<SimulationSlot, TaxResult>,
    pub payroll: Option<PayrollResult>,
    pub borrowing: Option<BorrowingResult>,
}

/// Headline figures of one side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSummary {
    pub final_tax: Decimal,
    pub net_monthly: Decimal,
    pub parts: Decimal,
}

impl From<&TaxResult> for SimulationSummary {
    fn from(result: &TaxResult) -> Self {
        Self {
            final_tax: result.final_tax,
            net_monthly: result.net_monthly,
            parts: result.parts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailComparison {
    pub label: String,
    pub first: Decimal,
    pub second: Decimal,
}

impl DetailComparison {
    pub fn delta(&self) -> Decimal {
        self.second - self.first
    }
}

/// Simulation 1 against Simulation 2. Deltas are `second - first`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationComparison {
    pub first: SimulationSummary,
    pub second: SimulationSummary,
    pub details: Vec<DetailComparison>,
}

impl SimulationComparison {
    pub fn final_tax_delta(&self) -> Decimal {
        self.second.final_tax - self.first.final_tax
    }

    pub fn net_monthly_delta(&self) -> Decimal {
        self.second.net_monthly - self.first.net_monthly
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `result` under `slot`, replacing any previous result there.
    pub fn store_simulation(
        &mut self,
        slot: SimulationSlot,
        result: TaxResult,
    ) -> &TaxResult {
        match self.simulations.entry(slot) {
            Entry::Occupied(mut entry) => {
                entry.insert(result);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(result),
        }
    }

    pub fn simulation(
        &self,
        slot: SimulationSlot,
    ) -> Option<&TaxResult> {
        self.simulations.get(&slot)
    }

    /// Compares the two named simulations, or `None` until both exist.
    pub fn compare(&self) -> Option<SimulationComparison> {
        let first = self.simulation(SimulationSlot::Simulation1)?;
        let second = self.simulation(SimulationSlot::Simulation2)?;

        // Both ledgers come from the same engine, so labels line up.
        let details = first
            .details
            .iter()
            .zip(&second.details)
            .map(|(a, b)| DetailComparison {
                label: a.label.clone(),
                first: a.amount,
                second: b.amount,
            })
            .collect();

        Some(SimulationComparison {
            first: first.into(),
            second: second.into(),
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fisc_core::{BracketTaxEngine, IncomeTaxParameters, TaxInputs};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn compute(inputs: TaxInputs) -> TaxResult {
        let params = IncomeTaxParameters::default();
        BracketTaxEngine::new(&params).compute(&inputs)
    }

    fn salary(amount: Decimal) -> TaxInputs {
        TaxInputs {
            salary: amount,
            ..TaxInputs::default()
        }
    }

    #[test]
    fn compare_requires_both_simulations() {
        let mut state = AppState::new();
        assert!(state.compare().is_none());

        state.store_simulation(SimulationSlot::Simulation1, compute(salary(dec!(30000))));
        assert!(state.compare().is_none());

        state.store_simulation(SimulationSlot::Current, compute(salary(dec!(40000))));
        assert!(state.compare().is_none());
    }

    #[test]
    fn compare_reports_second_minus_first() {
        let mut state = AppState::new();
        state.store_simulation(SimulationSlot::Simulation1, compute(salary(dec!(30000))));
        state.store_simulation(SimulationSlot::Simulation2, compute(salary(dec!(40000))));

        let comparison = state.compare().expect("both slots filled");

        // 5165.48 - 2165.48
        assert_eq!(comparison.final_tax_delta().round_dp(2), dec!(3000.00));
        assert_eq!(comparison.first.parts, dec!(1));
        assert_eq!(comparison.details.len(), 11);
        assert_eq!(comparison.details[0].label, "Initial salaried income");
        assert_eq!(comparison.details[0].delta(), dec!(10000));
    }

    #[test]
    fn store_replaces_previous_result() {
        let mut state = AppState::new();
        state.store_simulation(SimulationSlot::Current, compute(salary(dec!(30000))));
        state.store_simulation(SimulationSlot::Current, compute(salary(dec!(10000))));

        let current = state.simulation(SimulationSlot::Current).expect("stored");
        assert_eq!(current.salary, dec!(10000));
    }
}

//! Command handlers: validate inputs, run an engine, record the result.

use fisc_core::calculations::{
    BorrowingResult, PayrollResult, RatePoint, TaxRateSummary, TaxResult,
};
use fisc_core::{
    BorrowingCapacityCalculator, BorrowingInputs, BorrowingInputsError, BracketTable,
    BracketTaxEngine, FiscalParameters, PayrollEngine, PayrollInputs, PayrollInputsError,
    TaxInputs, TaxInputsError, TaxRateAnalyzer,
};
use fisc_data::Scenario;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::settings::{RateTable, Settings};
use crate::state::{AppState, SimulationSlot};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("invalid income tax inputs: {0}")]
    TaxInputs(#[from] TaxInputsError),

    #[error("invalid payroll inputs: {0}")]
    PayrollInputs(#[from] PayrollInputsError),

    #[error("invalid borrowing inputs: {0}")]
    BorrowingInputs(#[from] BorrowingInputsError),

    #[error(
        "rate curve from 0 to {max_income} by {step} exceeds {limit} points",
        limit = CurveRequest::MAX_POINTS
    )]
    CurveTooLarge { max_income: Decimal, step: Decimal },
}

/// Curve sampling requested by the `rates` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveRequest {
    pub max_income: Decimal,
    pub step: Decimal,
}

impl CurveRequest {
    pub const MAX_POINTS: u32 = 1000;

    /// Rejects requests sampling more than [`Self::MAX_POINTS`] incomes.
    /// A non-positive step passes; it produces an empty curve.
    fn check(&self) -> Result<(), AppError> {
        if self.step <= Decimal::ZERO {
            return Ok(());
        }
        let within = self
            .max_income
            .checked_div(self.step)
            .is_some_and(|intervals| intervals < Decimal::from(Self::MAX_POINTS));
        if within {
            Ok(())
        } else {
            Err(AppError::CurveTooLarge {
                max_income: self.max_income,
                step: self.step,
            })
        }
    }
}

pub struct App {
    params: FiscalParameters,
    rate_table: RateTable,
    pub state: AppState,
}

impl App {
    /// Builds the application from settings. `brackets`, when given,
    /// replaces the income tax bracket table.
    pub fn new(
        settings: Settings,
        brackets: Option<BracketTable>,
    ) -> Self {
        let mut params = settings.parameters;
        if let Some(brackets) = brackets {
            info!(brackets = brackets.len(), "Using custom income tax bracket table");
            params.income_tax.brackets = brackets;
        }
        Self {
            params,
            rate_table: settings.rate_table,
            state: AppState::new(),
        }
    }

    pub fn params(&self) -> &FiscalParameters {
        &self.params
    }

    /// Computes income tax and stores the result under `slot`.
    pub fn income(
        &mut self,
        inputs: &TaxInputs,
        slot: SimulationSlot,
    ) -> Result<&TaxResult, AppError> {
        inputs.validate()?;
        let result = BracketTaxEngine::new(&self.params.income_tax).compute(inputs);
        debug!(slot = slot.as_str(), final_tax = %result.final_tax, "Simulation stored");
        Ok(self.state.store_simulation(slot, result))
    }

    pub fn payroll(
        &mut self,
        inputs: &PayrollInputs,
    ) -> Result<&PayrollResult, AppError> {
        inputs.validate()?;
        let result = PayrollEngine::new(&self.params.payroll).compute(inputs);
        Ok(&*self.state.payroll.insert(result))
    }

    /// Feeds the last payroll result into the income tax engine as annual
    /// salaried income, storing it under [`SimulationSlot::Current`].
    /// Returns `None` when no payroll has been computed.
    pub fn income_from_payroll(
        &mut self,
        parts: Decimal,
    ) -> Option<Result<&TaxResult, AppError>> {
        let salary = self.state.payroll.as_ref()?.annual_net_taxable();
        let inputs = TaxInputs {
            salary,
            parts,
            ..TaxInputs::default()
        };
        Some(self.income(&inputs, SimulationSlot::Current))
    }

    pub fn borrow(
        &mut self,
        inputs: &BorrowingInputs,
    ) -> Result<&BorrowingResult, AppError> {
        inputs.validate()?;
        let result = BorrowingCapacityCalculator::new(&self.params.borrowing).compute(inputs);
        Ok(&*self.state.borrowing.insert(result))
    }

    /// Rate summary for `taxable_income`, plus a curve when requested.
    pub fn rates(
        &self,
        taxable_income: Decimal,
        parts: Decimal,
        curve: Option<CurveRequest>,
    ) -> Result<(TaxRateSummary, Vec<RatePoint>), AppError> {
        TaxInputs {
            salary: taxable_income,
            parts,
            ..TaxInputs::default()
        }
        .validate()?;

        if let Some(request) = &curve {
            request.check()?;
        }

        let brackets = self.rate_table.select(&self.params.income_tax);
        let analyzer = TaxRateAnalyzer::with_brackets(&self.params.income_tax, brackets);
        let summary = analyzer.analyze(taxable_income, parts);
        let points = match curve {
            Some(request) => {
                if request.step <= Decimal::ZERO {
                    warn!(step = %request.step, "Curve step must be positive, no curve produced");
                }
                analyzer.curve(request.max_income, request.step, parts)
            }
            None => Vec::new(),
        };
        Ok((summary, points))
    }

    /// Computes every scenario into its slot, in order; a later row for
    /// the same slot replaces an earlier one.
    pub fn load_scenarios(
        &mut self,
        scenarios: &[Scenario],
    ) -> Result<usize, AppError> {
        for scenario in scenarios {
            self.income(&scenario.inputs, scenario.slot)?;
        }
        Ok(scenarios.len())
    }
}

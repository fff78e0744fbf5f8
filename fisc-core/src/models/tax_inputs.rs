use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MAX_AMOUNT;

/// Errors reported by [`TaxInputs::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxInputsError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} must not exceed {max}, got {value}", max = MAX_AMOUNT)]
    TooLarge { field: &'static str, value: Decimal },

    #[error("household parts must be at least 1, got {0}")]
    PartsBelowOne(Decimal),

    #[error("household parts must be a multiple of 0.5, got {0}")]
    PartsNotHalfStep(Decimal),
}

/// Household income and adjustments for one income tax simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInputs {
    /// Annual salaried income.
    pub salary: Decimal,
    /// Annual auto-entrepreneur revenue (before the micro-regime abatement).
    pub auto_entrepreneur_revenue: Decimal,
    /// Household parts ("quotient familial"), at least 1 in steps of 0.5.
    pub parts: Decimal,
    /// Apply the flat 10% reduction on salaried income.
    pub standard_deduction: bool,
    /// Family aid and donations deducted from taxable income.
    pub family_aid: Decimal,
    /// Childcare costs, half of which is credited against the tax.
    pub childcare_cost: Decimal,
    /// Married or civil-partnered household (changes the rebate threshold).
    pub is_couple: bool,
}

impl Default for TaxInputs {
    fn default() -> Self {
        Self {
            salary: Decimal::ZERO,
            auto_entrepreneur_revenue: Decimal::ZERO,
            parts: Decimal::ONE,
            standard_deduction: false,
            family_aid: Decimal::ZERO,
            childcare_cost: Decimal::ZERO,
            is_couple: false,
        }
    }
}

impl TaxInputs {
    /// Checks the ranges the input form enforces.
    ///
    /// The engine does not call this; callers validate before computing.
    ///
    /// # Errors
    ///
    /// Returns [`TaxInputsError`] on the first negative amount or amount
    /// above [`MAX_AMOUNT`], or when `parts` is below 1 or not a multiple
    /// of 0.5.
    pub fn validate(&self) -> Result<(), TaxInputsError> {
        let amounts = [
            ("salary", self.salary),
            ("auto_entrepreneur_revenue", self.auto_entrepreneur_revenue),
            ("family_aid", self.family_aid),
            ("childcare_cost", self.childcare_cost),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(TaxInputsError::Negative { field, value });
            }
            if value > MAX_AMOUNT {
                return Err(TaxInputsError::TooLarge { field, value });
            }
        }

        if self.parts < Decimal::ONE {
            return Err(TaxInputsError::PartsBelowOne(self.parts));
        }
        if !(self.parts % dec!(0.5)).is_zero() {
            return Err(TaxInputsError::PartsNotHalfStep(self.parts));
        }

        Ok(())
    }
}

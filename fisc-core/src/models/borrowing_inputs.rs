use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MAX_AMOUNT;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BorrowingInputsError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} must not exceed {max}, got {value}", max = MAX_AMOUNT)]
    TooLarge { field: &'static str, value: Decimal },

    #[error("rental inclusion rate must be between 0 and 100, got {0}")]
    InvalidInclusionRate(Decimal),

    #[error("annual interest rate must be between 0.1 and 10, got {0}")]
    InvalidAnnualRate(Decimal),

    #[error("loan term must be between 5 and 30 years, got {0}")]
    InvalidTerm(u32),
}

/// Inputs of a borrowing-capacity estimate. Percentages are expressed
/// in percent (4 = 4%), as typed in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowingInputs {
    pub net_monthly_income: Decimal,
    pub existing_monthly_payment: Decimal,
    pub rental_gross_income: Decimal,
    /// Share of rental income counted as income, in percent.
    pub rental_inclusion_rate: Decimal,
    /// Nominal annual interest rate, in percent.
    pub annual_rate: Decimal,
    pub term_years: u32,
}

impl BorrowingInputs {
    /// Builds inputs around a net monthly income taken from either
    /// engine (`TaxResult::net_monthly` or `PayrollResult::net_paid`),
    /// without rental income.
    pub fn from_net_monthly(
        net_monthly_income: Decimal,
        existing_monthly_payment: Decimal,
        annual_rate: Decimal,
        term_years: u32,
    ) -> Self {
        Self {
            net_monthly_income,
            existing_monthly_payment,
            rental_gross_income: Decimal::ZERO,
            rental_inclusion_rate: Decimal::ZERO,
            annual_rate,
            term_years,
        }
    }

    /// Adds rental income weighted by `inclusion_rate` percent.
    pub fn with_rental_income(
        self,
        rental_gross_income: Decimal,
        inclusion_rate: Decimal,
    ) -> Self {
        Self {
            rental_gross_income,
            rental_inclusion_rate: inclusion_rate,
            ..self
        }
    }

    /// # Errors
    ///
    /// Returns [`BorrowingInputsError`] for negative amounts or amounts
    /// above [`MAX_AMOUNT`], an inclusion rate outside 0–100, an annual
    /// rate outside 0.1–10 or a term outside 5–30 years.
    pub fn validate(&self) -> Result<(), BorrowingInputsError> {
        let amounts = [
            ("net_monthly_income", self.net_monthly_income),
            ("existing_monthly_payment", self.existing_monthly_payment),
            ("rental_gross_income", self.rental_gross_income),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(BorrowingInputsError::Negative { field, value });
            }
            if value > MAX_AMOUNT {
                return Err(BorrowingInputsError::TooLarge { field, value });
            }
        }
        if self.rental_inclusion_rate < Decimal::ZERO || self.rental_inclusion_rate > dec!(100) {
            return Err(BorrowingInputsError::InvalidInclusionRate(
                self.rental_inclusion_rate,
            ));
        }
        if self.annual_rate < dec!(0.1) || self.annual_rate > dec!(10) {
            return Err(BorrowingInputsError::InvalidAnnualRate(self.annual_rate));
        }
        if !(5..=30).contains(&self.term_years) {
            return Err(BorrowingInputsError::InvalidTerm(self.term_years));
        }
        Ok(())
    }
}

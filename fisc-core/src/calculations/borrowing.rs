//! Borrowing capacity under the 35% debt-to-income ceiling.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | total income = net monthly + rental × inclusion rate |
//! | 2    | capacity = `max(0, total × 35% - existing payments)` |
//! | 3    | principal = `capacity × (1 - (1 + i)^-n) / i`, `i` monthly, `n` months |
//!
//! A zero monthly rate falls back to `capacity × n`.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::non_negative;
use crate::{BorrowingInputs, BorrowingParameters};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowingResult {
    pub total_income: Decimal,
    pub monthly_capacity: Decimal,
    pub max_principal: Decimal,
    pub months: u32,
    pub monthly_rate: Decimal,
}

#[derive(Debug, Clone)]
pub struct BorrowingCapacityCalculator<'a> {
    params: &'a BorrowingParameters,
}

impl<'a> BorrowingCapacityCalculator<'a> {
    pub fn new(params: &'a BorrowingParameters) -> Self {
        Self { params }
    }

    /// Never fails for inputs that pass [`BorrowingInputs::validate`].
    pub fn compute(
        &self,
        inputs: &BorrowingInputs,
    ) -> BorrowingResult {
        // Step 1
        let total_income = self.total_income(inputs);

        // Step 2
        let monthly_capacity = self.monthly_capacity(total_income, inputs);

        // Step 3
        let months = inputs.term_years * 12;
        let monthly_rate = inputs.annual_rate / dec!(100) / dec!(12);
        let max_principal = present_value(monthly_capacity, monthly_rate, months);

        debug!(
            total_income = %total_income,
            monthly_capacity = %monthly_capacity,
            max_principal = %max_principal,
            months,
            "Borrowing capacity computed"
        );

        BorrowingResult {
            total_income,
            monthly_capacity,
            max_principal,
            months,
            monthly_rate,
        }
    }

    fn total_income(
        &self,
        inputs: &BorrowingInputs,
    ) -> Decimal {
        inputs.net_monthly_income
            + inputs.rental_gross_income * inputs.rental_inclusion_rate / dec!(100)
    }

    fn monthly_capacity(
        &self,
        total_income: Decimal,
        inputs: &BorrowingInputs,
    ) -> Decimal {
        let raw = total_income * self.params.debt_to_income_ceiling
            - inputs.existing_monthly_payment;
        if raw < Decimal::ZERO {
            warn!(
                raw_capacity = %raw,
                existing_monthly_payment = %inputs.existing_monthly_payment,
                "Existing payments exceed the debt-to-income ceiling, capacity set to zero"
            );
        }
        non_negative(raw)
    }
}

/// Present value of `months` constant payments at `monthly_rate`.
fn present_value(
    payment: Decimal,
    monthly_rate: Decimal,
    months: u32,
) -> Decimal {
    if monthly_rate.is_zero() {
        return payment * Decimal::from(months);
    }
    let growth = (Decimal::ONE + monthly_rate).powi(i64::from(months));
    payment * (Decimal::ONE - Decimal::ONE / growth) / monthly_rate
}

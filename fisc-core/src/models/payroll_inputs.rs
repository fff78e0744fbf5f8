use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MAX_AMOUNT;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollInputsError {
    #[error("gross monthly salary must be non-negative, got {0}")]
    NegativeGross(Decimal),

    #[error("gross monthly salary must not exceed {max}, got {0}", max = MAX_AMOUNT)]
    GrossTooLarge(Decimal),
}

/// Which unemployment-insurance rate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionRegime {
    BeforeMay2025,
    #[default]
    FromMay2025,
}

/// Employment situation flags driving the rate selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollOptions {
    /// Executive ("cadre") status: APEC and the executive provident scheme.
    pub is_executive: bool,
    /// Alsace-Moselle local regime: employee health surcharge.
    pub alsace_moselle: bool,
    /// Gross above 2.5 × SMIC: full employer health rate.
    pub above_2_5_smic: bool,
    /// Gross above 3.5 × SMIC: full family-allowance rate.
    pub above_3_5_smic: bool,
    /// Employer headcount of 50 or more: uncapped housing contribution.
    pub headcount_50_plus: bool,
    pub regime: ContributionRegime,
}

impl Default for PayrollOptions {
    fn default() -> Self {
        Self {
            is_executive: true,
            alsace_moselle: false,
            above_2_5_smic: true,
            above_3_5_smic: false,
            headcount_50_plus: false,
            regime: ContributionRegime::FromMay2025,
        }
    }
}

impl PayrollOptions {
    /// Sets both wage-multiple flags from the gross salary.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fisc_core::{PayrollOptions, SMIC_MONTHLY_2025};
    ///
    /// let options = PayrollOptions::default().infer_wage_multiples(dec!(6000), SMIC_MONTHLY_2025);
    ///
    /// assert!(options.above_2_5_smic);
    /// assert!(!options.above_3_5_smic);
    /// ```
    pub fn infer_wage_multiples(
        self,
        gross_monthly: Decimal,
        smic_monthly: Decimal,
    ) -> Self {
        Self {
            above_2_5_smic: gross_monthly > smic_monthly * dec!(2.5),
            above_3_5_smic: gross_monthly > smic_monthly * dec!(3.5),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInputs {
    pub gross_monthly: Decimal,
    pub options: PayrollOptions,
}

impl PayrollInputs {
    pub fn new(
        gross_monthly: Decimal,
        options: PayrollOptions,
    ) -> Self {
        Self {
            gross_monthly,
            options,
        }
    }

    /// # Errors
    ///
    /// Returns [`PayrollInputsError::NegativeGross`] for a negative salary
    /// and [`PayrollInputsError::GrossTooLarge`] above [`MAX_AMOUNT`].
    pub fn validate(&self) -> Result<(), PayrollInputsError> {
        if self.gross_monthly < Decimal::ZERO {
            return Err(PayrollInputsError::NegativeGross(self.gross_monthly));
        }
        if self.gross_monthly > MAX_AMOUNT {
            return Err(PayrollInputsError::GrossTooLarge(self.gross_monthly));
        }
        Ok(())
    }
}

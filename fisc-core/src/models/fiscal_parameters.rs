use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{BracketTable, PayrollRates};

/// Rebate ("décote") rule for one household type.
///
/// The rebate is `max(0, threshold - rate × total_tax)`. When
/// `eligibility_ceiling` is set, households whose total tax reaches the
/// ceiling get no rebate at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateRule {
    pub threshold: Decimal,
    #[serde(default)]
    pub eligibility_ceiling: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebateRules {
    /// Share of the total tax subtracted from the threshold (45.25%).
    pub rate: Decimal,
    pub single: RebateRule,
    pub couple: RebateRule,
}

impl RebateRules {
    pub fn for_household(
        &self,
        is_couple: bool,
    ) -> &RebateRule {
        if is_couple { &self.couple } else { &self.single }
    }
}

impl Default for RebateRules {
    fn default() -> Self {
        Self {
            rate: dec!(0.4525),
            single: RebateRule {
                threshold: dec!(889),
                eligibility_ceiling: None,
            },
            couple: RebateRule {
                threshold: dec!(1470),
                eligibility_ceiling: None,
            },
        }
    }
}

/// Tunables of the quotient-familial income tax computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeTaxParameters {
    /// Flat reduction applied to salaried income when requested (10%).
    pub standard_deduction_rate: Decimal,
    /// Micro-regime abatement on auto-entrepreneur revenue (34%).
    pub auto_entrepreneur_abatement: Decimal,
    /// Share of childcare costs credited against the tax (50%).
    pub childcare_credit_rate: Decimal,
    pub rebate: RebateRules,
    pub brackets: BracketTable,
    pub visualization_brackets: BracketTable,
}

impl Default for IncomeTaxParameters {
    fn default() -> Self {
        Self {
            standard_deduction_rate: dec!(0.10),
            auto_entrepreneur_abatement: dec!(0.34),
            childcare_credit_rate: dec!(0.50),
            rebate: RebateRules::default(),
            brackets: BracketTable::quotient_familial_2025(),
            visualization_brackets: BracketTable::rate_visualization(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorrowingParameters {
    /// Maximum share of income that may go to loan repayments (35%).
    pub debt_to_income_ceiling: Decimal,
}

impl Default for BorrowingParameters {
    fn default() -> Self {
        Self {
            debt_to_income_ceiling: dec!(0.35),
        }
    }
}

/// Every fixed value the engines read, grouped for injection.
///
/// `Default` yields the 2025 parameters. Partial TOML overrides are
/// supported since each section falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FiscalParameters {
    pub income_tax: IncomeTaxParameters,
    pub payroll: PayrollRates,
    pub borrowing: BorrowingParameters,
}

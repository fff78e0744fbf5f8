//! Marginal, nominal and effective income tax rates.
//!
//! - marginal: rate of the bracket the quotient falls in
//! - nominal: gross tax from the bracket walk over taxable income
//! - effective: final tax (after rebate) over taxable income

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::ratio;
use crate::calculations::income_tax::{BracketTaxEngine, walk_brackets};
use crate::{BracketTable, IncomeTaxParameters, TaxInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRateSummary {
    pub quotient: Decimal,
    pub gross_tax: Decimal,
    pub marginal_rate: Decimal,
    pub nominal_rate: Decimal,
}

/// One sample of [`TaxRateAnalyzer::curve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePoint {
    pub income: Decimal,
    pub marginal_rate: Decimal,
    pub nominal_rate: Decimal,
    pub effective_rate: Decimal,
}

#[derive(Debug, Clone)]
pub struct TaxRateAnalyzer<'a> {
    params: &'a IncomeTaxParameters,
    brackets: &'a BracketTable,
}

impl<'a> TaxRateAnalyzer<'a> {
    /// Analyzer over `params.visualization_brackets`.
    pub fn new(params: &'a IncomeTaxParameters) -> Self {
        Self {
            params,
            brackets: &params.visualization_brackets,
        }
    }

    pub fn with_brackets(
        params: &'a IncomeTaxParameters,
        brackets: &'a BracketTable,
    ) -> Self {
        Self { params, brackets }
    }

    pub fn analyze(
        &self,
        taxable_income: Decimal,
        parts: Decimal,
    ) -> TaxRateSummary {
        let quotient = ratio(taxable_income, parts);
        let (tax_per_part, slices) = walk_brackets(quotient, self.brackets);
        let gross_tax = tax_per_part * parts;
        let marginal_rate = slices
            .last()
            .map(|slice| slice.rate)
            .unwrap_or(Decimal::ZERO);

        TaxRateSummary {
            quotient,
            gross_tax,
            marginal_rate,
            nominal_rate: ratio(gross_tax, taxable_income),
        }
    }

    /// `final_tax / income`, zero when income is not positive.
    pub fn effective_rate(
        final_tax: Decimal,
        income: Decimal,
    ) -> Decimal {
        ratio(final_tax, income)
    }

    /// Samples the three rates from zero to `max_income` inclusive.
    ///
    /// Incomes are treated as already taxable: no deduction, aid or
    /// childcare credit is applied. Returns an empty curve when `step`
    /// is not positive. Sampling stops early if the next income would leave
    /// `Decimal` range. Callers bound `max_income / step`; the point count is
    /// not capped here.
    pub fn curve(
        &self,
        max_income: Decimal,
        step: Decimal,
        parts: Decimal,
    ) -> Vec<RatePoint> {
        if step <= Decimal::ZERO {
            return Vec::new();
        }

        let engine = BracketTaxEngine::with_brackets(self.params, self.brackets);
        let mut points = Vec::new();
        let mut income = Decimal::ZERO;

        while income <= max_income {
            let summary = self.analyze(income, parts);
            let result = engine.compute(&TaxInputs {
                salary: income,
                parts,
                ..TaxInputs::default()
            });
            points.push(RatePoint {
                income,
                marginal_rate: summary.marginal_rate,
                nominal_rate: summary.nominal_rate,
                effective_rate: Self::effective_rate(result.final_tax, income),
            });
            income = match income.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }

        points
    }
}

//! Quotient-familial income tax computation.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Salary after the optional flat 10% reduction |
//! | 2    | Auto-entrepreneur revenue after the 34% micro-regime abatement |
//! | 3    | Taxable income (1 + 2) |
//! | 4    | Taxable income after family aid (may be negative) |
//! | 5    | Quotient: line 4 divided by household parts |
//! | 6    | Tax per part: progressive walk of the bracket table |
//! | 7    | Total tax: line 6 × parts |
//! | 8    | Rebate ("décote"): `max(0, threshold - 45.25% × line 7)` |
//! | 9    | Tax after rebate: `max(0, line 7 - line 8)` |
//! | 10   | Childcare offset: 50% of childcare costs |
//! | 11   | Final tax: `max(0, line 9 - line 10)` |
//! | 12   | Net income: line 4 - line 11, annual and monthly |
//!
//! Nothing is rounded along the way; only displays round to cents.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_core::{BracketTaxEngine, IncomeTaxParameters, TaxInputs};
//!
//! let params = IncomeTaxParameters::default();
//! let engine = BracketTaxEngine::new(&params);
//!
//! let result = engine.compute(&TaxInputs {
//!     salary: dec!(30000),
//!     ..TaxInputs::default()
//! });
//!
//! assert_eq!(result.tax_per_part, dec!(2165.48));
//! assert_eq!(result.rebate, dec!(0));
//! assert_eq!(result.final_tax, dec!(2165.48));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{non_negative, ratio};
use crate::{BracketTable, IncomeTaxParameters, TaxInputs};

/// Tax computed on one bracket during the walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub lower_bound: Decimal,
    /// The bracket's upper bound when fully consumed, otherwise the quotient.
    pub applied_upper: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// A labelled intermediate amount, in computation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLine {
    pub label: String,
    pub amount: Decimal,
}

/// Outcome of [`BracketTaxEngine::compute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub salary: Decimal,
    pub reduced_salary: Decimal,
    pub salary_reduction: Decimal,
    pub auto_entrepreneur_revenue: Decimal,
    pub auto_entrepreneur_income: Decimal,
    pub auto_entrepreneur_reduction: Decimal,
    pub taxable_income: Decimal,
    pub family_aid: Decimal,
    pub taxable_after_aid: Decimal,
    pub parts: Decimal,
    pub quotient: Decimal,
    pub tax_per_part: Decimal,
    pub total_tax: Decimal,
    pub rebate: Decimal,
    pub tax_after_rebate: Decimal,
    pub childcare_offset: Decimal,
    pub final_tax: Decimal,
    pub net_annual: Decimal,
    pub net_monthly: Decimal,
    pub brackets: Vec<BracketSlice>,
    pub details: Vec<DetailLine>,
}

impl TaxResult {
    /// Final tax over taxable income after aid; zero when that income is
    /// not positive.
    pub fn effective_rate(&self) -> Decimal {
        ratio(self.final_tax, self.taxable_after_aid)
    }

    /// Rate of the bracket the quotient ended in.
    pub fn marginal_rate(&self) -> Decimal {
        self.brackets
            .last()
            .map(|slice| slice.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Walks `table` in ascending order for `quotient`.
///
/// Brackets the quotient exceeds are fully consumed; the first bracket it
/// does not exceed is taxed on `quotient - lower_bound` and the walk stops
/// there. Returns the summed tax and one slice per visited bracket.
pub fn walk_brackets(
    quotient: Decimal,
    table: &BracketTable,
) -> (Decimal, Vec<BracketSlice>) {
    let mut total = Decimal::ZERO;
    let mut slices = Vec::new();

    for bracket in table.brackets() {
        match bracket.upper_bound {
            Some(upper) if quotient > upper => {
                let amount = (upper - bracket.lower_bound) * bracket.rate;
                total += amount;
                slices.push(BracketSlice {
                    lower_bound: bracket.lower_bound,
                    applied_upper: upper,
                    rate: bracket.rate,
                    amount,
                });
            }
            _ => {
                if quotient < bracket.lower_bound {
                    warn!(
                        quotient = %quotient,
                        lower_bound = %bracket.lower_bound,
                        "Quotient below the bracket it stopped in; slice amount is negative or zero"
                    );
                }
                let amount = (quotient - bracket.lower_bound) * bracket.rate;
                total += amount;
                slices.push(BracketSlice {
                    lower_bound: bracket.lower_bound,
                    applied_upper: quotient,
                    rate: bracket.rate,
                    amount,
                });
                break;
            }
        }
    }

    (total, slices)
}

/// Income tax engine over an injected bracket table and rebate rule.
#[derive(Debug, Clone)]
pub struct BracketTaxEngine<'a> {
    params: &'a IncomeTaxParameters,
    brackets: &'a BracketTable,
}

impl<'a> BracketTaxEngine<'a> {
    /// Creates an engine using `params.brackets` as the schedule.
    pub fn new(params: &'a IncomeTaxParameters) -> Self {
        Self {
            params,
            brackets: &params.brackets,
        }
    }

    /// Creates an engine walking `brackets` instead of `params.brackets`.
    pub fn with_brackets(
        params: &'a IncomeTaxParameters,
        brackets: &'a BracketTable,
    ) -> Self {
        Self { params, brackets }
    }

    /// Computes the tax due for one household.
    ///
    /// Never fails for inputs that pass [`TaxInputs::validate`], whose
    /// amount ceiling keeps every step inside `Decimal` range. Zero parts
    /// are tolerated and yield a zero quotient.
    pub fn compute(
        &self,
        inputs: &TaxInputs,
    ) -> TaxResult {
        // Step 1
        let (reduced_salary, salary_reduction) =
            self.apply_standard_deduction(inputs.salary, inputs.standard_deduction);

        // Step 2
        let (auto_entrepreneur_income, auto_entrepreneur_reduction) =
            self.apply_micro_abatement(inputs.auto_entrepreneur_revenue);

        // Step 3
        let taxable_income = reduced_salary + auto_entrepreneur_income;

        // Step 4
        let taxable_after_aid = self.taxable_after_aid(taxable_income, inputs.family_aid);

        // Step 5
        let quotient = self.quotient(taxable_after_aid, inputs.parts);

        // Step 6
        let (tax_per_part, brackets) = walk_brackets(quotient, self.brackets);

        // Step 7
        let total_tax = tax_per_part * inputs.parts;

        // Steps 8-9
        let rebate = self.rebate(total_tax, inputs.is_couple);
        let tax_after_rebate = non_negative(total_tax - rebate);

        // Steps 10-11
        let childcare_offset = inputs.childcare_cost * self.params.childcare_credit_rate;
        let final_tax = non_negative(tax_after_rebate - childcare_offset);

        // Step 12
        let net_annual = taxable_after_aid - final_tax;
        let net_monthly = net_annual / Decimal::from(12);

        debug!(
            taxable_after_aid = %taxable_after_aid,
            quotient = %quotient,
            total_tax = %total_tax,
            rebate = %rebate,
            final_tax = %final_tax,
            "Income tax computed"
        );

        let details = vec![
            self.line("Initial salaried income", inputs.salary),
            self.line(
                &format!(
                    "Flat salary reduction ({}%)",
                    percent(self.params.standard_deduction_rate)
                ),
                salary_reduction,
            ),
            self.line("Auto-entrepreneur revenue", inputs.auto_entrepreneur_revenue),
            self.line(
                &format!(
                    "Auto-entrepreneur reduction ({}%)",
                    percent(self.params.auto_entrepreneur_abatement)
                ),
                auto_entrepreneur_reduction,
            ),
            self.line("Total annual taxable income", taxable_income),
            self.line("Family aid and donations deduction", inputs.family_aid),
            self.line("Annual taxable income after aid", taxable_after_aid),
            self.line("Gross tax before rebate", total_tax),
            self.line("Rebate", rebate),
            self.line("Tax after rebate", tax_after_rebate),
            self.line(
                &format!(
                    "Childcare cost reduction ({}%)",
                    percent(self.params.childcare_credit_rate)
                ),
                childcare_offset,
            ),
        ];

        TaxResult {
            salary: inputs.salary,
            reduced_salary,
            salary_reduction,
            auto_entrepreneur_revenue: inputs.auto_entrepreneur_revenue,
            auto_entrepreneur_income,
            auto_entrepreneur_reduction,
            taxable_income,
            family_aid: inputs.family_aid,
            taxable_after_aid,
            parts: inputs.parts,
            quotient,
            tax_per_part,
            total_tax,
            rebate,
            tax_after_rebate,
            childcare_offset,
            final_tax,
            net_annual,
            net_monthly,
            brackets,
            details,
        }
    }

    /// Returns `(reduced_salary, reduction)`.
    fn apply_standard_deduction(
        &self,
        salary: Decimal,
        requested: bool,
    ) -> (Decimal, Decimal) {
        if !requested {
            return (salary, Decimal::ZERO);
        }
        let reduced = salary * (Decimal::ONE - self.params.standard_deduction_rate);
        (reduced, salary - reduced)
    }

    /// Returns `(taxable_income, abatement)`. The abatement applies to all
    /// activity types alike.
    fn apply_micro_abatement(
        &self,
        revenue: Decimal,
    ) -> (Decimal, Decimal) {
        let abatement = self.params.auto_entrepreneur_abatement;
        (revenue * (Decimal::ONE - abatement), revenue * abatement)
    }

    fn taxable_after_aid(
        &self,
        taxable_income: Decimal,
        family_aid: Decimal,
    ) -> Decimal {
        let after_aid = taxable_income - family_aid;
        if after_aid < Decimal::ZERO {
            warn!(
                taxable_income = %taxable_income,
                family_aid = %family_aid,
                "Family aid exceeds taxable income; taxable income after aid is negative"
            );
        }
        after_aid
    }

    fn quotient(
        &self,
        taxable_after_aid: Decimal,
        parts: Decimal,
    ) -> Decimal {
        if parts.is_zero() {
            warn!("Household parts is zero; using a zero quotient");
            return Decimal::ZERO;
        }
        taxable_after_aid / parts
    }

    fn rebate(
        &self,
        total_tax: Decimal,
        is_couple: bool,
    ) -> Decimal {
        let rules = &self.params.rebate;
        let rule = rules.for_household(is_couple);

        if let Some(ceiling) = rule.eligibility_ceiling {
            if total_tax >= ceiling {
                return Decimal::ZERO;
            }
        }

        non_negative(rule.threshold - rules.rate * total_tax)
    }

    fn line(
        &self,
        label: &str,
        amount: Decimal,
    ) -> DetailLine {
        DetailLine {
            label: label.to_string(),
            amount,
        }
    }
}

fn percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_cents;
    use crate::{MAX_AMOUNT, RebateRule, TaxBracket};

    fn params() -> IncomeTaxParameters {
        IncomeTaxParameters::default()
    }

    fn salary_only(salary: Decimal) -> TaxInputs {
        TaxInputs {
            salary,
            ..TaxInputs::default()
        }
    }

    // =========================================================================
    // walk_brackets tests
    // =========================================================================

    #[test]
    fn walk_stops_in_bracket_containing_quotient() {
        let (total, slices) =
            walk_brackets(dec!(30000), &BracketTable::quotient_familial_2025());

        assert_eq!(total, dec!(2165.48));
        assert_eq!(
            slices,
            vec![
                BracketSlice {
                    lower_bound: dec!(0),
                    applied_upper: dec!(11497),
                    rate: dec!(0.00),
                    amount: dec!(0),
                },
                BracketSlice {
                    lower_bound: dec!(11497),
                    applied_upper: dec!(29315),
                    rate: dec!(0.11),
                    amount: dec!(1959.98),
                },
                BracketSlice {
                    lower_bound: dec!(29315),
                    applied_upper: dec!(30000),
                    rate: dec!(0.30),
                    amount: dec!(205.50),
                },
            ]
        );
    }

    #[test]
    fn walk_treats_quotient_on_upper_bound_as_inside() {
        let (total, slices) =
            walk_brackets(dec!(29315), &BracketTable::quotient_familial_2025());

        assert_eq!(total, dec!(1959.98));
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].applied_upper, dec!(29315));
    }

    #[test]
    fn walk_reaches_unbounded_bracket() {
        let (total, slices) =
            walk_brackets(dec!(200000), &BracketTable::quotient_familial_2025());

        // 1959.98 + 16352.40 + 39553.11 + 8867.70
        assert_eq!(total, dec!(66733.19));
        assert_eq!(slices.len(), 5);
        assert_eq!(slices[4].applied_upper, dec!(200000));
    }

    #[test]
    fn walk_slices_sum_to_total() {
        let (total, slices) =
            walk_brackets(dec!(123456.78), &BracketTable::quotient_familial_2025());

        let sum: Decimal = slices.iter().map(|s| s.amount).sum();
        assert_eq!(sum, total);
    }

    #[test]
    fn walk_negative_quotient_in_zero_rate_bracket_is_zero() {
        let (total, slices) =
            walk_brackets(dec!(-4000), &BracketTable::quotient_familial_2025());

        assert_eq!(total, dec!(0));
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].applied_upper, dec!(-4000));
    }

    #[test]
    fn walk_negative_quotient_in_taxed_first_bracket_goes_negative() {
        let table = BracketTable::new(vec![
            TaxBracket::new(dec!(0), Some(dec!(1000)), dec!(0.10)),
            TaxBracket::new(dec!(1000), None, dec!(0.20)),
        ])
        .unwrap();

        let (total, _) = walk_brackets(dec!(-500), &table);

        assert_eq!(total, dec!(-50));
    }

    // =========================================================================
    // BracketTaxEngine::compute tests
    // =========================================================================

    #[test]
    fn compute_single_30000_scenario() {
        let params = params();
        let result = BracketTaxEngine::new(&params).compute(&salary_only(dec!(30000)));

        assert_eq!(result.taxable_income, dec!(30000));
        assert_eq!(result.quotient, dec!(30000));
        assert_eq!(result.tax_per_part, dec!(2165.48));
        assert_eq!(result.total_tax, dec!(2165.48));
        assert_eq!(result.rebate, dec!(0));
        assert_eq!(result.final_tax, dec!(2165.48));
        assert_eq!(result.net_annual, dec!(27834.52));
        assert_eq!(round_cents(result.net_monthly), dec!(2319.54));
    }

    #[test]
    fn compute_couple_two_parts_doubles_per_part_tax() {
        let params = params();
        let inputs = TaxInputs {
            salary: dec!(60000),
            parts: dec!(2),
            is_couple: true,
            ..TaxInputs::default()
        };

        let result = BracketTaxEngine::new(&params).compute(&inputs);

        assert_eq!(result.quotient, dec!(30000));
        assert_eq!(result.tax_per_part, dec!(2165.48));
        assert_eq!(result.total_tax, dec!(4330.96));
        assert_eq!(result.rebate, dec!(0));
        assert_eq!(result.final_tax, dec!(4330.96));
    }

    #[test]
    fn compute_applies_single_rebate() {
        let params = params();
        let result = BracketTaxEngine::new(&params).compute(&salary_only(dec!(20000)));

        assert_eq!(result.total_tax, dec!(935.33));
        // 889 - 0.4525 × 935.33
        assert_eq!(result.rebate, dec!(465.763175));
        assert_eq!(result.tax_after_rebate, dec!(469.566825));
        assert_eq!(round_cents(result.final_tax), dec!(469.57));
    }

    #[test]
    fn compute_rebate_can_cancel_tax() {
        let params = params();
        let result = BracketTaxEngine::new(&params).compute(&salary_only(dec!(15000)));

        assert_eq!(result.total_tax, dec!(385.33));
        assert_eq!(result.rebate, dec!(714.638175));
        assert_eq!(result.tax_after_rebate, dec!(0));
        assert_eq!(result.final_tax, dec!(0));
        assert_eq!(result.net_monthly, dec!(1250));
    }

    #[test]
    fn compute_full_household_scenario() {
        let params = params();
        let inputs = TaxInputs {
            salary: dec!(45000),
            auto_entrepreneur_revenue: dec!(20000),
            parts: dec!(2.5),
            standard_deduction: true,
            family_aid: dec!(1000),
            childcare_cost: dec!(2000),
            is_couple: true,
        };

        let result = BracketTaxEngine::new(&params).compute(&inputs);

        assert_eq!(result.reduced_salary, dec!(40500));
        assert_eq!(result.salary_reduction, dec!(4500));
        assert_eq!(result.auto_entrepreneur_income, dec!(13200));
        assert_eq!(result.auto_entrepreneur_reduction, dec!(6800));
        assert_eq!(result.taxable_income, dec!(53700));
        assert_eq!(result.taxable_after_aid, dec!(52700));
        assert_eq!(result.quotient, dec!(21080));
        assert_eq!(result.tax_per_part, dec!(1054.13));
        assert_eq!(result.total_tax, dec!(2635.325));
        assert_eq!(result.rebate, dec!(277.5154375));
        assert_eq!(result.childcare_offset, dec!(1000));
        assert_eq!(result.final_tax, dec!(1357.8095625));
        assert_eq!(round_cents(result.net_monthly), dec!(4278.52));
    }

    #[test]
    fn compute_family_aid_larger_than_income_is_not_floored() {
        let params = params();
        let inputs = TaxInputs {
            salary: dec!(1000),
            family_aid: dec!(5000),
            ..TaxInputs::default()
        };

        let result = BracketTaxEngine::new(&params).compute(&inputs);

        assert_eq!(result.taxable_after_aid, dec!(-4000));
        assert_eq!(result.quotient, dec!(-4000));
        assert_eq!(result.final_tax, dec!(0));
        assert_eq!(result.net_annual, dec!(-4000));
    }

    #[test]
    fn compute_zero_income_gives_zero_tax() {
        let params = params();
        let result = BracketTaxEngine::new(&params).compute(&TaxInputs::default());

        assert_eq!(result.final_tax, dec!(0));
        assert_eq!(result.rebate, dec!(889));
        assert_eq!(result.net_monthly, dec!(0));
    }

    #[test]
    fn compute_zero_parts_does_not_panic() {
        let params = params();
        let inputs = TaxInputs {
            salary: dec!(50000),
            parts: dec!(0),
            ..TaxInputs::default()
        };

        let result = BracketTaxEngine::new(&params).compute(&inputs);

        assert_eq!(result.quotient, dec!(0));
        assert_eq!(result.final_tax, dec!(0));
    }

    #[test]
    fn compute_childcare_offset_floors_at_zero() {
        let params = params();
        let inputs = TaxInputs {
            salary: dec!(30000),
            childcare_cost: dec!(10000),
            ..TaxInputs::default()
        };

        let result = BracketTaxEngine::new(&params).compute(&inputs);

        assert_eq!(result.childcare_offset, dec!(5000));
        assert_eq!(result.final_tax, dec!(0));
    }

    #[test]
    fn compute_uncommon_parts_stays_within_a_cent() {
        let params = params();
        let inputs = TaxInputs {
            salary: dec!(100000),
            parts: dec!(3),
            ..TaxInputs::default()
        };

        let result = BracketTaxEngine::new(&params).compute(&inputs);

        assert_eq!(round_cents(result.tax_per_part), dec!(3165.48));
        assert_eq!(round_cents(result.final_tax), dec!(9496.44));
    }

    #[test]
    fn compute_net_monthly_times_twelve_matches_net_annual() {
        let params = params();
        let result = BracketTaxEngine::new(&params).compute(&salary_only(dec!(30000)));

        assert_eq!(
            round_cents(result.net_monthly * dec!(12)),
            round_cents(result.taxable_after_aid - result.final_tax)
        );
    }

    #[test]
    fn compute_final_tax_never_decreases_with_salary() {
        let params = params();
        let engine = BracketTaxEngine::new(&params);
        let mut previous = Decimal::ZERO;

        for step in 0..=60 {
            let salary = Decimal::from(step * 5000);
            let result = engine.compute(&salary_only(salary));

            assert!(
                result.final_tax >= previous,
                "final tax dropped at salary {salary}"
            );
            previous = result.final_tax;
        }
    }

    #[test]
    fn compute_eligibility_ceiling_disables_rebate() {
        let mut params = params();
        params.rebate.single = RebateRule {
            threshold: dec!(889),
            eligibility_ceiling: Some(dec!(900)),
        };

        let result = BracketTaxEngine::new(&params).compute(&salary_only(dec!(20000)));

        assert_eq!(result.total_tax, dec!(935.33));
        assert_eq!(result.rebate, dec!(0));
        assert_eq!(result.final_tax, dec!(935.33));
    }

    #[test]
    fn compute_with_visualization_brackets() {
        let params = params();
        let engine = BracketTaxEngine::with_brackets(&params, &params.visualization_brackets);

        let result = engine.compute(&salary_only(dec!(30000)));

        // (28797 - 11294) × 0.11 + (30000 - 28797) × 0.30
        assert_eq!(result.tax_per_part, dec!(2286.23));
    }

    #[test]
    fn compute_details_follow_computation_order() {
        let params = params();
        let result = BracketTaxEngine::new(&params).compute(&salary_only(dec!(30000)));

        let labels: Vec<&str> = result.details.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Initial salaried income",
                "Flat salary reduction (10%)",
                "Auto-entrepreneur revenue",
                "Auto-entrepreneur reduction (34%)",
                "Total annual taxable income",
                "Family aid and donations deduction",
                "Annual taxable income after aid",
                "Gross tax before rebate",
                "Rebate",
                "Tax after rebate",
                "Childcare cost reduction (50%)",
            ]
        );
        assert_eq!(result.details[7].amount, dec!(2165.48));
    }

    #[test]
    fn effective_and_marginal_rates() {
        let params = params();
        let result = BracketTaxEngine::new(&params).compute(&salary_only(dec!(40000)));

        // 1959.98 + (40000 - 29315) × 0.30 = 5165.48
        assert_eq!(result.final_tax, dec!(5165.48));
        assert_eq!(result.effective_rate(), dec!(0.129137));
        assert_eq!(result.marginal_rate(), dec!(0.30));
    }

    #[test]
    fn compute_at_amount_ceiling_stays_in_range() {
        let params = params();
        let inputs = TaxInputs {
            salary: MAX_AMOUNT,
            auto_entrepreneur_revenue: MAX_AMOUNT,
            standard_deduction: true,
            childcare_cost: MAX_AMOUNT,
            ..TaxInputs::default()
        };
        assert_eq!(inputs.validate(), Ok(()));

        let result = BracketTaxEngine::new(&params).compute(&inputs);

        assert_eq!(result.taxable_after_aid, dec!(1560000000000));
        assert!(result.final_tax > Decimal::ZERO);
        assert_eq!(result.net_annual + result.final_tax, result.taxable_after_aid);
    }
}

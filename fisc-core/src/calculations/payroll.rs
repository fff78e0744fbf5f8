//! Gross-to-net payroll computation for a French salaried employee.
//!
//! Contributions are `rate × base` over five bases:
//!
//! | Base   | Definition |
//! |--------|------------|
//! | gross  | monthly gross salary |
//! | T1     | `min(gross, PMSS)` |
//! | T2     | `max(0, min(gross, 8 × PMSS) - PMSS)` |
//! | T1+T2  | both bands |
//! | CSG    | `98.25% × gross` |
//!
//! APEC, unemployment insurance and the wage guarantee fund use the gross
//! salary capped at 4 × PMSS.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_core::{PayrollEngine, PayrollInputs, PayrollOptions, PayrollRates};
//! use fisc_core::calculations::common::round_cents;
//!
//! let rates = PayrollRates::default();
//! let result = PayrollEngine::new(&rates)
//!     .compute(&PayrollInputs::new(dec!(6000), PayrollOptions::default()));
//!
//! assert_eq!(result.base_t1, dec!(3925));
//! assert_eq!(result.base_t2, dec!(2075));
//! assert_eq!(round_cents(result.net_paid), dec!(4764.44));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::non_negative;
use crate::{ContributionRegime, PayrollInputs, PayrollRates};

/// One contribution line: `amount = base × rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contribution {
    pub base: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

impl Contribution {
    fn on(
        base: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            base,
            rate,
            amount: base * rate,
        }
    }

    /// A contribution that does not apply to this employee.
    fn not_applicable() -> Self {
        Self::default()
    }

    fn when(
        applies: bool,
        base: Decimal,
        rate: Decimal,
    ) -> Self {
        if applies {
            Self::on(base, rate)
        } else {
            Self::not_applicable()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeContributions {
    pub old_age_capped: Contribution,
    pub old_age_uncapped: Contribution,
    pub alsace_moselle_health: Contribution,
    pub pension_t1: Contribution,
    pub pension_t2: Contribution,
    pub ceg_t1: Contribution,
    pub ceg_t2: Contribution,
    pub cet: Contribution,
    pub apec: Contribution,
    pub csg_deductible: Contribution,
    pub csg_non_deductible: Contribution,
    pub crds: Contribution,
}

impl EmployeeContributions {
    /// Labelled lines in payslip order.
    pub fn lines(&self) -> Vec<(&'static str, Contribution)> {
        vec![
            ("Old-age insurance (capped)", self.old_age_capped),
            ("Old-age insurance (uncapped)", self.old_age_uncapped),
            ("Alsace-Moselle health surcharge", self.alsace_moselle_health),
            ("Supplementary pension T1", self.pension_t1),
            ("Supplementary pension T2", self.pension_t2),
            ("CEG T1", self.ceg_t1),
            ("CEG T2", self.ceg_t2),
            ("CET", self.cet),
            ("APEC", self.apec),
            ("CSG (deductible)", self.csg_deductible),
            ("CSG (non-deductible)", self.csg_non_deductible),
            ("CRDS", self.crds),
        ]
    }

    /// Every employee contribution except CSG and CRDS.
    pub fn total_excluding_csg(&self) -> Decimal {
        [
            self.old_age_capped,
            self.old_age_uncapped,
            self.alsace_moselle_health,
            self.pension_t1,
            self.pension_t2,
            self.ceg_t1,
            self.ceg_t2,
            self.cet,
            self.apec,
        ]
        .iter()
        .map(|c| c.amount)
        .sum()
    }

    pub fn total_csg_crds(&self) -> Decimal {
        self.csg_deductible.amount + self.csg_non_deductible.amount + self.crds.amount
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    pub health: Contribution,
    pub old_age_capped: Contribution,
    pub old_age_uncapped: Contribution,
    pub family: Contribution,
    pub unemployment: Contribution,
    pub wage_guarantee: Contribution,
    pub housing: Contribution,
    pub solidarity_autonomy: Contribution,
    pub pension_t1: Contribution,
    pub pension_t2: Contribution,
    pub ceg_t1: Contribution,
    pub ceg_t2: Contribution,
    pub cet: Contribution,
    pub apec: Contribution,
    pub executive_provident: Contribution,
    pub social_dialogue: Contribution,
}

impl EmployerContributions {
    pub fn lines(&self) -> Vec<(&'static str, Contribution)> {
        vec![
            ("Health insurance", self.health),
            ("Old-age insurance (capped)", self.old_age_capped),
            ("Old-age insurance (uncapped)", self.old_age_uncapped),
            ("Family allowances", self.family),
            ("Unemployment insurance", self.unemployment),
            ("Wage guarantee fund (AGS)", self.wage_guarantee),
            ("Housing contribution (FNAL)", self.housing),
            ("Solidarity autonomy (CSA)", self.solidarity_autonomy),
            ("Supplementary pension T1", self.pension_t1),
            ("Supplementary pension T2", self.pension_t2),
            ("CEG T1", self.ceg_t1),
            ("CEG T2", self.ceg_t2),
            ("CET", self.cet),
            ("APEC", self.apec),
            ("Executive provident scheme", self.executive_provident),
            ("Social dialogue", self.social_dialogue),
        ]
    }

    pub fn total(&self) -> Decimal {
        self.lines().iter().map(|(_, c)| c.amount).sum()
    }
}

/// Outcome of [`PayrollEngine::compute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    pub gross: Decimal,
    pub base_t1: Decimal,
    pub base_t2: Decimal,
    pub csg_base: Decimal,
    pub employee: EmployeeContributions,
    pub employer: EmployerContributions,
    pub total_employee_excl_csg: Decimal,
    pub total_csg_crds: Decimal,
    pub total_employee: Decimal,
    pub net_taxable: Decimal,
    pub net_paid: Decimal,
    pub total_employer_charges: Decimal,
    pub total_employer_cost: Decimal,
}

impl PayrollResult {
    /// Net taxable salary over twelve months, ready to feed the income
    /// tax engine as salaried income.
    pub fn annual_net_taxable(&self) -> Decimal {
        self.net_taxable * Decimal::from(12)
    }
}

/// Payroll engine over an injected rate table.
#[derive(Debug, Clone)]
pub struct PayrollEngine<'a> {
    rates: &'a PayrollRates,
}

impl<'a> PayrollEngine<'a> {
    pub fn new(rates: &'a PayrollRates) -> Self {
        Self { rates }
    }

    /// Computes the monthly gross-to-net breakdown. Never fails for inputs
    /// that pass [`PayrollInputs::validate`].
    pub fn compute(
        &self,
        inputs: &PayrollInputs,
    ) -> PayrollResult {
        let gross = inputs.gross_monthly;
        let (base_t1, base_t2) = self.wage_bands(gross);
        let csg_base = gross * self.rates.employee.csg_base_factor;

        let employee = self.employee_contributions(inputs, base_t1, base_t2, csg_base);
        let employer = self.employer_contributions(inputs, base_t1, base_t2);

        let total_employee_excl_csg = employee.total_excluding_csg();
        let total_csg_crds = employee.total_csg_crds();
        let net_taxable = gross - total_employee_excl_csg - employee.csg_deductible.amount;
        let net_paid = gross - total_employee_excl_csg - total_csg_crds;

        let total_employer_charges = employer.total();
        let total_employer_cost = gross + total_employer_charges;

        debug!(
            gross = %gross,
            net_taxable = %net_taxable,
            net_paid = %net_paid,
            total_employer_cost = %total_employer_cost,
            "Payroll computed"
        );

        PayrollResult {
            gross,
            base_t1,
            base_t2,
            csg_base,
            employee,
            employer,
            total_employee_excl_csg,
            total_csg_crds,
            total_employee: total_employee_excl_csg + total_csg_crds,
            net_taxable,
            net_paid,
            total_employer_charges,
            total_employer_cost,
        }
    }

    /// Returns `(T1, T2)`.
    fn wage_bands(
        &self,
        gross: Decimal,
    ) -> (Decimal, Decimal) {
        let pmss = self.rates.pmss;
        let t1 = gross.min(pmss);
        let t2 = non_negative(gross.min(pmss * Decimal::from(8)) - pmss);
        (t1, t2)
    }

    fn capped_at_four_pmss(
        &self,
        gross: Decimal,
    ) -> Decimal {
        gross.min(self.rates.pmss * Decimal::from(4))
    }

    fn employee_contributions(
        &self,
        inputs: &PayrollInputs,
        t1: Decimal,
        t2: Decimal,
        csg_base: Decimal,
    ) -> EmployeeContributions {
        let r = &self.rates.employee;
        let gross = inputs.gross_monthly;
        let options = &inputs.options;

        EmployeeContributions {
            old_age_capped: Contribution::on(t1, r.old_age_capped),
            old_age_uncapped: Contribution::on(gross, r.old_age_uncapped),
            alsace_moselle_health: Contribution::when(
                options.alsace_moselle,
                gross,
                r.alsace_moselle_health,
            ),
            pension_t1: Contribution::on(t1, r.pension_t1),
            pension_t2: Contribution::on(t2, r.pension_t2),
            ceg_t1: Contribution::on(t1, r.ceg_t1),
            ceg_t2: Contribution::on(t2, r.ceg_t2),
            cet: Contribution::when(gross > self.rates.pmss, t1 + t2, r.cet),
            apec: Contribution::when(
                options.is_executive,
                self.capped_at_four_pmss(gross),
                r.apec,
            ),
            csg_deductible: Contribution::on(csg_base, r.csg_deductible),
            csg_non_deductible: Contribution::on(csg_base, r.csg_non_deductible),
            crds: Contribution::on(csg_base, r.crds),
        }
    }

    fn employer_contributions(
        &self,
        inputs: &PayrollInputs,
        t1: Decimal,
        t2: Decimal,
    ) -> EmployerContributions {
        let r = &self.rates.employer;
        let gross = inputs.gross_monthly;
        let options = &inputs.options;
        let capped = self.capped_at_four_pmss(gross);

        let health_rate = if options.above_2_5_smic {
            r.health_full
        } else {
            r.health_reduced
        };
        let family_rate = if options.above_3_5_smic {
            r.family_full
        } else {
            r.family_reduced
        };
        let unemployment_rate = match options.regime {
            ContributionRegime::BeforeMay2025 => r.unemployment_before_may_2025,
            ContributionRegime::FromMay2025 => r.unemployment_from_may_2025,
        };
        let housing = if options.headcount_50_plus {
            Contribution::on(gross, r.housing_50_plus)
        } else {
            Contribution::on(t1, r.housing_under_50)
        };

        EmployerContributions {
            health: Contribution::on(gross, health_rate),
            old_age_capped: Contribution::on(t1, r.old_age_capped),
            old_age_uncapped: Contribution::on(gross, r.old_age_uncapped),
            family: Contribution::on(gross, family_rate),
            unemployment: Contribution::on(capped, unemployment_rate),
            wage_guarantee: Contribution::on(capped, r.wage_guarantee),
            housing,
            solidarity_autonomy: Contribution::on(gross, r.solidarity_autonomy),
            pension_t1: Contribution::on(t1, r.pension_t1),
            pension_t2: Contribution::on(t2, r.pension_t2),
            ceg_t1: Contribution::on(t1, r.ceg_t1),
            ceg_t2: Contribution::on(t2, r.ceg_t2),
            cet: Contribution::when(gross > self.rates.pmss, t1 + t2, r.cet),
            apec: Contribution::when(options.is_executive, capped, r.apec),
            executive_provident: Contribution::when(
                options.is_executive,
                t1,
                r.executive_provident,
            ),
            social_dialogue: Contribution::on(gross, r.social_dialogue),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{MAX_AMOUNT, PayrollOptions};
    use crate::calculations::common::round_cents;

    fn compute(
        gross: Decimal,
        options: PayrollOptions,
    ) -> PayrollResult {
        let rates = PayrollRates::default();
        PayrollEngine::new(&rates).compute(&PayrollInputs::new(gross, options))
    }

    fn non_executive_small_employer() -> PayrollOptions {
        PayrollOptions {
            is_executive: false,
            alsace_moselle: true,
            above_2_5_smic: false,
            above_3_5_smic: false,
            headcount_50_plus: true,
            regime: ContributionRegime::BeforeMay2025,
        }
    }

    // =========================================================================
    // wage bands
    // =========================================================================

    #[test]
    fn bands_split_gross_above_pmss() {
        let result = compute(dec!(6000), PayrollOptions::default());

        assert_eq!(result.base_t1, dec!(3925));
        assert_eq!(result.base_t2, dec!(2075));
    }

    #[test]
    fn bands_below_pmss_have_no_t2() {
        let result = compute(dec!(2500), PayrollOptions::default());

        assert_eq!(result.base_t1, dec!(2500));
        assert_eq!(result.base_t2, dec!(0));
    }

    #[test]
    fn bands_cap_t2_at_eight_pmss() {
        let result = compute(dec!(40000), PayrollOptions::default());

        assert_eq!(result.base_t1, dec!(3925));
        // 8 × 3925 - 3925
        assert_eq!(result.base_t2, dec!(27475));
    }

    // =========================================================================
    // executive at 6000 gross, default options
    // =========================================================================

    #[test]
    fn executive_6000_employee_contributions() {
        let e = compute(dec!(6000), PayrollOptions::default()).employee;

        assert_eq!(e.old_age_capped.amount, dec!(270.825));
        assert_eq!(e.old_age_uncapped.amount, dec!(24));
        assert_eq!(e.alsace_moselle_health.amount, dec!(0));
        assert_eq!(e.pension_t1.amount, dec!(123.6375));
        assert_eq!(e.pension_t2.amount, dec!(179.28));
        assert_eq!(e.ceg_t1.amount, dec!(33.755));
        assert_eq!(e.ceg_t2.amount, dec!(22.41));
        assert_eq!(e.cet.amount, dec!(8.40));
        assert_eq!(e.apec.amount, dec!(1.44));
        assert_eq!(e.csg_deductible.amount, dec!(400.86));
        assert_eq!(e.csg_non_deductible.amount, dec!(141.48));
        assert_eq!(e.crds.amount, dec!(29.475));
    }

    #[test]
    fn executive_6000_totals() {
        let result = compute(dec!(6000), PayrollOptions::default());

        assert_eq!(result.csg_base, dec!(5895));
        assert_eq!(result.total_employee_excl_csg, dec!(663.7475));
        assert_eq!(result.total_csg_crds, dec!(571.815));
        assert_eq!(result.net_taxable, dec!(4935.3925));
        assert_eq!(result.net_paid, dec!(4764.4375));
        assert_eq!(round_cents(result.net_taxable), dec!(4935.39));
        assert_eq!(round_cents(result.net_paid), dec!(4764.44));
    }

    #[test]
    fn executive_6000_employer_contributions() {
        let m = compute(dec!(6000), PayrollOptions::default()).employer;

        assert_eq!(m.health.amount, dec!(780));
        assert_eq!(m.old_age_capped.amount, dec!(335.5875));
        assert_eq!(m.old_age_uncapped.amount, dec!(126.60));
        assert_eq!(m.family.amount, dec!(207));
        assert_eq!(m.unemployment.amount, dec!(240));
        assert_eq!(m.wage_guarantee.amount, dec!(15));
        assert_eq!(m.housing.amount, dec!(3.925));
        assert_eq!(m.solidarity_autonomy.amount, dec!(18));
        assert_eq!(m.pension_t1.amount, dec!(185.26));
        assert_eq!(m.pension_t2.amount, dec!(268.7125));
        assert_eq!(m.ceg_t1.amount, dec!(50.6325));
        assert_eq!(m.ceg_t2.amount, dec!(33.615));
        assert_eq!(m.cet.amount, dec!(12.60));
        assert_eq!(m.apec.amount, dec!(2.16));
        assert_eq!(m.executive_provident.amount, dec!(58.875));
        assert_eq!(m.social_dialogue.amount, dec!(0.96));
    }

    #[test]
    fn executive_6000_employer_cost() {
        let result = compute(dec!(6000), PayrollOptions::default());

        assert_eq!(result.total_employer_charges, dec!(2338.9275));
        assert_eq!(result.total_employer_cost, dec!(8338.9275));
        assert_eq!(round_cents(result.total_employer_cost), dec!(8338.93));
    }

    // =========================================================================
    // option-driven rate selections
    // =========================================================================

    #[test]
    fn non_executive_alsace_moselle_below_pmss() {
        let result = compute(dec!(2500), non_executive_small_employer());
        let e = &result.employee;

        assert_eq!(e.alsace_moselle_health.amount, dec!(32.50));
        assert_eq!(e.cet.amount, dec!(0));
        assert_eq!(e.apec.amount, dec!(0));
        assert_eq!(result.total_employee_excl_csg, dec!(315.25));
        assert_eq!(result.total_csg_crds, dec!(238.25625));
        assert_eq!(result.net_taxable, dec!(2017.725));
        assert_eq!(result.net_paid, dec!(1946.49375));
    }

    #[test]
    fn non_executive_employer_rate_selections() {
        let result = compute(dec!(2500), non_executive_small_employer());
        let m = &result.employer;

        assert_eq!(m.health.rate, dec!(0.07));
        assert_eq!(m.family.rate, dec!(0.0345));
        assert_eq!(m.unemployment.amount, dec!(101.25));
        assert_eq!(m.housing.base, dec!(2500));
        assert_eq!(m.housing.amount, dec!(12.50));
        assert_eq!(m.executive_provident.amount, dec!(0));
        assert_eq!(result.total_employer_charges, dec!(805.90));
        assert_eq!(result.total_employer_cost, dec!(3305.90));
    }

    #[test]
    fn full_family_rate_above_3_5_smic() {
        let options = PayrollOptions {
            above_3_5_smic: true,
            ..PayrollOptions::default()
        };

        let result = compute(dec!(7000), options);

        assert_eq!(result.employer.family.amount, dec!(367.50));
    }

    #[test]
    fn apec_and_unemployment_capped_at_four_pmss() {
        let result = compute(dec!(20000), PayrollOptions::default());

        assert_eq!(result.employee.apec.base, dec!(15700));
        assert_eq!(result.employer.unemployment.base, dec!(15700));
        assert_eq!(result.employer.unemployment.amount, dec!(628));
    }

    #[test]
    fn cet_applies_only_strictly_above_pmss() {
        let at = compute(dec!(3925), PayrollOptions::default());
        let above = compute(dec!(3926), PayrollOptions::default());

        assert_eq!(at.employee.cet.amount, dec!(0));
        assert_eq!(above.employee.cet.base, dec!(3926));
    }

    // =========================================================================
    // invariants
    // =========================================================================

    #[test]
    fn zero_gross_yields_zero_everywhere() {
        let result = compute(dec!(0), PayrollOptions::default());

        assert_eq!(result.total_employee, dec!(0));
        assert_eq!(result.total_employer_charges, dec!(0));
        assert_eq!(result.net_paid, dec!(0));
    }

    #[test]
    fn net_paid_never_exceeds_net_taxable() {
        for gross in [dec!(1500), dec!(3925), dec!(6000), dec!(12000), dec!(40000)] {
            let result = compute(gross, PayrollOptions::default());

            assert!(result.net_paid <= result.net_taxable);
            assert!(result.net_taxable <= result.gross);
        }
    }

    #[test]
    fn employee_lines_sum_to_total_employee() {
        let result = compute(dec!(6000), PayrollOptions::default());

        let sum: Decimal = result.employee.lines().iter().map(|(_, c)| c.amount).sum();
        assert_eq!(sum, result.total_employee);
    }

    #[test]
    fn annual_net_taxable_is_twelve_months_unrounded() {
        let result = compute(dec!(6000), PayrollOptions::default());

        assert_eq!(result.annual_net_taxable(), dec!(59224.71));
    }

    #[test]
    fn compute_at_amount_ceiling_stays_in_range() {
        let inputs = PayrollInputs::new(MAX_AMOUNT, PayrollOptions::default());
        assert_eq!(inputs.validate(), Ok(()));

        let result = compute(MAX_AMOUNT, PayrollOptions::default());

        assert_eq!(result.total_employer_cost, result.gross + result.total_employer_charges);
        assert!(result.net_paid < result.gross);
        assert!(result.annual_net_taxable() > result.net_taxable);
    }
}

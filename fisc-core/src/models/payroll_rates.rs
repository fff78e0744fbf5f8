//! French 2025 payroll contribution rates.
//!
//! Wage bands: T1 is the gross salary up to one PMSS, T2 the slice between
//! one and eight PMSS. Rates are fractions (0.069 = 6.90%).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Monthly social-security ceiling (PMSS) for 2025.
pub const PMSS_2025: Decimal = dec!(3925.00);

/// Gross monthly minimum wage (SMIC, 35h) for 2025.
pub const SMIC_MONTHLY_2025: Decimal = dec!(1801.80);

/// Employee-side rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeRates {
    /// Capped old-age insurance, on T1.
    pub old_age_capped: Decimal,
    /// Uncapped old-age insurance, on gross.
    pub old_age_uncapped: Decimal,
    /// Alsace-Moselle health surcharge, on gross.
    pub alsace_moselle_health: Decimal,
    /// AGIRC-ARRCO supplementary pension.
    pub pension_t1: Decimal,
    pub pension_t2: Decimal,
    /// General balancing contribution (CEG).
    pub ceg_t1: Decimal,
    pub ceg_t2: Decimal,
    /// Technical balancing contribution (CET), on T1+T2 above one PMSS.
    pub cet: Decimal,
    /// Executive employment association (APEC), on gross capped at 4 PMSS.
    pub apec: Decimal,
    pub csg_deductible: Decimal,
    pub csg_non_deductible: Decimal,
    pub crds: Decimal,
    /// Share of gross forming the CSG/CRDS base (1.75% abatement).
    pub csg_base_factor: Decimal,
}

/// Employer-side rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployerRates {
    /// Health insurance up to 2.5 SMIC.
    pub health_reduced: Decimal,
    /// Health insurance above 2.5 SMIC.
    pub health_full: Decimal,
    pub old_age_capped: Decimal,
    pub old_age_uncapped: Decimal,
    /// Family allowances up to 3.5 SMIC.
    pub family_reduced: Decimal,
    /// Family allowances above 3.5 SMIC.
    pub family_full: Decimal,
    /// Unemployment insurance until 30 April 2025.
    pub unemployment_before_may_2025: Decimal,
    /// Unemployment insurance from 1 May 2025.
    pub unemployment_from_may_2025: Decimal,
    /// Wage guarantee fund (AGS).
    pub wage_guarantee: Decimal,
    /// Housing contribution (FNAL) under 50 employees, on T1.
    pub housing_under_50: Decimal,
    /// Housing contribution (FNAL) from 50 employees, on gross.
    pub housing_50_plus: Decimal,
    /// Solidarity contribution for autonomy (CSA).
    pub solidarity_autonomy: Decimal,
    pub pension_t1: Decimal,
    pub pension_t2: Decimal,
    pub ceg_t1: Decimal,
    pub ceg_t2: Decimal,
    pub cet: Decimal,
    pub apec: Decimal,
    /// Mandatory executive provident scheme, on T1.
    pub executive_provident: Decimal,
    /// Social dialogue contribution.
    pub social_dialogue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollRates {
    pub pmss: Decimal,
    pub smic_monthly: Decimal,
    pub employee: EmployeeRates,
    pub employer: EmployerRates,
}

impl Default for EmployeeRates {
    fn default() -> Self {
        Self {
            old_age_capped: dec!(0.069),
            old_age_uncapped: dec!(0.004),
            alsace_moselle_health: dec!(0.013),
            pension_t1: dec!(0.0315),
            pension_t2: dec!(0.0864),
            ceg_t1: dec!(0.0086),
            ceg_t2: dec!(0.0108),
            cet: dec!(0.0014),
            apec: dec!(0.00024),
            csg_deductible: dec!(0.068),
            csg_non_deductible: dec!(0.024),
            crds: dec!(0.005),
            csg_base_factor: dec!(0.9825),
        }
    }
}

impl Default for EmployerRates {
    fn default() -> Self {
        Self {
            health_reduced: dec!(0.07),
            health_full: dec!(0.13),
            old_age_capped: dec!(0.0855),
            old_age_uncapped: dec!(0.0211),
            family_reduced: dec!(0.0345),
            family_full: dec!(0.0525),
            unemployment_before_may_2025: dec!(0.0405),
            unemployment_from_may_2025: dec!(0.0400),
            wage_guarantee: dec!(0.0025),
            housing_under_50: dec!(0.001),
            housing_50_plus: dec!(0.005),
            solidarity_autonomy: dec!(0.003),
            pension_t1: dec!(0.0472),
            pension_t2: dec!(0.1295),
            ceg_t1: dec!(0.0129),
            ceg_t2: dec!(0.0162),
            cet: dec!(0.0021),
            apec: dec!(0.00036),
            executive_provident: dec!(0.015),
            social_dialogue: dec!(0.00016),
        }
    }
}

impl Default for PayrollRates {
    fn default() -> Self {
        Self {
            pmss: PMSS_2025,
            smic_monthly: SMIC_MONTHLY_2025,
            employee: EmployeeRates::default(),
            employer: EmployerRates::default(),
        }
    }
}

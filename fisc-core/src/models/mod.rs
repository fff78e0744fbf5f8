mod borrowing_inputs;
mod fiscal_parameters;
mod payroll_inputs;
mod payroll_rates;
mod tax_bracket;
mod tax_inputs;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub use borrowing_inputs::{BorrowingInputs, BorrowingInputsError};
pub use fiscal_parameters::{
    BorrowingParameters, FiscalParameters, IncomeTaxParameters, RebateRule, RebateRules,
};
pub use payroll_inputs::{ContributionRegime, PayrollInputs, PayrollInputsError, PayrollOptions};
pub use payroll_rates::{EmployeeRates, EmployerRates, PMSS_2025, PayrollRates, SMIC_MONTHLY_2025};
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_inputs::{TaxInputs, TaxInputsError};

/// Largest currency amount the `validate()` methods accept (one trillion
/// euros). Every engine stays inside `Decimal` range below it.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

//! Calculation engines for French household finances.
//!
//! Each engine borrows its parameters, takes validated inputs and returns
//! unrounded results. Rounding to cents is left to presentation.

pub mod borrowing;
pub mod common;
pub mod income_tax;
pub mod payroll;
pub mod tax_rates;

pub use borrowing::{BorrowingCapacityCalculator, BorrowingResult};
pub use income_tax::{BracketSlice, BracketTaxEngine, DetailLine, TaxResult, walk_brackets};
pub use payroll::{
    Contribution, EmployeeContributions, EmployerContributions, PayrollEngine, PayrollResult,
};
pub use tax_rates::{RatePoint, TaxRateAnalyzer, TaxRateSummary};

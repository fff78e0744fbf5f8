pub mod calculations;
pub mod models;

pub use calculations::{
    BorrowingCapacityCalculator, BracketTaxEngine, PayrollEngine, TaxRateAnalyzer,
};
pub use models::*;

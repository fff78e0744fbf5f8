use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a bracket sequence does not cover `[0, +∞)` contiguously.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("first bracket must start at zero, got {0}")]
    FirstBracketNotAtZero(Decimal),

    #[error("bracket {index} starts at {found}, expected {expected}")]
    Discontinuous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} upper bound {upper} is not above its lower bound {lower}")]
    EmptyRange {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd(usize),

    #[error("last bracket must be unbounded, got upper bound {0}")]
    BoundedLastBracket(Decimal),

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },
}

/// One slice of a progressive schedule. `upper_bound` of `None` means +∞.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// Whether `amount` lies in `(lower_bound, upper_bound]`.
    pub fn contains(
        &self,
        amount: Decimal,
    ) -> bool {
        amount > self.lower_bound && self.upper_bound.is_none_or(|upper| amount <= upper)
    }
}

/// An ordered, contiguous bracket sequence covering `[0, +∞)`.
///
/// Construction goes through [`BracketTable::new`], so every table handed to
/// an engine has already been checked for gaps and overlaps.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisc_core::{BracketTable, TaxBracket};
///
/// let table = BracketTable::new(vec![
///     TaxBracket::new(dec!(0), Some(dec!(10000)), dec!(0)),
///     TaxBracket::new(dec!(10000), None, dec!(0.20)),
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.bracket_for(dec!(15000)).rate, dec!(0.20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates and wraps a bracket sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if the sequence is empty, does not start
    /// at zero, has a gap or overlap, has an empty range, is bounded at the
    /// end or unbounded before it, or carries a rate outside `[0, 1]`.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if first.lower_bound != Decimal::ZERO {
            return Err(BracketTableError::FirstBracketNotAtZero(first.lower_bound));
        }

        let last_index = brackets.len() - 1;
        let mut expected_lower = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.lower_bound != expected_lower {
                return Err(BracketTableError::Discontinuous {
                    index,
                    expected: expected_lower,
                    found: bracket.lower_bound,
                });
            }

            match bracket.upper_bound {
                Some(upper) if index == last_index => {
                    return Err(BracketTableError::BoundedLastBracket(upper));
                }
                Some(upper) if upper <= bracket.lower_bound => {
                    return Err(BracketTableError::EmptyRange {
                        index,
                        lower: bracket.lower_bound,
                        upper,
                    });
                }
                Some(upper) => expected_lower = upper,
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedBeforeEnd(index));
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// The 2025 schedule used by the quotient-familial income tax computation.
    pub fn quotient_familial_2025() -> Self {
        Self::from_thresholds(&[dec!(11497), dec!(29315), dec!(83823), dec!(180294)])
    }

    /// The schedule shown by the rate visualization.
    ///
    /// Its thresholds differ from [`BracketTable::quotient_familial_2025`]
    /// (11294 against 11497 for the first one); both are kept as distinct
    /// tables.
    pub fn rate_visualization() -> Self {
        Self::from_thresholds(&[dec!(11294), dec!(28797), dec!(82341), dec!(177106)])
    }

    fn from_thresholds(thresholds: &[Decimal; 4]) -> Self {
        let rates = [dec!(0.00), dec!(0.11), dec!(0.30), dec!(0.41), dec!(0.45)];
        let mut lower = Decimal::ZERO;
        let mut brackets = Vec::with_capacity(rates.len());

        for (i, rate) in rates.into_iter().enumerate() {
            let upper = thresholds.get(i).copied();
            brackets.push(TaxBracket::new(lower, upper, rate));
            if let Some(upper) = upper {
                lower = upper;
            }
        }

        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Returns the bracket whose range `(lower, upper]` holds `amount`.
    /// Amounts at or below zero map to the first bracket.
    pub fn bracket_for(
        &self,
        amount: Decimal,
    ) -> &TaxBracket {
        self.brackets
            .iter()
            .find(|bracket| bracket.contains(amount))
            .unwrap_or(&self.brackets[0])
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

//! Small numeric helpers shared by the engines.
//!
//! Engines never round; [`round_cents`] exists for display and for
//! comparing results against cent-exact fixtures.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, midpoints away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisc_core::calculations::common::round_cents;
///
/// assert_eq!(round_cents(dec!(469.566825)), dec!(469.57));
/// assert_eq!(round_cents(dec!(2.005)), dec!(2.01));
/// assert_eq!(round_cents(dec!(-2.005)), dec!(-2.01));
/// ```
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `max(0, value)`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisc_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-12.50)), dec!(0));
/// assert_eq!(non_negative(dec!(12.50)), dec!(12.50));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// `numerator / denominator`, or zero when the denominator is not positive.
pub fn ratio(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator / denominator
}

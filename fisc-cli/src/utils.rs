use fisc_core::calculations::common::round_cents;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error(
        "invalid amount '{input}': use ',' or '.' as the decimal separator, not both; \
         group thousands with spaces (1 234,56)"
    )]
    MixedSeparators { input: String },

    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Trims whitespace, drops spaces used as thousands separators, drops a
/// trailing `€` and accepts a French decimal comma (`1 234,56`). Commas
/// are never thousands separators.
fn normalize_decimal_input(s: &str) -> String {
    s.trim()
        .trim_end_matches('€')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Parses an amount typed on the command line.
///
/// Empty input is treated as 0. Input mixing `,` and `.` is rejected
/// rather than guessing which one is the decimal separator.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    if s.contains(',') && s.contains('.') {
        tracing::error!(input = %s, "mixed decimal separators");
        return Err(ParseDecimalError::MixedSeparators {
            input: s.to_string(),
        });
    }
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}

/// `1234.5` → `"1234.50 €"`.
pub fn format_euro(amount: Decimal) -> String {
    format!("{:.2} €", round_cents(amount))
}

/// `0.1657246` → `"16.57 %"`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.2} %", round_cents(rate * Decimal::ONE_HUNDRED))
}

/// Signed amount for deltas: `"+12.00 €"`, `"-3.50 €"`.
pub fn format_delta(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    if rounded > Decimal::ZERO {
        format!("+{rounded:.2} €")
    } else {
        format!("{rounded:.2} €")
    }
}

//! Pricing
//!
//! Parsing of human-written prices and rates, and minor-unit arithmetic helpers.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors raised while parsing or converting prices.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The amount could not be parsed or is negative.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// The percentage could not be parsed.
    #[error("invalid percentage: {0}")]
    InvalidPercentage(String),

    /// The ISO currency code is unknown.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A percentage calculation overflowed or could not be represented in minor units.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A minor-unit amount does not fit the money representation.
    #[error("amount {0} is out of range")]
    OutOfRange(u64),
}

/// Look up an ISO 4217 currency by its alphabetic code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] if the code is not recognised.
pub fn currency(code: &str) -> Result<&'static Currency, PriceError> {
    let code = code.trim().to_ascii_uppercase();

    iso::find(&code).ok_or(PriceError::UnknownCurrency(code))
}

/// Parse a major-unit amount (e.g. "49.99") into minor units of `currency`.
///
/// # Errors
///
/// Returns [`PriceError::InvalidPrice`] if the amount is not a non-negative
/// decimal that fits in minor units.
pub fn parse_amount(s: &str, currency: &Currency) -> Result<u64, PriceError> {
    let invalid = || PriceError::InvalidPrice(s.to_string());

    let amount = s.trim().parse::<Decimal>().map_err(|_err| invalid())?;

    if amount.is_sign_negative() {
        return Err(invalid());
    }

    let scale = 10_u64
        .checked_pow(currency.exponent)
        .and_then(Decimal::from_u64)
        .ok_or_else(invalid)?;

    amount
        .checked_mul(scale)
        .and_then(|value| value.round_dp(0).to_u64())
        .ok_or_else(invalid)
}

/// Parse a price string (e.g. "2.99 GBP") into minor units and currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognised.
pub fn parse_price(s: &str) -> Result<(u64, &'static Currency), PriceError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(PriceError::InvalidPrice(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = currency(code)?;

    Ok((parse_amount(amount, currency)?, currency))
}

/// Parse a percentage string (e.g. "8%" or "0.08") into a `Percentage`.
///
/// # Errors
///
/// Returns [`PriceError::InvalidPercentage`] if the string cannot be parsed
/// or is negative.
pub fn parse_percentage(s: &str) -> Result<Percentage, PriceError> {
    let trimmed = s.trim();
    let invalid = || PriceError::InvalidPercentage(s.to_string());

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| invalid())?
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(invalid)?
    } else {
        trimmed.parse::<Decimal>().map_err(|_err| invalid())?
    };

    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid());
    }

    Ok(Percentage::from(value))
}

/// Apply a percentage to a minor-unit amount, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PriceError::PercentConversion`] if the result overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PriceError> {
    let minor = Decimal::from_i64(minor).ok_or(PriceError::PercentConversion)?;

    // `Percentage` only exposes its decimal through arithmetic.
    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PriceError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PriceError::PercentConversion)
}

/// Build money from an unsigned minor-unit amount.
///
/// # Errors
///
/// Returns [`PriceError::OutOfRange`] if the amount exceeds `i64::MAX`.
pub fn money_from_minor(
    minor: u64,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceError> {
    let minor = i64::try_from(minor).map_err(|_err| PriceError::OutOfRange(minor))?;

    Ok(Money::from_minor(minor, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, GBP, JPY, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn currency_lookup_is_case_insensitive() -> TestResult {
        assert_eq!(currency("usd")?, USD);
        assert_eq!(currency(" GBP ")?, GBP);

        Ok(())
    }

    #[test]
    fn currency_lookup_rejects_unknown_code() {
        assert_eq!(
            currency("ABC"),
            Err(PriceError::UnknownCurrency("ABC".to_string()))
        );
    }

    #[test]
    fn parse_amount_scales_by_currency_exponent() -> TestResult {
        assert_eq!(parse_amount("49.99", USD)?, 4999);
        assert_eq!(parse_amount("1500", JPY)?, 1500);

        Ok(())
    }

    #[test]
    fn parse_amount_rejects_negative_and_garbage() {
        assert!(matches!(
            parse_amount("-1.00", USD),
            Err(PriceError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_amount("ten", USD),
            Err(PriceError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(PriceError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(PriceError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_usd_and_eur() -> TestResult {
        let (usd_minor, usd) = parse_price("1.00 USD")?;
        let (eur_minor, eur) = parse_price("2.50 EUR")?;

        assert_eq!(usd_minor, 100);
        assert_eq!(usd, USD);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(parse_percentage("8%")?, Percentage::from(0.08));
        assert_eq!(parse_percentage(" 0.08 ")?, Percentage::from(0.08));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_invalid_and_negative() {
        assert!(matches!(
            parse_percentage("invalid"),
            Err(PriceError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percentage("-5%"),
            Err(PriceError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn parse_percentage_rejects_out_of_range_rates() {
        assert!(matches!(
            parse_percentage("1e30"),
            Err(PriceError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percentage("1000000000000000000000000000000"),
            Err(PriceError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percentage("1000000000000000000000000000000%"),
            Err(PriceError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn parse_percentage_keeps_decimal_precision() -> TestResult {
        assert_eq!(
            parse_percentage("8.875%")?,
            Percentage::from(Decimal::new(8_875, 5))
        );

        Ok(())
    }

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(percent_of_minor(&Percentage::from(0.08), 10_000)?, 800);
        assert_eq!(percent_of_minor(&Percentage::from(0.08), 1_999)?, 160);
        assert_eq!(percent_of_minor(&Percentage::from(0.5), 1)?, 1);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let result = percent_of_minor(&Percentage::from(2.0), i64::MAX);

        assert_eq!(result, Err(PriceError::PercentConversion));
    }

    #[test]
    fn money_from_minor_rejects_out_of_range() {
        assert_eq!(
            money_from_minor(u64::MAX, GBP),
            Err(PriceError::OutOfRange(u64::MAX))
        );
    }
}

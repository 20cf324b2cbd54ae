use thiserror::Error;

/// Money is held as integer cents so that sums and differences are exact.
/// $12.50 is stored as 1250.
pub type Cents = i64;

/// Largest accepted amount magnitude, ten trillion units. Keeps totals over
/// any realistic number of transactions well inside `i64`.
pub const MAX_AMOUNT_CENTS: Cents = 1_000_000_000_000_000;

/// Whether an amount is within the accepted range.
pub fn is_valid_amount(cents: Cents) -> bool {
    cents.unsigned_abs() <= MAX_AMOUNT_CENTS.unsigned_abs()
}

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Format cents as US dollars with thousands separators.
/// Example: 123456 -> "$1,234.56", -1200 -> "-$12.00"
pub fn format_usd(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let units = (abs / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{:02}", sign, grouped, abs % 100)
}

/// Parse a decimal string into cents, rounding half up on the third decimal.
/// Example: "50" -> 5000, "12.5" -> 1250, "0.125" -> 13, "-3.10" -> -310
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ParseCentsError::OutOfRange)?
    };

    // Three digits of precision, the last one only decides rounding
    let padded: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(3)
        .collect();
    let thousandths: i64 = padded
        .parse()
        .map_err(|_| ParseCentsError::InvalidFormat)?;

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add((thousandths + 5) / 10))
        .filter(|c| is_valid_amount(*c))
        .ok_or(ParseCentsError::OutOfRange)?;

    Ok(if negative { -cents } else { cents })
}

/// Convert cents into currency units, as stored in serialized ledgers.
pub fn cents_to_units(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Convert currency units into cents, rounding to the nearest cent.
/// `None` when the result falls outside the accepted range.
pub fn units_to_cents(units: f64) -> Option<Cents> {
    let cents = (units * 100.0).round();
    let limit = MAX_AMOUNT_CENTS as f64;
    if cents.is_finite() && (-limit..=limit).contains(&cents) {
        Some(cents as Cents)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("invalid money format")]
    InvalidFormat,

    #[error("amount out of range")]
    OutOfRange,
}

/// Serde adapter writing cents as a JSON number of currency units (`12.5`),
/// the layout used by the persisted ledger blob.
pub mod decimal_units {
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::{Cents, cents_to_units, units_to_cents};

    pub fn serialize<S>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if cents % 100 == 0 {
            serializer.serialize_i64(cents / 100)
        } else {
            serializer.serialize_f64(cents_to_units(*cents))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Cents, D::Error>
    where
        D: Deserializer<'de>,
    {
        let units = f64::deserialize(deserializer)?;
        units_to_cents(units)
            .ok_or_else(|| de::Error::custom(format!("amount out of range: {units}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-1234), "-12.34");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0), "$0.00");
        assert_eq!(format_usd(99), "$0.99");
        assert_eq!(format_usd(100000), "$1,000.00");
        assert_eq!(format_usd(123456789), "$1,234,567.89");
        assert_eq!(format_usd(-1200), "-$12.00");
        assert_eq!(format_usd(-100000050), "-$1,000,000.50");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("7."), Ok(700));
        assert_eq!(parse_cents(" 0.01 "), Ok(1));
        assert_eq!(parse_cents("-3.10"), Ok(-310));
        assert_eq!(parse_cents("0.125"), Ok(13));
        assert_eq!(parse_cents("0.124"), Ok(12));
        assert_eq!(parse_cents("9.995"), Ok(1000));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert_eq!(parse_cents(""), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("."), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("abc"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1.2.3"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1e3"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("+5"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(
            parse_cents("99999999999999999999"),
            Err(ParseCentsError::OutOfRange)
        );
    }

    #[test]
    fn test_parse_cents_rejects_amounts_that_could_overflow_totals() {
        assert_eq!(parse_cents("10000000000000"), Ok(MAX_AMOUNT_CENTS));
        assert_eq!(parse_cents("-10000000000000"), Ok(-MAX_AMOUNT_CENTS));
        assert_eq!(parse_cents("10000000000000.01"), Err(ParseCentsError::OutOfRange));
        assert_eq!(parse_cents("50000000000000000"), Err(ParseCentsError::OutOfRange));
        assert!(!is_valid_amount(i64::MIN));
    }

    #[test]
    fn test_units_conversion() {
        assert_eq!(units_to_cents(12.5), Some(1250));
        assert_eq!(units_to_cents(0.1 + 0.2), Some(30));
        assert_eq!(units_to_cents(f64::NAN), None);
        assert_eq!(units_to_cents(f64::INFINITY), None);
        assert_eq!(units_to_cents(5e16), None);
        assert_eq!(units_to_cents(-5e16), None);
        assert_eq!(cents_to_units(1250), 12.5);
    }
}

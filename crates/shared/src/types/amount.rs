//! Monetary amount helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts arrive from operator-entered documents, so parsing is lenient:
//! anything that is not a usable non-negative number reads as zero.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Currency prefixes operators sometimes type in front of amounts.
const CURRENCY_PREFIXES: [&str; 2] = ["KES", "KSH"];

/// Reads a monetary amount from a JSON value.
///
/// Numbers and numeric strings (`"1,500.50"`, `" 200 "`, `"KES 300"`) are
/// accepted. Missing, null, boolean, structured, unparseable, and negative
/// values all read as zero.
#[must_use]
pub fn parse_amount(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_text(text),
        _ => None,
    };

    match parsed {
        Some(amount) if amount.is_sign_negative() => Decimal::ZERO,
        Some(amount) => amount,
        None => Decimal::ZERO,
    }
}

fn parse_text(text: &str) -> Option<Decimal> {
    let mut trimmed = text.trim();
    for prefix in CURRENCY_PREFIXES {
        let matches = trimmed
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches {
            trimmed = trimmed[prefix.len()..].trim_start();
            break;
        }
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    parse_decimal(&cleaned)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Formats an amount with two decimal places and thousands separators.
///
/// `12345.5` renders as `12,345.50`; negative amounts keep a leading `-`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[rstest]
    #[case(json!(10000), dec!(10000))]
    #[case(json!(12.5), dec!(12.5))]
    #[case(json!("1,500.50"), dec!(1500.50))]
    #[case(json!(" 200 "), dec!(200))]
    #[case(json!("KES 300"), dec!(300))]
    #[case(json!("ksh1_000"), dec!(1000))]
    fn test_parse_amount_accepts_numeric_input(#[case] value: Value, #[case] expected: Decimal) {
        assert_eq!(parse_amount(&value), expected);
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(""))]
    #[case(json!("   "))]
    #[case(json!("abc"))]
    #[case(json!(true))]
    #[case(json!({"amount": 5}))]
    #[case(json!([1, 2]))]
    #[case(json!(-50))]
    #[case(json!("-12.00"))]
    fn test_parse_amount_degrades_to_zero(#[case] value: Value) {
        assert_eq!(parse_amount(&value), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_scientific_notation() {
        assert_eq!(parse_amount(&json!(1.5e3)), dec!(1500));
    }

    #[rstest]
    #[case(dec!(0), "0.00")]
    #[case(dec!(999), "999.00")]
    #[case(dec!(1000), "1,000.00")]
    #[case(dec!(12345.5), "12,345.50")]
    #[case(dec!(1234567.891), "1,234,567.89")]
    #[case(dec!(-4500), "-4,500.00")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }
}

//! Pure validation and formatting of phone and money inputs. No I/O.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Value;

use super::errors::DomainError;

/// Kenyan country code prefixing every normalized M-Pesa MSISDN.
pub const COUNTRY_CODE: &str = "254";

/// Keep only ASCII digits from a raw phone input ("+254 712-345-678" →
/// "254712345678").
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize a subscriber number into the form the provider accepts:
/// `254` + network digit (`1` or `7`) + 8 digits. A leading national `0`
/// is replaced by the country code ("0712345678" → "254712345678").
pub fn normalize_phone(raw: &str) -> Result<String, DomainError> {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return Err(DomainError::validation("phone number is required"));
    }

    let msisdn = match digits.strip_prefix('0') {
        Some(rest) => format!("{COUNTRY_CODE}{rest}"),
        None => digits,
    };

    if !is_valid_msisdn(&msisdn) {
        return Err(DomainError::Validation(format!(
            "phone number '{raw}' is not a valid M-Pesa number"
        )));
    }
    Ok(msisdn)
}

fn is_valid_msisdn(s: &str) -> bool {
    s.len() == 12
        && s.starts_with(COUNTRY_CODE)
        && matches!(s.as_bytes()[3], b'1' | b'7')
        && s.as_bytes()[4..].iter().all(u8::is_ascii_digit)
}

/// Parse a money value from JSON. The provider and clients are inconsistent
/// about whether amounts arrive as numbers or strings, so both are accepted.
pub fn parse_amount(value: &Value, field: &str) -> Result<BigDecimal, DomainError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Null => {
            return Err(DomainError::Validation(format!("{field} is required")));
        }
        _ => {
            return Err(DomainError::Validation(format!("{field} must be numeric")));
        }
    };

    BigDecimal::from_str(&text)
        .map_err(|_| DomainError::Validation(format!("{field} '{text}' is not a valid amount")))
}

/// Parse an amount that must be strictly positive (order totals, payments).
pub fn parse_positive_amount(value: &Value, field: &str) -> Result<BigDecimal, DomainError> {
    let amount = parse_amount(value, field)?;
    if amount <= BigDecimal::from(0) {
        return Err(DomainError::Validation(format!("{field} must be positive")));
    }
    Ok(amount)
}

/// Parse an amount that may be zero (item prices; free items are allowed).
pub fn parse_price(value: &Value, field: &str) -> Result<BigDecimal, DomainError> {
    let amount = parse_amount(value, field)?;
    if amount < BigDecimal::from(0) {
        return Err(DomainError::Validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn national_prefix_is_replaced_with_country_code() {
        assert_eq!(normalize_phone("0712345678").unwrap(), "254712345678");
    }

    #[test]
    fn already_prefixed_number_passes_through() {
        assert_eq!(normalize_phone("254712345678").unwrap(), "254712345678");
    }

    #[test]
    fn formatting_characters_are_stripped() {
        assert_eq!(normalize_phone("+254 712-345-678").unwrap(), "254712345678");
    }

    #[test]
    fn network_digit_one_is_accepted() {
        assert_eq!(normalize_phone("0112345678").unwrap(), "254112345678");
    }

    #[test]
    fn network_digit_eight_is_rejected() {
        assert!(matches!(
            normalize_phone("0812345678"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn empty_phone_is_rejected() {
        assert!(matches!(
            normalize_phone("  +- "),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn short_number_is_rejected() {
        assert!(normalize_phone("071234").is_err());
    }

    #[test]
    fn overlong_number_is_rejected() {
        assert!(normalize_phone("25471234567890").is_err());
    }

    #[test]
    fn amount_accepts_json_number() {
        assert_eq!(
            parse_positive_amount(&json!(1000), "amount").unwrap(),
            BigDecimal::from(1000)
        );
    }

    #[test]
    fn amount_accepts_decimal_string() {
        assert_eq!(
            parse_positive_amount(&json!("99.50"), "amount").unwrap(),
            "99.50".parse::<BigDecimal>().unwrap()
        );
    }

    #[test]
    fn missing_amount_is_rejected() {
        assert!(parse_positive_amount(&Value::Null, "amount").is_err());
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        assert!(parse_positive_amount(&json!("abc"), "amount").is_err());
        assert!(parse_positive_amount(&json!({"n": 1}), "amount").is_err());
    }

    #[test]
    fn zero_amount_is_rejected() {
        assert!(parse_positive_amount(&json!(0), "amount").is_err());
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(parse_positive_amount(&json!(-5), "amount").is_err());
    }

    #[test]
    fn zero_price_is_allowed() {
        assert_eq!(
            parse_price(&json!(0), "price").unwrap(),
            BigDecimal::from(0)
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(parse_price(&json!(-1), "price").is_err());
    }
}

use kwatch_api::types::Market;

use crate::error::KwatchError;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const CODE_LENGTH: usize = 6;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, KwatchError> {
    if input.len() > max_len {
        return Err(KwatchError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(KwatchError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a search query or stock name: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, KwatchError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// True when the trimmed input is a 5 or 6 digit KRX code.
pub fn is_korean_code(input: &str) -> bool {
    let trimmed = input.trim();
    (5..=CODE_LENGTH).contains(&trimmed.len()) && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a KRX stock code and left-pad it with zeros to 6 digits.
pub fn validate_code(input: &str) -> Result<String, KwatchError> {
    if !is_korean_code(input) {
        return Err(KwatchError::InvalidInput(format!(
            "invalid stock code '{}'. Expected 5-6 digits, e.g. 005930",
            input.trim()
        )));
    }
    Ok(format!("{:0>width$}", input.trim(), width = CODE_LENGTH))
}

/// Validate a market name: case-insensitive, accepts the Yahoo suffixes ks/kq.
pub fn validate_market(input: &str) -> Result<Market, KwatchError> {
    input.parse::<Market>().map_err(|_| {
        KwatchError::InvalidInput(format!(
            "unknown market '{}'. Valid values: kospi (ks), kosdaq (kq)",
            input
        ))
    })
}

/// Validate an average purchase price. Thousands separators are allowed.
pub fn validate_avg_price(input: &str) -> Result<f64, KwatchError> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.parse().map_err(|_| {
        KwatchError::InvalidInput(format!("invalid average price '{}'", input.trim()))
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(KwatchError::InvalidInput(format!(
            "average price must be greater than 0, got '{}'",
            input.trim()
        )));
    }
    Ok(value)
}

use crate::normalize::NormalizeError;

/// Parses the whole-amount part of a price into cents
///
/// Thousands separators are site- and currency-dependent (`1.234` in Peru,
/// `1,234` elsewhere), so every `.` and `,` is stripped before parsing and the
/// digits are read as whole currency units.
///
/// # Examples
///
/// ```
/// use meli_scout::normalize::parse_whole_amount_cents;
///
/// assert_eq!(parse_whole_amount_cents("1.234.567").unwrap(), 123456700);
/// assert_eq!(parse_whole_amount_cents("5").unwrap(), 500);
/// ```
pub fn parse_whole_amount_cents(raw: &str) -> Result<u64, NormalizeError> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NormalizeError::InvalidAmount(raw.to_string()));
    }

    let whole: u64 = digits
        .parse()
        .map_err(|_| NormalizeError::Overflow(raw.to_string()))?;

    whole
        .checked_mul(100)
        .ok_or_else(|| NormalizeError::Overflow(raw.to_string()))
}

/// Parses the cents part of a price
///
/// Cents are decorative on the page; an unreadable value is logged and
/// treated as zero.
pub fn parse_cents(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }

    match trimmed.parse::<u64>() {
        Ok(cents) => cents,
        Err(e) => {
            tracing::warn!("Failed to parse cents '{}': {}, using 0", raw, e);
            0
        }
    }
}

/// Combines the whole amount and the optional cents into a total in cents
///
/// `cents` is `None` when the cents element is absent from the page.
pub fn parse_price_cents(whole: &str, cents: Option<&str>) -> Result<u64, NormalizeError> {
    let whole_cents = parse_whole_amount_cents(whole)?;
    let cents = cents.map(parse_cents).unwrap_or(0);

    whole_cents
        .checked_add(cents)
        .ok_or_else(|| NormalizeError::Overflow(whole.to_string()))
}

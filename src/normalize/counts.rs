/// Parses the "sold more than N" count from a product subtitle
///
/// Subtitles look like `"Nuevo  |  +100 vendidos"`: the segment after the
/// first `|` is trimmed, its first word loses a leading `+` and is read as an
/// unsigned integer. Any other shape yields 0.
///
/// # Examples
///
/// ```
/// use meli_scout::normalize::parse_sold_count;
///
/// assert_eq!(parse_sold_count("Nuevo | +100 vendidos"), 100);
/// assert_eq!(parse_sold_count("no pipe here"), 0);
/// ```
pub fn parse_sold_count(s: &str) -> u32 {
    s.split('|')
        .nth(1)
        .and_then(|segment| segment.split_whitespace().next())
        .map(|token| token.strip_prefix('+').unwrap_or(token))
        .filter(|token| !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

/// Removes the parentheses around a review count, e.g. `"(5)"` -> `"5"`
///
/// Parentheses and whitespace are peeled until nothing changes, so cleaning
/// an already clean string is a no-op.
pub fn clean_review_count(s: &str) -> String {
    let mut current = s.trim();
    loop {
        let next = current.strip_prefix('(').unwrap_or(current);
        let next = next.strip_suffix(')').unwrap_or(next).trim();
        if next == current {
            return current.to_string();
        }
        current = next;
    }
}

/// Converts a scraped string to an optional unsigned count
///
/// Empty input is silently absent. Anything that is not a `u32` (negative,
/// decimal, out of range, garbage) is absent and logged.
pub fn parse_optional_u32(s: &str) -> Option<u32> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<u32>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to parse '{}' as an unsigned count: {}", s, e);
            None
        }
    }
}

/// Converts a scraped string to an optional float (ratings)
///
/// Empty input is silently absent; unparsable or non-finite values are
/// absent and logged.
pub fn parse_optional_f32(s: &str) -> Option<f32> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<f32>() {
        Ok(value) if value.is_finite() => Some(value),
        Ok(value) => {
            tracing::warn!("Ignoring non-finite rating '{}' ({})", s, value);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to parse '{}' as a rating: {}", s, e);
            None
        }
    }
}

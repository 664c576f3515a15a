/// Checks whether a URL starts with any of the given prefixes
///
/// Used for URL kind classification and for the tracking-link denylist.
/// Matching is case-sensitive and empty prefixes never match.
///
/// # Examples
///
/// ```
/// use meli_scout::url::matches_any_prefix;
///
/// let denylist = vec!["https://click1".to_string()];
/// assert!(matches_any_prefix("https://click1.example.com/x", &denylist));
/// assert!(!matches_any_prefix("https://articulo.example.com/x", &denylist));
/// ```
pub fn matches_any_prefix(candidate: &str, prefixes: &[String]) -> bool {
    prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && candidate.starts_with(prefix.as_str()))
}

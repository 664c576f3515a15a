/// Visitation status definitions for frontier entries
///
/// Every URL in the frontier starts as `Pending` and moves to exactly one
/// terminal status after a fetch attempt.
use std::fmt;

/// Represents the current status of a URL in the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlStatus {
    /// URL has been discovered but not yet fetched
    Pending,

    /// URL was fetched and a record was extracted
    Visited,

    /// URL fetch or extraction failed
    Failed,
}

impl UrlStatus {
    /// Returns true if this is a terminal status (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the URL is still waiting to be fetched
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns the lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Visited => "visited",
            Self::Failed => "failed",
        }
    }

    /// Parses a status label
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "visited" => Some(Self::Visited),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible statuses
    pub fn all() -> [Self; 3] {
        [Self::Pending, Self::Visited, Self::Failed]
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

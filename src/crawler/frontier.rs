//! URL frontier
//!
//! A deduplicated set of discovered URLs, each with a [`UrlStatus`]. Entries
//! are created `Pending`, move to `Visited` or `Failed` once and are never
//! removed during a session. All operations serialize on one mutex, so a
//! shared `&UrlFrontier` is safe across workers.

use crate::state::UrlStatus;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct UrlFrontier {
    entries: Mutex<HashMap<String, UrlStatus>>,
}

impl UrlFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, UrlStatus>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `url` as `Pending` unless it is already known
    ///
    /// Returns true if the URL was new. Duplicates keep their current status.
    pub fn add(&self, url: &str) -> bool {
        let mut entries = self.entries();
        if entries.contains_key(url) {
            tracing::debug!("Frontier already has {}", url);
            return false;
        }
        entries.insert(url.to_string(), UrlStatus::Pending);
        true
    }

    /// Adds every URL; returns how many were new
    pub fn bulk_add<I, S>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        urls.into_iter().filter(|url| self.add(url.as_ref())).count()
    }

    pub fn mark_visited(&self, url: &str) -> bool {
        self.mark(url, UrlStatus::Visited)
    }

    pub fn mark_failed(&self, url: &str) -> bool {
        self.mark(url, UrlStatus::Failed)
    }

    /// Sets a terminal status; unknown URLs are left alone and return false
    fn mark(&self, url: &str, status: UrlStatus) -> bool {
        let mut entries = self.entries();
        match entries.get_mut(url) {
            Some(current) => {
                if current.is_terminal() {
                    tracing::debug!("{} already {}, now {}", url, current, status);
                }
                *current = status;
                true
            }
            None => {
                tracing::debug!("Cannot mark unknown URL {} as {}", url, status);
                false
            }
        }
    }

    /// Any pending URL; no ordering is promised
    pub fn next_pending(&self) -> Option<String> {
        self.entries()
            .iter()
            .find(|(_, status)| status.is_pending())
            .map(|(url, _)| url.clone())
    }

    pub fn status(&self, url: &str) -> Option<UrlStatus> {
        self.entries().get(url).copied()
    }

    /// Total number of known URLs
    pub fn count(&self) -> usize {
        self.entries().len()
    }

    /// Number of URLs still pending
    pub fn count_remaining(&self) -> usize {
        self.count_with(UrlStatus::Pending)
    }

    pub fn count_with(&self, status: UrlStatus) -> usize {
        self.entries().values().filter(|s| **s == status).count()
    }
}

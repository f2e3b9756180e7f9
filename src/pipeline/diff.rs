//! Diff calculation between two posting snapshots.
//!
//! Postings are compared by title only. Removals are computed alongside
//! additions but only additions trigger notifications.

use std::collections::HashSet;

use crate::models::Posting;

/// Titles that appeared and disappeared between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// In the current snapshot but not the previous one
    pub added: HashSet<String>,
    /// In the previous snapshot but not the current one
    pub removed: HashSet<String>,
}

impl Diff {
    /// Whether `posting` is one of the additions.
    pub fn is_added(&self, posting: &Posting) -> bool {
        self.added.contains(posting.key())
    }
}

/// Calculate the title-set difference between `previous` and `current`.
pub fn calculate_diff(previous: &[Posting], current: &[Posting]) -> Diff {
    let prev_keys: HashSet<&str> = previous.iter().map(Posting::key).collect();
    let curr_keys: HashSet<&str> = current.iter().map(Posting::key).collect();

    Diff {
        added: curr_keys
            .difference(&prev_keys)
            .map(|key| key.to_string())
            .collect(),
        removed: prev_keys
            .difference(&curr_keys)
            .map(|key| key.to_string())
            .collect(),
    }
}

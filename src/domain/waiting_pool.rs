//! The pool of clients waiting to be paired.

use super::client_id::ClientId;
use super::interests::Interests;

/// One waiting client: identity, declared interests, and the monotonic
/// timestamp captured at enqueue (used for FIFO tie-breaks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingEntry {
    pub client_id: ClientId,
    pub interests: Interests,
    pub joined_at_nanos: u64,
}

/// Ordered collection of unpaired clients.
///
/// Entries are kept in insertion order, which coincides with non-decreasing
/// `joined_at_nanos` because join times come from a monotonic clock. A
/// client appears at most once.
#[derive(Debug, Default)]
pub struct WaitingPool {
    entries: Vec<WaitingEntry>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. The client must not already be waiting.
    pub fn insert(&mut self, entry: WaitingEntry) {
        assert!(
            !self.contains(&entry.client_id),
            "client '{}' is already in the waiting pool",
            entry.client_id
        );
        self.entries.push(entry);
    }

    /// Remove the entry for `client_id` if present. Idempotent.
    pub fn remove_by_id(&mut self, client_id: &ClientId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.client_id != *client_id);
        self.entries.len() != before
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.entries.iter().any(|entry| entry.client_id == *client_id)
    }

    /// Enumerate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &WaitingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

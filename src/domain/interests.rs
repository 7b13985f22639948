//! Interest normalization and comparison.
//!
//! Interests arrive from clients either as one comma-separated string or as
//! an already-split list of tags. Both forms canonicalize to a deduplicated,
//! order-preserving tag list. The sentinel tag `random` means "no
//! preference" and only ever matches other `random` declarations.

use std::collections::HashSet;

/// Sentinel tag meaning "no preference"
pub const RANDOM_TAG: &str = "random";

/// A normalized, ordered, duplicate-free list of interest tags.
///
/// Never empty: inputs that normalize to nothing become `[random]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interests(Vec<String>);

impl Interests {
    /// The "no preference" interest list
    pub fn random() -> Self {
        Self(vec![RANDOM_TAG.to_string()])
    }

    /// Normalize a raw comma-separated string.
    ///
    /// The whole string is trimmed first; an empty string or one that
    /// case-insensitively equals `random` yields `[random]`. Otherwise the
    /// string splits on `,`, each piece is trimmed and lowercased, and
    /// empty pieces are dropped.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(RANDOM_TAG) {
            return Self::random();
        }
        Self::collect(
            raw.split(',')
                .map(|tag| tag.trim().to_lowercase())
                .filter(|tag| !tag.is_empty()),
        )
    }

    /// Normalize an already-split list of tags: entries are trimmed, empty
    /// entries dropped, order preserved.
    pub fn from_list(tags: impl IntoIterator<Item = String>) -> Self {
        Self::collect(
            tags.into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty()),
        )
    }

    /// Deduplicate keeping first occurrence; an empty result becomes `[random]`
    fn collect(tags: impl Iterator<Item = String>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        if unique.is_empty() {
            Self::random()
        } else {
            Self(unique)
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    /// Whether the list declares the `random` wildcard
    pub fn has_random(&self) -> bool {
        self.0.iter().any(|tag| tag == RANDOM_TAG)
    }

    /// Number of tags shared with another interest list
    pub fn common_count(&self, other: &Interests) -> usize {
        let own: HashSet<&str> = self.0.iter().map(String::as_str).collect();
        other.0.iter().filter(|tag| own.contains(tag.as_str())).count()
    }
}

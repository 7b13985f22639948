//! Partner selection over the waiting pool.

use std::collections::HashSet;

use super::client_id::ClientId;
use super::interests::{Interests, RANDOM_TAG};
use super::waiting_pool::{WaitingEntry, WaitingPool};

/// Pick the best partner for `candidate_interests` from the pool.
///
/// An entry qualifies when it shares at least one tag with the candidate,
/// or when both sides declared `random`. Among qualifying entries the one
/// with the most shared tags wins; ties go to the entry with the smallest
/// join time (FIFO), and entries that also tie on join time keep the pool's
/// iteration order. `random` is deliberately strict: it pairs only with
/// other `random` declarations, never with an arbitrary topic.
///
/// Returns `None` when nobody qualifies; the caller enqueues the candidate.
pub fn find_best_match<'a>(
    candidate_interests: &Interests,
    exclude_id: &ClientId,
    pool: &'a WaitingPool,
) -> Option<&'a WaitingEntry> {
    let candidate_tags: HashSet<&str> = candidate_interests
        .tags()
        .iter()
        .map(String::as_str)
        .collect();
    let candidate_random = candidate_tags.contains(RANDOM_TAG);

    let mut best: Option<(usize, &WaitingEntry)> = None;
    for entry in pool.iter() {
        if entry.client_id == *exclude_id {
            continue;
        }
        let common = entry
            .interests
            .tags()
            .iter()
            .filter(|tag| candidate_tags.contains(tag.as_str()))
            .count();
        let both_random = candidate_random && entry.interests.has_random();
        if common == 0 && !both_random {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_common, best_entry)) => {
                common > best_common
                    || (common == best_common
                        && entry.joined_at_nanos < best_entry.joined_at_nanos)
            }
        };
        if better {
            best = Some((common, entry));
        }
    }
    best.map(|(_, entry)| entry)
}

//! Per-client session lifecycle.

use std::fmt;

/// Lifecycle state of one connected client.
///
/// A client is `Unregistered` from transport connect until its first
/// `find_partner`, then moves between `Waiting` and `Paired` as the matcher
/// and partner events dictate. `Closed` marks a client whose connection is
/// gone; no event is processed for it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unregistered,
    Waiting,
    Paired,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unregistered => write!(f, "unregistered"),
            SessionState::Waiting => write!(f, "waiting"),
            SessionState::Paired => write!(f, "paired"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

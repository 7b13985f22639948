//! Pure matchmaking core.
//!
//! This module contains the business rules of the pairing service without
//! side effects: interest normalization, the waiting pool, the best-match
//! search, the pair registry, and the per-client session lifecycle. Nothing
//! here performs I/O, which keeps the whole core unit-testable.

mod client_id;
mod event;
mod interests;
mod matcher;
mod pair_registry;
mod pusher;
mod session;
mod waiting_pool;

pub use client_id::ClientId;
pub use event::{Emission, MessageSender, OutboundEvent};
pub use interests::{Interests, RANDOM_TAG};
pub use matcher::find_best_match;
pub use pair_registry::PairRegistry;
pub use pusher::{EventPusher, PushError, PusherChannel};
pub use session::SessionState;
pub use waiting_pool::{WaitingEntry, WaitingPool};

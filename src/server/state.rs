//! Server state shared across connections.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::EventPusher;

use super::dispatcher::Dispatcher;

/// Shared application state
pub struct AppState {
    /// Matchmaking state machine. One mutex serializes every inbound event,
    /// so no two events ever observe an inconsistent pool or registry.
    pub dispatcher: Mutex<Dispatcher>,
    /// Egress channels for connected clients
    pub pusher: Arc<dyn EventPusher>,
    /// Server start time, reported by the stats endpoint
    pub started_at: DateTime<Utc>,
}

//! Egress abstraction the server emits events through.
//!
//! The domain defines the interface it needs; the infrastructure layer
//! provides the WebSocket-backed implementation. Delivery is logically
//! non-blocking: frames are queued onto a per-client channel and a slow
//! peer never stalls the matchmaker.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::client_id::ClientId;

/// Per-client egress channel carrying serialized frames
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Egress failures
#[derive(Debug, Error)]
pub enum PushError {
    /// No channel is registered for the client
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    /// The client's channel is closed; its connection is on the way out
    #[error("egress channel for client '{0}' is closed")]
    ChannelClosed(String),
}

/// Delivers serialized event frames to connected clients
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// Register a client's egress channel
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// Remove a client's egress channel
    async fn unregister_client(&self, client_id: &ClientId);

    /// Queue one frame for delivery to a client
    async fn push_to(&self, client_id: &ClientId, frame: &str) -> Result<(), PushError>;
}

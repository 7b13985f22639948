//! WebSocket-backed event pusher.
//!
//! Owns the per-client egress channels. The WebSocket itself is created in
//! the server handler, which registers each connection's sender here; this
//! type only queues frames onto those channels. Sends never block: a frame
//! for a dead channel is an error the caller logs and moves past.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, EventPusher, PushError, PusherChannel};

/// [`EventPusher`] over per-client unbounded channels
#[derive(Default)]
pub struct WebSocketEventPusher {
    clients: Mutex<HashMap<ClientId, PusherChannel>>,
}

impl WebSocketEventPusher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(client_id.clone(), sender);
        tracing::debug!("Client '{}' registered with event pusher", client_id);
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!("Client '{}' unregistered from event pusher", client_id);
    }

    async fn push_to(&self, client_id: &ClientId, frame: &str) -> Result<(), PushError> {
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(client_id) else {
            return Err(PushError::ClientNotFound(client_id.to_string()));
        };
        sender
            .send(frame.to_string())
            .map_err(|_| PushError::ChannelClosed(client_id.to_string()))?;
        tracing::debug!("Pushed frame to client '{}'", client_id);
        Ok(())
    }
}

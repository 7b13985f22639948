//! Outbound event vocabulary of the matchmaking core.
//!
//! The dispatcher never talks to a socket; it returns [`Emission`]s and the
//! transport layer delivers them. Signaling payloads (`offer`, `answer`,
//! `ice-candidate`) are opaque JSON values the core forwards untouched.

use serde_json::Value;

use super::client_id::ClientId;

/// Attribution of a relayed chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSender {
    Me,
    Partner,
}

/// Event emitted by the core toward one client
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// No partner available yet; carries a human-readable status line
    Waiting { status: String },
    /// A pair was formed; carries the counterpart's ID
    PartnerFound { partner_id: ClientId },
    /// Relayed chat message, echoed to the sender with `Me` attribution
    ReceiveMessage { sender: MessageSender, text: String },
    /// Opaque media-session offer, tagged with the caller's ID
    Offer { from: ClientId, offer: Value },
    /// Opaque media-session answer, tagged with the answerer's ID
    Answer { from: ClientId, answer: Value },
    /// Opaque ICE candidate, tagged with the originator's ID
    IceCandidate { from: ClientId, candidate: Value },
    /// The partner stopped sending video
    StopVideo,
    /// Final event about a given partner; the pairing no longer exists
    PartnerDisconnected,
}

/// One outbound delivery: which client receives which event
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub to: ClientId,
    pub event: OutboundEvent,
}

impl Emission {
    pub fn new(to: ClientId, event: OutboundEvent) -> Self {
        Self { to, event }
    }
}

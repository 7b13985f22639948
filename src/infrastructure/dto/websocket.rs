//! Named-event frames for the WebSocket protocol.
//!
//! Every frame is one JSON object: `{"type": "<event>", "data": <payload>}`.
//! Events without a payload omit `data`. Inbound decoding is lenient: an
//! unknown event name or an undecodable payload yields `None` and the
//! server drops the frame without replying.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ClientId, Interests};

/// Envelope shared by every inbound frame
#[derive(Debug, Deserialize)]
struct EventFrame {
    #[serde(rename = "type")]
    event: String,
    #[serde(default)]
    data: Value,
}

/// Raw interest payload: one comma-separated string or a list of tags
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InterestsInput {
    Single(String),
    List(Vec<String>),
}

/// Decoded client-to-server event
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    FindPartner { interests: Interests },
    SendMessage { text: String },
    Offer { offer: Value },
    Answer { to: ClientId, answer: Value },
    IceCandidate { candidate: Value },
    StopVideo,
    Skip { interests: Option<Interests> },
    LeaveChat,
}

impl ClientEvent {
    /// Decode one inbound text frame; `None` means "drop it"
    pub fn parse(text: &str) -> Option<Self> {
        let frame: EventFrame = serde_json::from_str(text).ok()?;
        let event = match frame.event.as_str() {
            "find_partner" => {
                let input: InterestsInput = serde_json::from_value(frame.data).ok()?;
                ClientEvent::FindPartner {
                    interests: input.into(),
                }
            }
            "send_message" => {
                #[derive(Deserialize)]
                struct Data {
                    text: String,
                }
                let data: Data = serde_json::from_value(frame.data).ok()?;
                ClientEvent::SendMessage { text: data.text }
            }
            "offer" => {
                #[derive(Deserialize)]
                struct Data {
                    offer: Value,
                }
                let data: Data = serde_json::from_value(frame.data).ok()?;
                ClientEvent::Offer { offer: data.offer }
            }
            "answer" => {
                #[derive(Deserialize)]
                struct Data {
                    to: ClientId,
                    answer: Value,
                }
                let data: Data = serde_json::from_value(frame.data).ok()?;
                ClientEvent::Answer {
                    to: data.to,
                    answer: data.answer,
                }
            }
            "ice-candidate" => {
                #[derive(Deserialize)]
                struct Data {
                    candidate: Value,
                }
                let data: Data = serde_json::from_value(frame.data).ok()?;
                ClientEvent::IceCandidate {
                    candidate: data.candidate,
                }
            }
            "stop_video" => ClientEvent::StopVideo,
            "skip" => {
                let interests = if frame.data.is_null() {
                    None
                } else {
                    let input: InterestsInput = serde_json::from_value(frame.data).ok()?;
                    Some(input.into())
                };
                ClientEvent::Skip { interests }
            }
            "leaveChat" => ClientEvent::LeaveChat,
            _ => return None,
        };
        Some(event)
    }
}

/// Server-to-client frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEventDto {
    Waiting(String),
    PartnerFound(ClientId),
    ReceiveMessage { sender: SenderTag, text: String },
    Offer { from: ClientId, offer: Value },
    Answer { from: ClientId, answer: Value },
    #[serde(rename = "ice-candidate")]
    IceCandidate { from: ClientId, candidate: Value },
    StopVideo,
    PartnerDisconnected,
}

/// Attribution tag on a relayed chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderTag {
    Me,
    Partner,
}

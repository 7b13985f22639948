//! Conversion logic between DTOs and domain types.

use crate::domain::{Interests, MessageSender, OutboundEvent};
use crate::infrastructure::dto::websocket::{InterestsInput, SenderTag, ServerEventDto};

// ========================================
// DTO -> Domain
// ========================================

impl From<InterestsInput> for Interests {
    fn from(input: InterestsInput) -> Self {
        match input {
            InterestsInput::Single(raw) => Interests::parse(&raw),
            InterestsInput::List(tags) => Interests::from_list(tags),
        }
    }
}

// ========================================
// Domain -> DTO
// ========================================

impl From<MessageSender> for SenderTag {
    fn from(sender: MessageSender) -> Self {
        match sender {
            MessageSender::Me => SenderTag::Me,
            MessageSender::Partner => SenderTag::Partner,
        }
    }
}

impl From<OutboundEvent> for ServerEventDto {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::Waiting { status } => ServerEventDto::Waiting(status),
            OutboundEvent::PartnerFound { partner_id } => ServerEventDto::PartnerFound(partner_id),
            OutboundEvent::ReceiveMessage { sender, text } => ServerEventDto::ReceiveMessage {
                sender: sender.into(),
                text,
            },
            OutboundEvent::Offer { from, offer } => ServerEventDto::Offer { from, offer },
            OutboundEvent::Answer { from, answer } => ServerEventDto::Answer { from, answer },
            OutboundEvent::IceCandidate { from, candidate } => {
                ServerEventDto::IceCandidate { from, candidate }
            }
            OutboundEvent::StopVideo => ServerEventDto::StopVideo,
            OutboundEvent::PartnerDisconnected => ServerEventDto::PartnerDisconnected,
        }
    }
}

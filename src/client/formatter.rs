//! Event formatting for terminal display.

use chrono::{DateTime, Local};

use crate::infrastructure::dto::websocket::SenderTag;

/// Event formatter for terminal display
pub struct EventFormatter;

impl EventFormatter {
    /// Format the waiting status line
    pub fn format_waiting(status: &str) -> String {
        format!("\n… {}\n", status)
    }

    /// Format the partner-found notification
    pub fn format_partner_found(partner_id: &str, at: &DateTime<Local>) -> String {
        format!(
            "\n★ Partner found ({}) at {}. Say hi!\n",
            partner_id,
            at.format("%H:%M:%S")
        )
    }

    /// Format a relayed chat message
    pub fn format_chat_message(sender: SenderTag, text: &str, at: &DateTime<Local>) -> String {
        let label = match sender {
            SenderTag::Me => "me",
            SenderTag::Partner => "partner",
        };
        format!("\n[{}] {}: {}\n", at.format("%H:%M:%S"), label, text)
    }

    /// Format a signaling notification; payloads are not shown
    pub fn format_signaling(kind: &str, from: &str) -> String {
        format!("\n← {} from {}\n", kind, from)
    }

    /// Format the partner-stopped-video notification
    pub fn format_stop_video() -> String {
        "\n◼ Partner stopped video\n".to_string()
    }

    /// Format the end-of-conversation notification
    pub fn format_partner_disconnected() -> String {
        "\n✂ Partner disconnected. Use /find to meet someone new.\n".to_string()
    }

    /// Format a raw text frame (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

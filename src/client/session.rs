//! Client session management.

use std::io::Write;

use chrono::Local;
use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::infrastructure::dto::websocket::ServerEventDto;

use super::error::ClientError;
use super::formatter::EventFormatter;

const PROMPT: &str = "chat> ";

/// Redisplay the prompt after printing an event
fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}

/// Translate one input line into an outbound frame; `None` quits
fn frame_for_line(line: &str) -> Option<String> {
    let frame = if let Some(rest) = line.strip_prefix("/find") {
        serde_json::json!({"type": "find_partner", "data": rest.trim()})
    } else if let Some(rest) = line.strip_prefix("/skip") {
        let rest = rest.trim();
        if rest.is_empty() {
            serde_json::json!({"type": "skip"})
        } else {
            serde_json::json!({"type": "skip", "data": rest})
        }
    } else if line == "/leave" {
        serde_json::json!({"type": "leaveChat"})
    } else if line == "/stopvideo" {
        serde_json::json!({"type": "stop_video"})
    } else if line == "/quit" {
        return None;
    } else {
        serde_json::json!({"type": "send_message", "data": {"text": line}})
    };
    Some(frame.to_string())
}

/// Render one server frame for the terminal
fn display(text: &str) -> String {
    let now = Local::now();
    match serde_json::from_str::<ServerEventDto>(text) {
        Ok(ServerEventDto::Waiting(status)) => EventFormatter::format_waiting(&status),
        Ok(ServerEventDto::PartnerFound(partner_id)) => {
            EventFormatter::format_partner_found(partner_id.as_str(), &now)
        }
        Ok(ServerEventDto::ReceiveMessage { sender, text }) => {
            EventFormatter::format_chat_message(sender, &text, &now)
        }
        Ok(ServerEventDto::Offer { from, .. }) => {
            EventFormatter::format_signaling("offer", from.as_str())
        }
        Ok(ServerEventDto::Answer { from, .. }) => {
            EventFormatter::format_signaling("answer", from.as_str())
        }
        Ok(ServerEventDto::IceCandidate { from, .. }) => {
            EventFormatter::format_signaling("ice candidate", from.as_str())
        }
        Ok(ServerEventDto::StopVideo) => EventFormatter::format_stop_video(),
        Ok(ServerEventDto::PartnerDisconnected) => EventFormatter::format_partner_disconnected(),
        Err(_) => EventFormatter::format_raw_message(text),
    }
}

/// Run the terminal client session
pub async fn run_client_session(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;

    tracing::info!("Connected to pairing server");
    println!(
        "\nConnected. Commands: /find <interests>, /skip [interests], /leave, /stopvideo, /quit.\n\
         Anything else is sent to your partner. Press Ctrl+C to exit.\n"
    );

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming frames
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    print!("{}", display(&text));
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task translating input lines into outbound frames
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let Some(frame) = frame_for_line(&line) else {
                break;
            };
            if let Err(e) = write.send(Message::Text(frame.into())).await {
                tracing::warn!("Failed to send frame: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(false) {
                return Err(Box::new(ClientError::Connection("Connection lost".to_string())));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(Box::new(ClientError::Connection("Connection lost".to_string())));
            }
        }
    }

    Ok(())
}

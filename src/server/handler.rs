//! WebSocket and HTTP handlers.
//!
//! The WebSocket handler is the connection supervisor: it allocates the
//! client ID, wires the egress channel, feeds inbound frames through the
//! dispatcher, and guarantees cleanup when the transport drops. Emissions
//! are delivered after the dispatcher lock is released, so no lock is ever
//! held across a send.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ClientId, Emission, EventPusher};
use crate::infrastructure::dto::{
    http::StatsDto,
    websocket::{ClientEvent, ServerEventDto},
};

use super::{dispatcher::Dispatcher, state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // The supervisor owns identity: IDs are allocated here, never client-supplied
    let client_id = ClientId::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, client_id))
}

pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>, client_id: ClientId) {
    let (mut sender, mut receiver) = socket.split();

    // Create the egress channel for this client and register it before any
    // event can be dispatched
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.pusher.register_client(client_id.clone(), tx).await;
    {
        let mut dispatcher = state.dispatcher.lock().await;
        dispatcher.connect(client_id.clone());
    }
    tracing::info!("Client '{}' connected", client_id);

    let recv_state = state.clone();
    let recv_id = client_id.clone();

    // Task feeding inbound frames through the dispatcher
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error for '{}': {}", recv_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let Some(event) = ClientEvent::parse(&text) else {
                        tracing::debug!("Dropping undecodable frame from '{}'", recv_id);
                        continue;
                    };

                    // Apply the event inside the critical section, deliver
                    // the emissions outside it
                    let emissions = {
                        let mut dispatcher = recv_state.dispatcher.lock().await;
                        dispatch(&mut dispatcher, &recv_id, event)
                    };
                    deliver(recv_state.pusher.as_ref(), emissions).await;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Task draining the egress channel into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // The transport is gone: run the disconnect transition, notify the
    // former partner, and drop the egress channel
    let emissions = {
        let mut dispatcher = state.dispatcher.lock().await;
        dispatcher.disconnect(&client_id)
    };
    deliver(state.pusher.as_ref(), emissions).await;
    state.pusher.unregister_client(&client_id).await;
    tracing::info!("Client '{}' disconnected and cleaned up", client_id);
}

/// Route one decoded event to its dispatcher transition
fn dispatch(dispatcher: &mut Dispatcher, client_id: &ClientId, event: ClientEvent) -> Vec<Emission> {
    match event {
        ClientEvent::FindPartner { interests } => dispatcher.find_partner(client_id, interests),
        ClientEvent::SendMessage { text } => dispatcher.send_message(client_id, text),
        ClientEvent::Offer { offer } => dispatcher.offer(client_id, offer),
        ClientEvent::Answer { to, answer } => dispatcher.answer(client_id, to, answer),
        ClientEvent::IceCandidate { candidate } => dispatcher.ice_candidate(client_id, candidate),
        ClientEvent::StopVideo => dispatcher.stop_video(client_id),
        ClientEvent::Skip { interests } => dispatcher.skip(client_id, interests),
        ClientEvent::LeaveChat => dispatcher.leave_chat(client_id),
    }
}

/// Serialize and queue each emission; failures are logged, never surfaced
async fn deliver(pusher: &dyn EventPusher, emissions: Vec<Emission>) {
    for Emission { to, event } in emissions {
        let frame = serde_json::to_string(&ServerEventDto::from(event)).unwrap();
        if let Err(e) = pusher.push_to(&to, &frame).await {
            tracing::warn!("Failed to push event to client '{}': {}", to, e);
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Process-local matchmaking counters
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsDto> {
    let dispatcher = state.dispatcher.lock().await;

    Json(StatsDto {
        connected: dispatcher.connected_count(),
        waiting: dispatcher.waiting_count(),
        pairs: dispatcher.pair_count(),
        started_at: state.started_at.to_rfc3339(),
    })
}

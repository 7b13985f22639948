//! Event pusher implementations.
//!
//! The domain defines the [`EventPusher`](crate::domain::EventPusher) trait;
//! this module provides the WebSocket-backed implementation.

pub mod websocket;

pub use websocket::WebSocketEventPusher;

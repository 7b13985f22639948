//! Interest-based pairing and signaling library.
//!
//! This library provides the matchmaking core, the WebSocket server, and a
//! terminal reference client for an anonymous two-party chat-and-video
//! service. Clients declare interests, get paired with the best-overlapping
//! waiting client, exchange text messages through the server, and establish
//! peer-to-peer media sessions via opaque signaling relays.

// layers
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod server;

// shared library
pub mod common;

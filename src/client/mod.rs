//! Terminal reference client.
//!
//! Connects to a pairing server, looks for a partner with `/find`, chats by
//! typing plain lines, and moves on with `/skip`. Used for manual testing
//! and demos; the production UI is a browser client speaking the same
//! protocol.

mod error;
mod formatter;
mod session;

pub use error::ClientError;
pub use session::run_client_session;

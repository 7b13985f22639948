//! Terminal client for the pairing server.
//!
//! Connects to a pairing server, declares interests with `/find`, chats
//! with whoever the matchmaker picks, and moves on with `/skip`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client
//! cargo run --bin client -- --url ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;

use pairchat_rs::client::run_client_session;
use pairchat_rs::common::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Terminal client for the interest-based pairing server", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, env = "PAIRCHAT_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client_session(&args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

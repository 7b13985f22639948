//! Interest-based pairing and signaling server.
//!
//! Pairs anonymous clients by declared interests, relays their chat
//! messages, and forwards opaque media signaling between them.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! PAIRCHAT_PORT=3000 cargo run --bin server
//! ```

use clap::Parser;

use pairchat_rs::common::logger::setup_logger;
use pairchat_rs::server::run_server;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Interest-based pairing and signaling server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "PAIRCHAT_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PAIRCHAT_PORT", default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    if let Err(e) = run_server(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

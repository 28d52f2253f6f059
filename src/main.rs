//! TinyChat server binary.
//!
//! ```text
//!     Client ──TCP──▶ net::Listener (bounded accept)
//!                        │
//!                        ▼ one task per connection
//!                  http::server worker
//!                        │  request line + headers   (http::request)
//!                        │  query + form body        (http::query)
//!                        ▼
//!                  routing::Route ──▶ chat::ConversationStore
//!                        │
//!                        ▼
//!                  http::response ──▶ socket write, close
//! ```

use std::path::PathBuf;

use clap::Parser;

use tinychat::config::loader::load_config;
use tinychat::config::ChatConfig;
use tinychat::http::ChatServer;
use tinychat::lifecycle::Shutdown;
use tinychat::net::listener::Listener;
use tinychat::observability::{logging, metrics};
use tinychat::ConversationStore;

/// A web-based chat server.
#[derive(Parser, Debug)]
#[command(name = "tinychat", version, about, long_about = None)]
struct Cli {
    /// TCP port to listen on.
    port: u16,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit with 1; --help and --version are not errors.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ChatConfig::default(),
    };
    config.listener.port = cli.port;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("tinychat v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        max_connections = config.listener.max_connections,
        read_timeout_secs = config.timeouts.read_secs,
        write_timeout_secs = config.timeouts.write_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = Listener::bind(&config.listener).await?;

    // The binary runs until killed; the coordinator is never triggered here.
    let shutdown = Shutdown::new();
    let server = ChatServer::new(config, ConversationStore::new());
    server.run(listener, shutdown.subscribe()).await?;

    Ok(())
}

//! chathub entry point.
//!
//! Parses CLI arguments, initializes database and hub state, then
//! either serves the relay or dumps the stored backlog.

mod http;
mod state;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chathub_core::repository::MessageRepository;
use chathub_infra::config::{load_config, resolve_data_dir};
use chathub_infra::sqlite::SqliteMessageRepository;
use chathub_types::message::ChatMessage;
use state::AppState;

#[derive(Parser)]
#[command(name = "chathub", about = "Real-time chat relay hub", version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay server
    Serve {
        /// Bind address (overrides config.toml)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides config.toml)
        #[arg(long)]
        port: Option<u16>,
        /// SQLite database URL (overrides config.toml)
        #[arg(long)]
        database_url: Option<String>,
    },
    /// Print the stored message backlog in insertion order
    History {
        /// SQLite database URL (overrides config.toml)
        #[arg(long)]
        database_url: Option<String>,
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,chathub=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir).await?;
    let mut config = load_config(&data_dir).await;

    match cli.command {
        Commands::Serve {
            host,
            port,
            database_url,
        } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(url) = database_url {
                config.database_url = url;
            }

            let state = AppState::init(&config).await?;

            let addr = format!("{}:{}", config.host, config.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "chathub listening");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("server stopped");
        }

        Commands::History { database_url, json } => {
            if let Some(url) = database_url {
                config.database_url = url;
            }

            let state = AppState::init(&config).await?;
            let repository = SqliteMessageRepository::new(state.db_pool.clone());
            let messages: Vec<ChatMessage> = repository.scan_all().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else {
                for msg in &messages {
                    println!("[{}] {}: {}", msg.timestamp, msg.username, msg.content);
                }
            }
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

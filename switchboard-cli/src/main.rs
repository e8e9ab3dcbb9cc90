use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use switchboard_server::{Args, ServerConfig, serve};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config: ServerConfig = args.into();
    print_banner(&config);
    info!(
        max_peers = ?config.max_peers_per_room,
        idle_timeout = config.idle_timeout,
        max_message_size = config.max_message_size,
        chat_history = config.chat_history,
        "Starting signaling server"
    );

    // `serve` validates the configuration before binding
    serve(config).await.context("signaling server failed")?;
    Ok(())
}

/// RUST_LOG wins over `--log-level` when both are set.
fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level {level:?}"))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn print_banner(config: &ServerConfig) {
    println!("{}", "📡 Switchboard signaling server".green().bold());
    println!("   {} ws://{}/ws", "socket:".cyan(), config.listen);
    println!("   {} http://{}/health", "health:".cyan(), config.listen);
    match config.max_peers_per_room {
        Some(max) => println!("   {} {} peers per room", "limit: ".cyan(), max),
        None => println!("   {} {}", "limit: ".cyan(), "unlimited".dimmed()),
    }
}

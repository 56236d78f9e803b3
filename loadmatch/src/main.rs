mod call_journal;
mod config;
mod engine;
mod fmcsa_client;
mod metrics;
mod response;
mod server;
mod webhook_service;

use clap::Parser;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the runtime config file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::try_init().unwrap_or_default();
    let args = Args::parse();
    config::RuntimeConfig::from_toml(&args.config).expect("Config is missing");
    {
        server::instance().lock().await.start().await;
    }
    shutdown_signal().await;
    {
        server::instance().lock().await.stop();
    }
    Ok(())
}

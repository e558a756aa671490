//! Chinook MCP Server entry point.
//!
//! Provisions the dataset, checks it opens, then serves MCP over stdio until
//! the client disconnects or a termination signal arrives.

use anyhow::{Context, Result};
use chinook_mcp_server::bootstrap::ensure_dataset;
use chinook_mcp_server::database::Dataset;
use chinook_mcp_server::shutdown::{install_signal_handlers, new_shutdown_controller};
use chinook_mcp_server::{ChinookMcpServer, Config, ServerError};
use rmcp::ServiceExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries JSON-RPC
    init_logging();

    info!(
        "Chinook MCP Server v{} starting (transport: stdio)",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().map_err(fatal)?;

    // Setup failures are fatal: never serve without a readable dataset
    let path = ensure_dataset(&config.dataset)
        .await
        .map_err(fatal)
        .context("failed to provision the Chinook dataset")?;
    Dataset::new(&path)
        .verify()
        .await
        .map_err(fatal)
        .context("failed to open the Chinook dataset")?;

    let shutdown_controller = new_shutdown_controller();
    install_signal_handlers(shutdown_controller.clone());

    let server = ChinookMcpServer::new(config);
    let service = server.serve(rmcp::transport::stdio()).await?;
    info!("Server initialized, ready to accept requests");

    let mut shutdown_signal = shutdown_controller.signal();

    tokio::select! {
        quit_reason = service.waiting() => {
            match quit_reason {
                Ok(reason) => info!("Service stopped: {:?}", reason),
                Err(e) => error!("Service error: {}", e),
            }
        }
        reason = shutdown_signal.recv() => {
            if let Some(reason) = reason {
                info!("Received {} signal", reason);
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Log a startup error with its hint before aborting.
fn fatal(e: ServerError) -> anyhow::Error {
    error!("{}", e);
    if let Some(hint) = e.suggestion() {
        error!("Hint: {}", hint);
    }
    e.into()
}

/// Initialize tracing subscriber with stderr output.
fn init_logging() {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn,chinook_mcp_server=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

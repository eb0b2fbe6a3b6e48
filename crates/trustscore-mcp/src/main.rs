//! Trust Score MCP Server
//!
//! Exposes the Trust Score HTTP API as MCP tools over stdio JSON-RPC so AI
//! agents can read on-chain trust records and submit owner writes.

mod tools;

use std::io::{self, BufRead, Write};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tools::{handle_request, is_notification, JsonRpcRequest, TrustScoreTools};

fn main() -> anyhow::Result<()> {
    // stdout carries the protocol
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trustscore_mcp=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let tools = TrustScoreTools::from_env();
    tracing::info!(api_url = %tools.api_url(), "Trust Score MCP server ready, listening on stdio");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "Error reading stdin");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Error parsing request");
                continue;
            }
        };

        tracing::debug!(method = %request.method, "Received request");

        if is_notification(&request.method) {
            continue;
        }

        let response = handle_request(&tools, request);

        let response_str = serde_json::to_string(&response)?;
        if let Err(e) = writeln!(stdout, "{}", response_str) {
            tracing::error!(error = %e, "Error writing response");
        }
        if let Err(e) = stdout.flush() {
            tracing::error!(error = %e, "Error flushing stdout");
        }
    }

    tracing::info!("MCP server shutting down");
    Ok(())
}

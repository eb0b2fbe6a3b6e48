mod api;
mod config;
mod error;
mod registry;
mod tracker;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trustscore_core::Chain;

use crate::config::AppConfig;
use crate::registry::{RegistryReader, RegistryWriter};
use crate::tracker::WriteTracker;

#[derive(Clone)]
pub struct AppState {
    pub reader: Arc<dyn RegistryReader>,
    /// Present only when an owner key is configured
    pub writer: Option<Arc<dyn RegistryWriter>>,
    pub tracker: WriteTracker,
    pub config: Arc<AppConfig>,
    pub chain: Chain,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trustscore=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    println!("================================================");
    println!("         TRUST SCORE - Starting Up              ");
    println!("================================================");

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    let chain = config.chain()?;

    println!("[CONFIG] Server: {}:{}", config.server.host, config.server.port);
    println!("[CONFIG] Chain: {} ({})", chain.name, chain.id);
    println!("[CONFIG] RPC: {}", config.chain.rpc_url);
    if config.registry.is_deployed() {
        println!("[CONFIG] TrustRegistry: {}", config.registry.address);
    } else {
        println!("[CONFIG] TrustRegistry: *** NOT DEPLOYED - SET TRUSTSCORE__REGISTRY__ADDRESS ***");
    }

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        chain_id = chain.id,
        registry = %config.registry.address,
        "Starting Trust Score server"
    );

    let reader = registry::connect_reader(&config.chain.rpc_url, config.registry.address)?;

    match reader.health_check().await {
        Ok(block) => {
            tracing::info!(block_number = block, "Connected to RPC");
        }
        Err(e) => {
            tracing::warn!(error = %e, "RPC not reachable, reads will fail until it is");
        }
    }

    let writer = match config.registry.owner_key() {
        Some(key) => {
            let writer = registry::connect_writer(
                &config.chain.rpc_url,
                config.registry.address,
                key,
                config.registry.confirmations,
            )?;
            println!("[CONFIG] Owner signer: {}", writer.signer());
            Some(writer)
        }
        None => {
            println!("[CONFIG] Owner signer: none (write endpoints disabled)");
            None
        }
    };

    let state = AppState {
        reader,
        writer,
        tracker: WriteTracker::new(),
        config: Arc::new(config.clone()),
        chain,
    };

    let app = Router::new()
        .merge(api::create_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("================================================");
    println!("  Server listening on http://{}", addr);
    println!("================================================");
    println!();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub mod dto;
pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Registry-wide reads
        .route("/api/v1/contract", get(handlers::get_contract_status))
        .route("/api/v1/registry/total", get(handlers::get_total_registered))
        .route("/api/v1/registry/owner", get(handlers::get_owner))
        .route("/api/v1/registry/batch", post(handlers::batch_update))
        // Per-wallet reads and owner writes
        .route(
            "/api/v1/wallet/{address}/trust",
            get(handlers::get_trust).post(handlers::update_trust),
        )
        .route("/api/v1/wallet/{address}/score", get(handlers::get_score))
        .route("/api/v1/wallet/{address}/registered", get(handlers::get_registered))
        .route("/api/v1/wallet/{address}/verification", put(handlers::set_verification))
        // Write confirmation status
        .route("/api/v1/tx/{hash}", get(handlers::get_tx_status))
}

use std::str::FromStr;
use std::time::Instant;

use alloy::primitives::B256;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use trustscore_core::{
    display_score, BatchScoreUpdate, ContractStatusView, TrustUpdate, TrustView, WalletAddress,
};

use super::dto::*;
use crate::error::{AppError, AppResult};
use crate::registry::{submit_as_owner, WriteCall};
use crate::tracker::TrackedWrite;
use crate::AppState;

/// Validate an account identifier before any registry call is made.
fn parse_wallet(raw: &str) -> AppResult<WalletAddress> {
    let wallet = WalletAddress::parse(raw)?;
    tracing::debug!(wallet = %wallet, "Wallet address validated");
    Ok(wallet)
}

fn require_deployed(state: &AppState) -> AppResult<()> {
    if state.config.registry.is_deployed() {
        Ok(())
    } else {
        Err(AppError::NotDeployed(state.chain.name.to_string()))
    }
}

pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let start = Instant::now();
    tracing::info!("Processing health check request");

    let (rpc_status, block_number) = match state.reader.health_check().await {
        Ok(block) => {
            tracing::debug!(block_number = block, "RPC health check passed");
            ("connected", Some(block))
        }
        Err(e) => {
            tracing::warn!(error = %e, "RPC health check failed");
            ("disconnected", None)
        }
    };

    let registry_status = if state.config.registry.is_deployed() {
        "deployed"
    } else {
        "not_deployed"
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        registry: registry_status.to_string(),
        rpc: rpc_status.to_string(),
        block_number,
        pending_writes: state.tracker.pending_count().await,
    };

    tracing::info!(
        duration_ms = %start.elapsed().as_millis(),
        rpc_status = %rpc_status,
        registry_status = %registry_status,
        "Health check completed"
    );

    Ok(Json(response))
}

pub async fn get_contract_status(
    State(state): State<AppState>,
) -> AppResult<Json<ContractStatusView>> {
    let start = Instant::now();
    tracing::info!("Processing contract status request");

    let total = if state.config.registry.is_deployed() {
        state.reader.total_registered().await?
    } else {
        0
    };

    let view = ContractStatusView::new(state.config.registry.address, &state.chain, total);

    tracing::info!(
        duration_ms = %start.elapsed().as_millis(),
        deployed = view.deployed,
        total_registered = view.total_registered,
        "Contract status retrieved"
    );

    Ok(Json(view))
}

pub async fn get_total_registered(
    State(state): State<AppState>,
) -> AppResult<Json<TotalRegisteredResponse>> {
    if !state.config.registry.is_deployed() {
        return Ok(Json(TotalRegisteredResponse { total: 0 }));
    }

    let total = state.reader.total_registered().await?;
    tracing::info!(total = total, "Total registered retrieved");

    Ok(Json(TotalRegisteredResponse { total }))
}

pub async fn get_owner(State(state): State<AppState>) -> AppResult<Json<OwnerResponse>> {
    require_deployed(&state)?;

    let owner = state.reader.owner().await?;
    let signer_is_owner = state.writer.as_ref().map(|w| w.signer() == owner);
    tracing::info!(owner = %owner, signer_is_owner = ?signer_is_owner, "Registry owner retrieved");

    Ok(Json(OwnerResponse {
        owner,
        signer_is_owner,
    }))
}

pub async fn get_trust(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> AppResult<Json<TrustView>> {
    let start = Instant::now();
    tracing::info!(wallet = %address, "Processing trust view request");

    let wallet = parse_wallet(&address)?;

    if !state.config.registry.is_deployed() {
        tracing::info!(wallet = %wallet, "Registry not deployed, skipping lookup");
        return Ok(Json(TrustView::not_deployed(&state.chain)));
    }

    let record = state.reader.trust_record(wallet).await?;
    let view = TrustView::from_lookup(wallet, record, &state.chain);

    tracing::info!(
        wallet = %wallet,
        duration_ms = %start.elapsed().as_millis(),
        registered = view.is_registered(),
        "Trust view retrieved"
    );

    Ok(Json(view))
}

pub async fn get_score(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> AppResult<Json<ScoreResponse>> {
    let wallet = parse_wallet(&address)?;

    if !state.config.registry.is_deployed() {
        return Ok(Json(ScoreResponse {
            address: wallet,
            score: None,
            display_score: None,
        }));
    }

    let score = state.reader.trust_score(wallet).await?;
    tracing::info!(wallet = %wallet, score = score, "Trust score retrieved");

    Ok(Json(ScoreResponse {
        address: wallet,
        score: Some(score),
        display_score: Some(display_score(i128::from(score))),
    }))
}

pub async fn get_registered(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> AppResult<Json<RegisteredResponse>> {
    let wallet = parse_wallet(&address)?;

    let registered = if state.config.registry.is_deployed() {
        state.reader.is_registered(wallet).await?
    } else {
        false
    };
    tracing::info!(wallet = %wallet, registered = registered, "Registration checked");

    Ok(Json(RegisteredResponse {
        address: wallet,
        registered,
    }))
}

// ============================================================================
// Privileged writes
// ============================================================================

async fn submit_write(
    state: &AppState,
    call: WriteCall,
) -> AppResult<(StatusCode, Json<WriteAcceptedResponse>)> {
    let start = Instant::now();

    call.validate()?;
    require_deployed(state)?;
    let writer = state.writer.as_ref().ok_or(AppError::WriterUnavailable)?;

    let function = call.function_name();
    let submitted = submit_as_owner(state.reader.as_ref(), writer.as_ref(), call).await?;
    let tx_hash = submitted.tx_hash;

    // Confirmation is observed in the background; the handle is not awaited.
    state.tracker.track(function, submitted).await;

    tracing::info!(
        tx_hash = %tx_hash,
        function = function,
        duration_ms = %start.elapsed().as_millis(),
        "Registry write submitted"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(WriteAcceptedResponse {
            tx_hash: tx_hash.to_string(),
            function: function.to_string(),
            status: "pending".to_string(),
            explorer_url: state.chain.tx_url(&tx_hash.to_string()),
        }),
    ))
}

pub async fn update_trust(
    State(state): State<AppState>,
    Path(address): Path<String>,
    payload: Result<Json<UpdateTrustRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<WriteAcceptedResponse>)> {
    let Json(request) = payload?;
    tracing::info!(wallet = %address, score = request.score, "Processing trust update request");

    let wallet = parse_wallet(&address)?;
    let call = WriteCall::UpdateTrustScore {
        wallet,
        update: TrustUpdate {
            score: request.score,
            total_tx: request.total_tx,
            wallet_age_days: request.wallet_age_days,
        },
    };

    submit_write(&state, call).await
}

pub async fn set_verification(
    State(state): State<AppState>,
    Path(address): Path<String>,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<WriteAcceptedResponse>)> {
    let Json(request) = payload?;
    tracing::info!(wallet = %address, verified = request.verified, "Processing verification request");

    let wallet = parse_wallet(&address)?;
    let call = WriteCall::SetVerification {
        wallet,
        verified: request.verified,
    };

    submit_write(&state, call).await
}

pub async fn batch_update(
    State(state): State<AppState>,
    payload: Result<Json<BatchUpdateRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<WriteAcceptedResponse>)> {
    let Json(request) = payload?;
    tracing::info!(count = request.wallets.len(), "Processing batch score update request");

    let wallets = request
        .wallets
        .iter()
        .map(|w| parse_wallet(w))
        .collect::<AppResult<Vec<_>>>()?;

    let call = WriteCall::BatchUpdateScores(BatchScoreUpdate {
        wallets,
        scores: request.scores,
    });

    submit_write(&state, call).await
}

pub async fn get_tx_status(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> AppResult<Json<TrackedWrite>> {
    let tx_hash = B256::from_str(&hash)
        .map_err(|_| AppError::InvalidParam(format!("Invalid transaction hash: {}", hash)))?;

    let write = state
        .tracker
        .get(&tx_hash)
        .await
        .ok_or(AppError::TxNotFound(hash))?;

    tracing::info!(tx_hash = %tx_hash, status = ?write.status, "Write status retrieved");

    Ok(Json(write))
}

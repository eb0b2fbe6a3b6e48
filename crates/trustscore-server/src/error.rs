use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use trustscore_core::TrustError;

use crate::registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid wallet address: {0}")]
    InvalidWallet(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("TrustRegistry is not deployed on {0}")]
    NotDeployed(String),

    #[error("Registry writes are disabled: no owner key configured")]
    WriterUnavailable,

    #[error("Transaction not found: {0}")]
    TxNotFound(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl From<TrustError> for AppError {
    fn from(err: TrustError) -> Self {
        match err {
            TrustError::InvalidAddress(address) => AppError::InvalidWallet(address),
            other => AppError::InvalidParam(other.to_string()),
        }
    }
}

/// A body that does not deserialize is a parameter error like any other.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidParam(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidWallet(_) => (StatusCode::BAD_REQUEST, "INVALID_WALLET"),
            AppError::InvalidParam(_) => (StatusCode::BAD_REQUEST, "INVALID_PARAM"),
            AppError::NotDeployed(_) => (StatusCode::CONFLICT, "NOT_DEPLOYED"),
            AppError::WriterUnavailable => (StatusCode::FORBIDDEN, "WRITER_UNAVAILABLE"),
            AppError::TxNotFound(_) => (StatusCode::NOT_FOUND, "TX_NOT_FOUND"),
            AppError::Registry(RegistryError::Unauthorized { .. }) => {
                (StatusCode::FORBIDDEN, "UNAUTHORIZED")
            }
            AppError::Registry(_) => (StatusCode::BAD_GATEWAY, "REGISTRY_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match &self {
            AppError::InvalidWallet(wallet) => {
                tracing::warn!(wallet = %wallet, error_code = code, "Invalid wallet address");
            }
            AppError::InvalidParam(param) => {
                tracing::warn!(param = %param, error_code = code, "Invalid parameter");
            }
            AppError::NotDeployed(chain) => {
                tracing::info!(chain = %chain, error_code = code, "Registry not deployed");
            }
            AppError::WriterUnavailable => {
                tracing::warn!(error_code = code, "Write requested without owner key");
            }
            AppError::TxNotFound(hash) => {
                tracing::info!(tx_hash = %hash, error_code = code, "Transaction not tracked");
            }
            AppError::Registry(RegistryError::Unauthorized { signer, owner }) => {
                tracing::warn!(signer = %signer, owner = %owner, error_code = code, "Signer is not registry owner");
            }
            AppError::Registry(e) => {
                tracing::error!(error = %e, error_code = code, "Registry call failed");
            }
        }

        tracing::debug!(
            status_code = %status.as_u16(),
            error_code = %code,
            error_message = %self,
            "Returning error response"
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use trustscore_core::WalletAddress;

    #[test]
    fn test_trust_error_mapping() {
        let err: AppError = TrustError::InvalidAddress("0x12".into()).into();
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "INVALID_WALLET"));

        let err: AppError = TrustError::ScoreOutOfRange(300).into();
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "INVALID_PARAM"));
    }

    #[test]
    fn test_registry_error_mapping() {
        let err = AppError::Registry(RegistryError::Unauthorized {
            signer: WalletAddress::ZERO,
            owner: WalletAddress::ZERO,
        });
        assert_eq!(err.status_and_code(), (StatusCode::FORBIDDEN, "UNAUTHORIZED"));

        let err = AppError::Registry(RegistryError::Unavailable("timeout".into()));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "REGISTRY_ERROR"));
    }
}

use thiserror::Error;

/// Error type for token issuance and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token expiry {expires_at} is not after issuance time {issued_at}")]
    ExpiryNotInFuture { issued_at: i64, expires_at: i64 },

    #[error("Failed to sign token: {0}")]
    SigningFailure(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,
}

use thiserror::Error;

/// Error type for password hash encoding, decoding and derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("Hash cannot be decoded: {0}")]
    MalformedHash(String),

    #[error("Hash uses incompatible algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Hash uses incompatible argon2 version: {0}")]
    UnsupportedVersion(u32),

    #[error("Random salt generation failed: {0}")]
    EntropySourceFailure(String),

    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Hash requires {required_kib} KiB but only {available_kib} KiB are available")]
    MemoryBudgetExceeded { required_kib: u64, available_kib: u64 },
}

impl HashError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        HashError::MalformedHash(reason.into())
    }
}

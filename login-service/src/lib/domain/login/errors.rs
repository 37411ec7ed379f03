use auth_core::HashError;
use auth_core::ServiceTokenError;
use auth_core::TokenError;
use thiserror::Error;

/// Error for user directory lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Directory request failed: {0}")]
    Transport(String),

    #[error("Directory answered with status {0}")]
    Status(u16),

    #[error("Directory query failed: {0}")]
    Query(String),

    #[error("Directory response could not be read: {0}")]
    InvalidResponse(String),

    #[error("Directory returned {0} users for one email")]
    AmbiguousMatch(usize),
}

/// Top-level error for login operations.
///
/// `CredentialNotFound` and `InvalidCredential` are expected outcomes and
/// must look identical to the caller; everything else is an internal failure.
#[derive(Debug, Clone, Error)]
pub enum LoginError {
    #[error("No user with this email")]
    CredentialNotFound,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Password hash error: {0}")]
    Hash(#[from] HashError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(#[from] ServiceTokenError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl LoginError {
    /// True for outcomes caused by the supplied credentials rather than by
    /// the service.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LoginError::CredentialNotFound | LoginError::InvalidCredential
        )
    }
}

impl From<auth_core::AuthenticationError> for LoginError {
    fn from(err: auth_core::AuthenticationError) -> Self {
        match err {
            auth_core::AuthenticationError::InvalidCredentials => LoginError::InvalidCredential,
            auth_core::AuthenticationError::Hash(e) => LoginError::Hash(e),
            auth_core::AuthenticationError::Token(e) => LoginError::Token(e),
        }
    }
}

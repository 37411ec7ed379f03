use std::sync::Arc;

use chrono::Duration;

use crate::jwt::SignedToken;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;
use crate::password::decode;
use crate::password::verify;
use crate::password::HashError;
use crate::password::MemoryBudget;

/// Authentication coordinator combining password verification and token issuance.
///
/// Verification is CPU and memory bound (hundreds of milliseconds for
/// production parameters); async callers should run it on a blocking thread.
pub struct Authenticator {
    issuer: Arc<TokenIssuer>,
    memory_budget: Option<MemoryBudget>,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed user token and its expiry
    pub access_token: SignedToken,
}

/// Authentication operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hash error: {0}")]
    Hash(#[from] HashError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `issuer` - Issues user tokens
    /// * `memory_budget` - When set, hashes too expensive for this host are
    ///   rejected before deriving
    pub fn new(issuer: Arc<TokenIssuer>, memory_budget: Option<MemoryBudget>) -> Self {
        Self {
            issuer,
            memory_budget,
        }
    }

    /// Verify a password against a stored encoded hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Hash` - Stored hash cannot be decoded, exceeds the memory budget, or
    ///   derivation failed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        let (reference, params) = decode(stored_hash)?;

        if let Some(budget) = &self.memory_budget {
            budget.check(&params)?;
        }

        if verify(&params, password.as_bytes(), &reference)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Verify credentials and issue a user token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Encoded hash from the user directory
    /// * `subject` - User identifier for the `sub` claim
    /// * `roles` - Resolved roles, most privileged first
    /// * `lifetime` - User token validity
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Hash` - Password verification failed
    /// * `Token` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        roles: &[String],
        lifetime: Duration,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        self.verify_password(password, stored_hash)?;

        let access_token = self.issuer.issue_for(subject, roles, lifetime)?;

        Ok(AuthenticationResult { access_token })
    }
}

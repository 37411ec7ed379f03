use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::errors::TokenError;
use super::handler::JwtHandler;

/// Source of the current time.
///
/// Injected so token expiry and cache freshness can be tested without sleeping.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A signed token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues signed identity tokens under one issuer name and signing key.
///
/// User tokens and the service token both go through [`TokenIssuer::issue`];
/// only subject, roles and expiry differ.
pub struct TokenIssuer {
    handler: JwtHandler,
    issuer: String,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer using the wall clock.
    ///
    /// # Arguments
    /// * `secret` - HMAC signing key
    /// * `issuer` - Value of the `iss` claim
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self::with_clock(secret, issuer, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &[u8], issuer: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            handler: JwtHandler::new(secret),
            issuer: issuer.into(),
            clock,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Sign a token for `subject` carrying `roles`, valid until `expires_at`.
    ///
    /// # Errors
    /// * `ExpiryNotInFuture` - `expires_at` is not strictly after now
    /// * `SigningFailure` - Claims could not be serialized or signed
    pub fn issue(
        &self,
        subject: &str,
        roles: &[String],
        expires_at: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let issued_at = self.clock.now();
        if expires_at <= issued_at {
            return Err(TokenError::ExpiryNotInFuture {
                issued_at: issued_at.timestamp(),
                expires_at: expires_at.timestamp(),
            });
        }

        let claims = Claims::new(subject, roles.to_vec(), &self.issuer, issued_at, expires_at);
        let token = self.handler.encode(&claims)?;

        Ok(SignedToken { token, expires_at })
    }

    /// Sign a token valid for `lifetime` from now.
    ///
    /// # Errors
    /// Same as [`TokenIssuer::issue`].
    pub fn issue_for(
        &self,
        subject: &str,
        roles: &[String],
        lifetime: Duration,
    ) -> Result<SignedToken, TokenError> {
        self.issue(subject, roles, self.clock.now() + lifetime)
    }

    /// Decode and validate a token signed with this issuer's key.
    ///
    /// # Errors
    /// * `TokenExpired` - Token is past its expiry
    /// * `DecodingFailed` - Token is malformed, forged or from another issuer
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims: Claims = self.handler.decode(token)?;

        if claims.iss != self.issuer {
            return Err(TokenError::DecodingFailed(format!(
                "unexpected issuer '{}'",
                claims.iss
            )));
        }

        Ok(claims)
    }
}

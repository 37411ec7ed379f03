use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::jwt::claims::ROLE_AUTH;
use crate::jwt::SignedToken;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;

/// Subject of the service's own token.
///
/// The nil UUID is reserved: user identifiers are never nil, so no user can
/// be issued a token that impersonates the service.
pub const SERVICE_SUBJECT: Uuid = Uuid::nil();

/// Error type for the service token cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceTokenError {
    #[error("Refresh margin {margin_secs}s must be non-negative and shorter than lifetime {lifetime_secs}s")]
    InvalidLifetime { lifetime_secs: i64, margin_secs: i64 },

    #[error("Service token issuance failed: {0}")]
    IssuanceFailed(#[from] TokenError),

    #[error("Service token cache halted after a failed issuance")]
    Halted,
}

/// Lazily refreshed token the service uses to authenticate its own calls.
///
/// The token is reissued on first use and whenever less than `margin` of its
/// lifetime remains. Token and expiry live behind one lock so a reader never
/// pairs a token with another token's expiry. Refresh is double-checked under
/// the write lock, so concurrent callers that all see a stale token produce a
/// single issuance.
///
/// A failed issuance halts the cache: every later call fails with `Halted`
/// and [`ServiceTokenCache::is_healthy`] reports false. A service that cannot
/// authenticate itself to the directory must stop taking requests.
pub struct ServiceTokenCache {
    issuer: Arc<TokenIssuer>,
    lifetime: Duration,
    margin: Duration,
    current: RwLock<Option<SignedToken>>,
    halted: AtomicBool,
}

impl ServiceTokenCache {
    /// Create an empty cache.
    ///
    /// # Arguments
    /// * `issuer` - Signs the service token
    /// * `lifetime` - Validity of each issued service token
    /// * `margin` - Remaining validity below which the token is refreshed
    ///
    /// # Errors
    /// * `InvalidLifetime` - `margin` is negative or not shorter than `lifetime`
    pub fn new(
        issuer: Arc<TokenIssuer>,
        lifetime: Duration,
        margin: Duration,
    ) -> Result<Self, ServiceTokenError> {
        if margin < Duration::zero() || margin >= lifetime {
            return Err(ServiceTokenError::InvalidLifetime {
                lifetime_secs: lifetime.num_seconds(),
                margin_secs: margin.num_seconds(),
            });
        }

        Ok(Self {
            issuer,
            lifetime,
            margin,
            current: RwLock::new(None),
            halted: AtomicBool::new(false),
        })
    }

    /// Return a token with at least `margin` validity left, issuing a new one
    /// if needed.
    ///
    /// # Errors
    /// * `IssuanceFailed` - Signing failed; the cache halts
    /// * `Halted` - A previous issuance failed
    pub fn ensure_token(&self) -> Result<String, ServiceTokenError> {
        if self.halted.load(Ordering::Acquire) {
            return Err(ServiceTokenError::Halted);
        }

        {
            let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(token) = self.fresh(&current) {
                return Ok(token);
            }
        }

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = self.fresh(&current) {
            return Ok(token);
        }

        let subject = SERVICE_SUBJECT.to_string();
        match self
            .issuer
            .issue_for(&subject, &[ROLE_AUTH.to_string()], self.lifetime)
        {
            Ok(signed) => {
                tracing::info!(
                    expires_at = %signed.expires_at,
                    "Service token refreshed"
                );
                let token = signed.token.clone();
                *current = Some(signed);
                Ok(token)
            }
            Err(e) => {
                self.halted.store(true, Ordering::Release);
                tracing::error!(error = %e, "Service token issuance failed, halting");
                Err(ServiceTokenError::IssuanceFailed(e))
            }
        }
    }

    /// False once an issuance has failed.
    pub fn is_healthy(&self) -> bool {
        !self.halted.load(Ordering::Acquire)
    }

    /// Expiry of the cached token, if one has been issued.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| token.expires_at)
    }

    fn fresh(&self, current: &Option<SignedToken>) -> Option<String> {
        let now = self.issuer.now();
        current
            .as_ref()
            .filter(|token| token.expires_at - now >= self.margin)
            .map(|token| token.token.clone())
    }
}

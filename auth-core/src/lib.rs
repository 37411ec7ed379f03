//! Credential verification and token issuance
//!
//! Provides the security core of the login service:
//! - Argon2id password hashes in the self-describing `$argon2id$v=19$...` format
//! - Constant-time password verification
//! - HS256 identity tokens with subject, issuer, expiry and role claims
//! - A lazily refreshed service token for the service's own directory calls
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth_core::password::{encode, hash_password, verify_encoded, HashParameters};
//!
//! let params = HashParameters { memory_cost_kib: 64, time_cost: 1, ..HashParameters::default() };
//! let raw = hash_password(&params, b"correct horse").unwrap();
//! let encoded = encode(&params, &raw);
//! assert!(verify_encoded(b"correct horse", encoded.as_str()).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth_core::{ServiceTokenCache, TokenIssuer};
//! use chrono::Duration;
//!
//! let issuer = Arc::new(TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", "auth"));
//! let user = issuer.issue_for("user123", &["user".to_string()], Duration::minutes(15)).unwrap();
//! let claims = issuer.verify(&user.token).unwrap();
//! assert_eq!(claims.sub, "user123");
//!
//! let cache = ServiceTokenCache::new(issuer, Duration::days(7), Duration::minutes(5)).unwrap();
//! let service_token = cache.ensure_token().unwrap();
//! assert_eq!(cache.ensure_token().unwrap(), service_token);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod service_token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::Clock;
pub use jwt::SignedToken;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use password::HashError;
pub use password::HashParameters;
pub use password::MemoryBudget;
pub use service_token::ServiceTokenCache;
pub use service_token::ServiceTokenError;
pub use service_token::SERVICE_SUBJECT;

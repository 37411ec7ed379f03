use std::fmt;
use std::str::FromStr;

use auth_core::jwt::claims::ROLE_ADMIN;
use auth_core::jwt::claims::ROLE_USER;
use auth_core::SignedToken;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login attempt.
#[derive(Clone)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: String,
}

impl Credentials {
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// User record as returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    pub id: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub slug: String,
    pub display_name: String,
}

impl DirectoryUser {
    /// Roles granted to this user, most privileged first.
    pub fn roles(&self) -> Vec<String> {
        resolve_roles(self.is_admin)
    }
}

/// Every user gets the `user` role; administrators get `admin` in front of it.
pub fn resolve_roles(is_admin: bool) -> Vec<String> {
    let mut roles = Vec::with_capacity(2);
    if is_admin {
        roles.push(ROLE_ADMIN.to_string());
    }
    roles.push(ROLE_USER.to_string());
    roles
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user_id: String,
    pub roles: Vec<String>,
    pub slug: String,
    pub display_name: String,
    pub token: SignedToken,
}

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Role granted to administrators. Always listed first when present.
pub const ROLE_ADMIN: &str = "admin";

/// Role every authenticated user carries.
pub const ROLE_USER: &str = "user";

/// Role carried by the service's own token.
pub const ROLE_AUTH: &str = "auth";

/// Identity claims carried by every issued token.
///
/// Standard RFC 7519 fields plus the ordered `roles` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Granted roles, most privileged first
    pub roles: Vec<String>,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Build claims for a subject.
    ///
    /// # Arguments
    /// * `subject` - Opaque subject identifier
    /// * `roles` - Roles in priority order
    /// * `issuer` - Issuer name
    /// * `issued_at` - Issuance time
    /// * `expires_at` - Expiration time
    pub fn new(
        subject: impl ToString,
        roles: Vec<String>,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            roles,
            iss: issuer.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

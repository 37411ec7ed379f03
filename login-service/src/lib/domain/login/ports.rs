use async_trait::async_trait;

use crate::domain::login::errors::DirectoryError;
use crate::domain::login::errors::LoginError;
use crate::domain::login::models::Credentials;
use crate::domain::login::models::DirectoryUser;
use crate::domain::login::models::EmailAddress;
use crate::domain::login::models::LoginOutcome;

/// Port for login operations.
#[async_trait]
pub trait LoginServicePort: Send + Sync + 'static {
    /// Authenticate credentials and issue a user token.
    ///
    /// # Arguments
    /// * `credentials` - Email and plaintext password
    ///
    /// # Returns
    /// User identity, roles and signed token
    ///
    /// # Errors
    /// * `CredentialNotFound` - No user with this email
    /// * `InvalidCredential` - Password does not match
    /// * `ServiceUnavailable` - Service token could not be issued
    /// * `Directory`, `Hash`, `Token`, `Unknown` - Internal failures
    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, LoginError>;

    /// False once the service can no longer authenticate itself.
    fn is_healthy(&self) -> bool;
}

/// Lookup of user records by email.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Find the user registered under `email`.
    ///
    /// # Arguments
    /// * `email` - Email to search for
    /// * `service_token` - Credential authenticating this service to the directory
    ///
    /// # Returns
    /// The matching user, or None if no user has this email
    ///
    /// # Errors
    /// * `AmbiguousMatch` - More than one user has this email
    /// * `Transport`, `Status`, `Query`, `InvalidResponse` - Lookup failed
    async fn find_by_email(
        &self,
        email: &EmailAddress,
        service_token: &str,
    ) -> Result<Option<DirectoryUser>, DirectoryError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use auth_core::Authenticator;
use auth_core::ServiceTokenCache;
use chrono::Duration;

use crate::domain::login::errors::LoginError;
use crate::domain::login::models::Credentials;
use crate::domain::login::models::LoginOutcome;
use crate::domain::login::ports::LoginServicePort;
use crate::domain::login::ports::UserDirectory;

/// Domain service implementation for login.
///
/// Looks the user up with the service token, verifies the password on a
/// blocking thread and issues a user token.
pub struct LoginService<UD>
where
    UD: UserDirectory,
{
    directory: Arc<UD>,
    authenticator: Arc<Authenticator>,
    service_tokens: Arc<ServiceTokenCache>,
    user_token_lifetime: Duration,
}

impl<UD> LoginService<UD>
where
    UD: UserDirectory,
{
    /// Create a new login service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - User directory implementation
    /// * `authenticator` - Password verification and user token issuance
    /// * `service_tokens` - Token presented to the directory
    /// * `user_token_lifetime` - Validity of issued user tokens
    pub fn new(
        directory: Arc<UD>,
        authenticator: Arc<Authenticator>,
        service_tokens: Arc<ServiceTokenCache>,
        user_token_lifetime: Duration,
    ) -> Self {
        Self {
            directory,
            authenticator,
            service_tokens,
            user_token_lifetime,
        }
    }
}

#[async_trait]
impl<UD> LoginServicePort for LoginService<UD>
where
    UD: UserDirectory,
{
    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, LoginError> {
        let service_token = self.service_tokens.ensure_token()?;

        let user = self
            .directory
            .find_by_email(&credentials.email, &service_token)
            .await?
            .ok_or(LoginError::CredentialNotFound)?;

        let roles = user.roles();

        let authenticator = Arc::clone(&self.authenticator);
        let lifetime = self.user_token_lifetime;
        let password = credentials.password;
        let password_hash = user.password_hash.clone();
        let subject = user.id.clone();
        let token_roles = roles.clone();

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &password_hash, &subject, &token_roles, lifetime)
        })
        .await
        .map_err(|e| LoginError::Unknown(format!("Password verification task failed: {}", e)))??;

        Ok(LoginOutcome {
            user_id: user.id,
            roles,
            slug: user.slug,
            display_name: user.display_name,
            token: result.access_token,
        })
    }

    fn is_healthy(&self) -> bool {
        self.service_tokens.is_healthy()
    }
}

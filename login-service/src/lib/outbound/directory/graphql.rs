use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::login::errors::DirectoryError;
use crate::domain::login::models::DirectoryUser;
use crate::domain::login::models::EmailAddress;
use crate::domain::login::ports::UserDirectory;

const FIND_BY_EMAIL: &str = r#"
    query ($email: String!) {
        user(where: {email: {_eq: $email}}) {
            id
            password
            admin
            slug
            display
        }
    }
"#;

/// User directory backed by a GraphQL endpoint.
///
/// The service token is sent both as the session cookie the directory
/// expects and as a bearer token.
pub struct GraphQlUserDirectory {
    client: Client,
    endpoint: String,
    cookie_name: String,
}

impl GraphQlUserDirectory {
    /// Create a directory client.
    ///
    /// # Arguments
    /// * `endpoint` - GraphQL HTTP endpoint
    /// * `cookie_name` - Cookie carrying the service token
    /// * `timeout` - Deadline for each lookup
    ///
    /// # Errors
    /// * `Transport` - HTTP client could not be built
    pub fn new(
        endpoint: impl Into<String>,
        cookie_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            cookie_name: cookie_name.into(),
        })
    }
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: FindByEmailVariables<'a>,
}

#[derive(Debug, Serialize)]
struct FindByEmailVariables<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<FindByEmailData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct FindByEmailData {
    user: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: String,
    password: String,
    #[serde(default)]
    admin: bool,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    display: String,
}

impl From<UserRecord> for DirectoryUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            password_hash: record.password,
            is_admin: record.admin,
            slug: record.slug,
            display_name: record.display,
        }
    }
}

#[async_trait]
impl UserDirectory for GraphQlUserDirectory {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
        service_token: &str,
    ) -> Result<Option<DirectoryUser>, DirectoryError> {
        let request = GraphQlRequest {
            query: FIND_BY_EMAIL,
            variables: FindByEmailVariables {
                email: email.as_str(),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                header::COOKIE,
                format!("{}={}", self.cookie_name, service_token),
            )
            .bearer_auth(service_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(DirectoryError::Query(messages.join("; ")));
        }

        let mut users = body
            .data
            .ok_or_else(|| DirectoryError::InvalidResponse("missing data".to_string()))?
            .user;

        match users.len() {
            0 => Ok(None),
            1 => Ok(users.pop().map(DirectoryUser::from)),
            n => Err(DirectoryError::AmbiguousMatch(n)),
        }
    }
}

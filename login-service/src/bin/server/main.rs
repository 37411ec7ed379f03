use std::sync::Arc;

use auth_core::Authenticator;
use auth_core::ServiceTokenCache;
use auth_core::TokenIssuer;
use login_service::config::Config;
use login_service::domain::login::service::LoginService;
use login_service::inbound::http::router::create_router;
use login_service::outbound::directory::GraphQlUserDirectory;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "login_service=debug,auth_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "login-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    anyhow::ensure!(!config.jwt.secret.is_empty(), "jwt.secret must be set");

    tracing::info!(
        http_port = config.server.http_port,
        issuer = %config.jwt.issuer,
        user_token_lifetime_secs = config.jwt.user_token_lifetime_secs,
        service_token_lifetime_secs = config.service_token.lifetime_secs,
        service_token_refresh_margin_secs = config.service_token.refresh_margin_secs,
        directory_endpoint = %config.directory.endpoint,
        memory_available_kib = ?config.memory.available_kib,
        "Configuration loaded"
    );

    let issuer = Arc::new(TokenIssuer::new(
        config.jwt.secret.as_bytes(),
        config.jwt.issuer.clone(),
    ));
    let authenticator = Arc::new(Authenticator::new(
        Arc::clone(&issuer),
        config.memory.budget(),
    ));
    let service_tokens = Arc::new(ServiceTokenCache::new(
        Arc::clone(&issuer),
        config.service_token.lifetime(),
        config.service_token.refresh_margin(),
    )?);

    // Refuse to start if the service cannot authenticate itself.
    service_tokens.ensure_token()?;

    let directory = Arc::new(GraphQlUserDirectory::new(
        config.directory.endpoint.clone(),
        config.cookie.name.clone(),
        config.directory.timeout(),
    )?);

    let login_service = Arc::new(LoginService::new(
        directory,
        authenticator,
        service_tokens,
        config.jwt.user_token_lifetime(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(login_service, config.cookie);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}

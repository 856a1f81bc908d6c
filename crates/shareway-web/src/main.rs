//! shareway-web - server-side front end for the shareway backend
//!
//! This is the main entry point for the web server.
//!
//! # Dev Mode
//!
//! Build with `--features dev-mode` to use an in-memory identity provider
//! instead of Auth0. Any email/password pair can sign up; the session token
//! has the form `test-token:<email>`.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "dev-mode")]
use shareway_auth::MockIdentityProvider;
#[cfg(not(feature = "dev-mode"))]
use shareway_auth::Auth0Client;
use shareway_backend::HttpBackendClient;
use shareway_web::{create_router, AppState, WebConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may already be set
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shareway=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting shareway web server");
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = WebConfig::from_env();
    tracing::info!(
        listen_addr = %config.listen_addr,
        api_base_url = %config.api_base_url,
        public_origin = %config.public_origin,
        cookie_secure = config.cookie_secure,
        "Web configuration loaded"
    );

    let backend = Arc::new(HttpBackendClient::new(config.api_base_url.clone()));

    #[cfg(feature = "dev-mode")]
    let identity = {
        tracing::warn!("DEV MODE ENABLED - using in-memory identity provider");
        Arc::new(MockIdentityProvider::new())
    };

    #[cfg(not(feature = "dev-mode"))]
    let identity = {
        let auth_config = shareway_web::auth_config_from_lookup(|key| std::env::var(key).ok())
            .ok_or("AUTH0_DOMAIN must be set")?;
        tracing::info!(base_url = %auth_config.base_url, "Identity provider configured");
        Arc::new(Auth0Client::new(auth_config))
    };

    let listen_addr = config.listen_addr.clone();
    let app = create_router(AppState::new(backend, identity, config));

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

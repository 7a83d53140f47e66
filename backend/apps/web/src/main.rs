//! Web Server Entry Point
//!
//! Loads settings, picks the service backend, starts the session provider
//! and serves the routing shell. Uses `anyhow` for startup errors; request
//! errors are rendered through `kernel::error::AppError` by the chirpr crate.

mod settings;

use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use chirpr::application::config::ChirprConfig;
use chirpr::domain::service::{DocumentStore, IdentityService};
use chirpr::infra::{
    FirebaseConfig, FirebaseIdentityService, FirebaseSession, FirestoreDocumentStore,
    InMemoryDocumentStore, InMemoryIdentityService,
};
use chirpr::{SessionProvider, shell_router};
use platform::config::ConfigSource;
use platform::http::{HttpClientOptions, build_client};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::{Backend, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web=info,chirpr=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load(&ConfigSource::from_env())?;

    let mut config = ChirprConfig::default();
    if let Some(url) = settings.default_avatar_url.clone() {
        config = config.with_default_avatar_url(url);
    }
    let config = Arc::new(config);

    match settings.backend.clone() {
        Backend::Memory => {
            tracing::warn!("Using in-memory services; accounts and records are lost on exit");
            serve(
                &settings,
                Arc::new(InMemoryIdentityService::new()),
                Arc::new(InMemoryDocumentStore::new()),
                config,
            )
            .await
        }
        Backend::Firebase {
            api_key,
            project_id,
        } => {
            let client = build_client(&HttpClientOptions {
                timeout: settings.http_timeout,
                ..HttpClientOptions::default()
            })?;
            tracing::info!(project_id = %project_id, "Using Firebase services");

            let firebase = Arc::new(FirebaseConfig::new(api_key, project_id));
            let session = FirebaseSession::new();
            let identity =
                FirebaseIdentityService::new(client.clone(), Arc::clone(&firebase), session.clone());
            let store = FirestoreDocumentStore::new(client, firebase, session);

            serve(&settings, Arc::new(identity), Arc::new(store), config).await
        }
    }
}

async fn serve<I, S>(
    settings: &Settings,
    identity: Arc<I>,
    store: Arc<S>,
    config: Arc<ChirprConfig>,
) -> anyhow::Result<()>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    let provider = Arc::new(SessionProvider::start(identity, store, config));

    let app = shell_router(Arc::clone(&provider))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.allowed_origins));

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("Listening on {}", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    provider.shutdown();
    tracing::info!("Server stopped");
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

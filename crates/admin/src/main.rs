//! OpenAlex Back-office Admin API
//!
//! The HTTP entry point for curators and sales staff.
//! Handles:
//! - Authentication and role-based authorization
//! - Reference-data curation (concepts, publishers, journals)
//! - API key and rate-limit exemption management
//! - Observability (logging, metrics)

mod handlers;
mod middleware;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use backoffice_common::{
    auth::JwtManager,
    clients::{HerokuClient, RorClient, WikidataClient, ZendeskClient},
    config::AppConfig,
    db::{DbPools, Repository},
    metrics,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repo: Repository,
    pub jwt: Arc<JwtManager>,
    pub wikidata: Arc<WikidataClient>,
    pub ror: Arc<RorClient>,
    pub zendesk: Arc<ZendeskClient>,
    pub heroku: Arc<HerokuClient>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .json()
        .init();

    info!("Starting OpenAlex back-office admin API v{}", backoffice_common::VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let config = Arc::new(config);

    // Initialize metrics
    metrics::register_metrics();
    if config.observability.metrics_port > 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
        info!("Metrics exporter listening on {}", metrics_addr);
    }

    // Initialize database connections
    info!("Connecting to databases...");
    let pools = DbPools::new(&config.databases).await?;

    // External service clients
    let wikidata = Arc::new(WikidataClient::new(config.wikidata.api_base.clone()));
    let ror = Arc::new(RorClient::new(config.ror.api_base.clone()));
    let zendesk = Arc::new(ZendeskClient::new(
        config.zendesk.api_base.clone(),
        config.zendesk.user_account.clone(),
        config.zendesk.api_token.clone(),
    ));
    let heroku = Arc::new(HerokuClient::new(
        config.heroku.api_base.clone(),
        config.heroku.api_key.clone(),
    ));

    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_secs,
    ));

    // Create app state
    let state = AppState {
        config: config.clone(),
        repo: Repository::new(pools),
        jwt,
        wikidata,
        ror,
        zendesk,
        heroku,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration for the back-office frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Authenticated admin routes
    let admin_routes = Router::new()
        // Concepts: read-mostly, no delete exists
        .route("/concepts", get(handlers::concepts::list_concepts))
        .route("/concepts/{id}", get(handlers::concepts::get_concept))
        .route("/concepts/{id}", put(handlers::concepts::update_concept))

        // Publishers: every save re-enriches from external sources
        .route("/publishers", get(handlers::publishers::list_publishers))
        .route("/publishers", post(handlers::publishers::create_publisher))
        .route("/publishers/{id}", get(handlers::publishers::get_publisher))
        .route("/publishers/{id}", put(handlers::publishers::update_publisher))

        // Journals: every save normalizes pricing
        .route("/journals", get(handlers::journals::list_journals))
        .route("/journals", post(handlers::journals::create_journal))
        .route("/journals/{id}", get(handlers::journals::get_journal))
        .route("/journals/{id}", put(handlers::journals::update_journal))

        // API keys: every save syncs to the support desk
        .route("/api-keys", get(handlers::api_keys::list_api_keys))
        .route("/api-keys", post(handlers::api_keys::create_api_key))
        .route("/api-keys/{id}", get(handlers::api_keys::get_api_key))
        .route("/api-keys/{id}", put(handlers::api_keys::update_api_key))

        // Rate-limit exemptions: every save pushes the allow-list
        .route("/ratelimit-exempts", get(handlers::ratelimit::list_exempts))
        .route("/ratelimit-exempts", post(handlers::ratelimit::create_exempt))
        .route("/ratelimit-exempts/{id}", get(handlers::ratelimit::get_exempt))
        .route("/ratelimit-exempts/{id}", put(handlers::ratelimit::update_exempt))

        .route_layer(from_fn_with_state(state.clone(), middleware::auth::auth_middleware));

    // Compose the app
    Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}

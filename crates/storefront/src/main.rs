//! Amara Threads Storefront - Custom apparel e-commerce API.
//!
//! This binary serves the storefront JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework serving the `/api` surface
//! - Content store (GROQ over HTTP) for products, promotions, and newsletters
//! - Session-backed cart (tower-sessions)
//! - EmailJS for order notifications and campaign sends
//! - Resend for batched newsletter delivery
//! - Redis for the mailing-list subscriber store
//!
//! Every collaborator credential is optional at boot. Endpoints whose
//! backing service is absent answer with a descriptive 500 instead of
//! taking the whole server down.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use amara_storefront::config::StorefrontConfig;
use amara_storefront::{middleware, routes, state::AppState};

/// Start Sentry when a DSN is configured. The returned guard flushes
/// pending events on drop and has to outlive the server.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Install the tracing subscriber, bridged into Sentry: warnings and
/// errors become events, routine logs become breadcrumbs.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "amara_storefront=info,tower_http=debug".into());

    let sentry_layer = sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Sentry first so the tracing bridge has a client to report into
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    // Connects to Redis when a mailing-list store is configured
    let state = AppState::new(config)
        .await
        .expect("Failed to initialize application state");

    let session_layer = middleware::create_session_layer(state.config());
    let addr = state.config().socket_addr();

    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers sit outermost so every request is covered
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness probe. Answers as long as the process is up; checks nothing.
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe. Pings the content store and reports 503 until it
/// answers, so a deploy is not put in rotation before its catalog loads.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.content().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Resolves on Ctrl+C or SIGTERM so in-flight requests drain before exit.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = sigterm => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

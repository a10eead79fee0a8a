//! Brandgate server binary.
//!
//! # Storage
//!
//! - `BRANDGATE_STORAGE=postgres` (default): config, queue, admins and
//!   sessions live in the `brandgate` schema. Migrations are NOT run on
//!   start-up; run `bg-cli migrate` first.
//! - `BRANDGATE_STORAGE=memory`: everything lives in process memory and is
//!   lost on restart. Useful for local development and demos.
//!
//! # Optional integrations
//!
//! - `CLAUDE_API_KEY` enables AI logo feedback.
//! - `SENTRY_DSN` enables error tracking.

#![cfg_attr(not(test), forbid(unsafe_code))]

use brandgate_server::app;
use brandgate_server::claude::ClaudeClient;
use brandgate_server::config::{AppConfig, StorageConfig};
use brandgate_server::db::{self, Stores};
use brandgate_server::middleware::{create_memory_session_layer, create_session_layer};
use brandgate_server::services::AuthService;
use brandgate_server::state::AppState;
use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            // Visitors are anonymous; only admin ids and emails are attached.
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "brandgate_server=info,tower_http=debug".into());

    // Use JSON format on Fly.io for structured log parsing, text format locally
    let is_fly = std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = is_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_fly).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let claude = match &config.claude {
        Some(claude_config) => match ClaudeClient::new(claude_config) {
            Ok(client) => {
                tracing::info!(model = %claude_config.model, "Logo feedback enabled");
                Some(client)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to build Claude client, logo feedback disabled");
                None
            }
        },
        None => {
            tracing::info!("CLAUDE_API_KEY not set, logo feedback disabled");
            None
        }
    };

    let addr = config.socket_addr();

    let app = match config.storage.clone() {
        StorageConfig::Postgres { database_url } => {
            let pool = db::create_pool(&database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            // NOTE: Migrations are NOT run automatically on startup.
            // Run them explicitly via: cargo run -p brandgate-cli -- migrate
            let session_layer = create_session_layer(&pool, &config);
            let state = AppState::new(config, Stores::postgres(pool.clone()), Some(pool), claude);
            bootstrap_admin(&state).await;
            app::router(state, session_layer)
        }
        StorageConfig::Memory => {
            tracing::warn!("Running with in-memory storage; data is lost on restart");
            let session_layer = create_memory_session_layer(&config);
            let state = AppState::new(config, Stores::in_memory(), None, claude);
            bootstrap_admin(&state).await;
            app::router(state, session_layer)
        }
    };

    tracing::info!("brandgate listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Create the configured bootstrap admin if it does not exist yet.
async fn bootstrap_admin(state: &AppState) {
    let Some(admin) = &state.config().bootstrap_admin else {
        return;
    };

    let auth = AuthService::new(state.stores().admins.as_ref());
    match auth
        .ensure_admin(&admin.email, &admin.name, admin.password.expose_secret())
        .await
    {
        Ok(true) => tracing::info!(email = %admin.email, "Bootstrap admin created"),
        Ok(false) => tracing::debug!(email = %admin.email, "Bootstrap admin already exists"),
        Err(e) => tracing::error!(error = %e, "Failed to create bootstrap admin"),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (verification key, PgPool, schema) → Router 組み立て
 * - 起動時の失敗はすべて anyhow で返してプロセスを止める (リクエストは受けない)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, DatabaseConfig};
use crate::repos::{MarkerRepo, PgMarkerRepo};
use crate::services::auth::build_auth_service;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,trip_markers=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost".
        tracing::error!(?info, "panic");

        // In development, fail fast. In production, keep the default behavior.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {} (marker selector: {:?})",
        config.app_env,
        config.addr,
        config.selector_mode
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn connect_database(db: &DatabaseConfig) -> Result<sqlx::PgPool> {
    // Never log the password.
    tracing::info!(
        host = %db.host,
        port = db.port,
        database = %db.database,
        "trying to connect to database"
    );

    let options = PgConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .username(&db.username)
        .password(&db.password)
        .database(&db.database)
        .ssl_mode(db.ssl_mode);

    let pool = PgPoolOptions::new()
        .connect_with(options)
        .await
        .context("failed to initialize database pool")?;

    Ok(pool)
}

async fn build_state(config: &Config) -> Result<AppState> {
    // Build process-level services here and inject them into the shared application state.
    let auth = build_auth_service(config).await?;

    let pool = connect_database(&config.database).await?;
    let markers = PgMarkerRepo::new(pool);
    markers.ping().await.context("failed to ping database")?;
    tracing::info!("database connected");

    markers
        .ensure_schema()
        .await
        .context("could not create markers table")?;

    Ok(AppState::new(Arc::new(markers), auth, config.selector_mode))
}

fn build_router(state: AppState) -> Router {
    let router = api::routes(state.clone()).with_state(state);
    middleware::http::apply(router)
}

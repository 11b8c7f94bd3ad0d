//! VideoHub server binary: Postgres storage, S3 media, JWT auth, Axum HTTP.

use std::sync::Arc;

use anyhow::Context;
use aws_config::BehaviorVersion;
use chrono::Duration;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use api_adapters::web::{router, AppState};
use auth_adapters::{jwt::JwtTokenIssuer, password::ArgonCredentialHasher};
use configs::AppConfig;
use domains::ports::{
    CommentRepo, CredentialHasher, MediaDelegate, ReactionRepo, TokenIssuer, UserRepo, VideoRepo,
};
use services::{AccessService, AuthService, CommentService, ReactionService, VideoService};
use storage_adapters::{postgres::PgStore, s3::S3MediaDelegate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("failed to connect to postgres")?;
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let aws = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let media: Arc<dyn MediaDelegate> = Arc::new(S3MediaDelegate::new(
        aws_sdk_s3::Client::new(&aws),
        config.media.bucket.clone(),
        config.media.public_base_url.clone(),
    ));

    let store = Arc::new(PgStore::new(pool.clone()));
    let users: Arc<dyn UserRepo> = store.clone();
    let videos: Arc<dyn VideoRepo> = store.clone();
    let comments: Arc<dyn CommentRepo> = store.clone();
    let reactions: Arc<dyn ReactionRepo> = store;

    let hasher: Arc<dyn CredentialHasher> = Arc::new(ArgonCredentialHasher::new());
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(
        config.auth.jwt_secret.expose_secret().as_bytes(),
        Duration::hours(config.auth.token_ttl_hours),
    ));

    let state = AppState {
        access: Arc::new(AccessService::new(users.clone(), tokens.clone())),
        auth: Arc::new(AuthService::new(users, hasher, tokens)),
        videos: Arc::new(VideoService::new(
            videos.clone(),
            comments.clone(),
            reactions.clone(),
            media,
        )),
        comments: Arc::new(CommentService::new(comments, videos.clone())),
        reactions: Arc::new(ReactionService::new(reactions, videos)),
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, environment = %config.environment, "videohub listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}

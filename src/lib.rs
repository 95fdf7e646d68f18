pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod response;
pub mod services;
pub mod store;

use anyhow::Context;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::task;
use tower_http::trace::TraceLayer;
use tracing::info;

use config::{BookingConfig, Config, JwtConfig};
use services::{BookingService, FilmService};
use store::FilmStore;

// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub films: FilmService,
    pub bookings: BookingService,
    pub jwt: JwtConfig,
}

impl AppState {
    /// Builds the state over an already constructed store.
    pub fn with_store(store: Arc<dyn FilmStore>, jwt: JwtConfig, booking: &BookingConfig) -> Arc<Self> {
        Arc::new(Self {
            films: FilmService::new(store.clone()),
            bookings: BookingService::new(store, booking.max_retries),
            jwt,
        })
    }

    /// Connects to Postgres (and Redis when configured) and runs migrations.
    pub async fn new(config: &Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::connect(&config.database)
            .await
            .context("Failed to connect to database")?;

        db.run_migrations()
            .await
            .context("Failed to run migrations")?;

        let postgres: Arc<dyn FilmStore> = Arc::new(db.film_store());

        let store: Arc<dyn FilmStore> = match &config.redis {
            Some(redis_config) => {
                let redis = redis_client::RedisClient::connect(redis_config)
                    .await
                    .context("Failed to connect to Redis")?;

                let cache = cache::CacheService::new(redis, postgres, redis_config.catalog_ttl_seconds);
                let cache_for_bg = cache.clone();
                task::spawn(async move {
                    cache_for_bg.warmup_cache().await;
                });
                Arc::new(cache)
            }
            None => {
                info!("REDIS_URL not set, catalog cache disabled");
                postgres
            }
        };

        Ok(Self::with_store(store, config.jwt.clone(), &config.booking))
    }
}

/// Full HTTP application: health routes plus the API under `/api`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Film Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the AQI tracker application.
//!
//! Serves the enriched customer AQI dataset to the map frontend. The
//! heavy lifting — CSV snapshot caching, batched geocoding, cache
//! refresh semantics — lives in [`aqi_tracker_dataset`] and
//! [`aqi_tracker_geocoder`]; this crate wires those together from
//! environment configuration and exposes them over HTTP behind a
//! bearer-token login.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use aqi_tracker_dataset::pipeline::DEFAULT_BATCH_SIZE;
use aqi_tracker_dataset::{EnrichmentPipeline, RemoteCsvSource, SnapshotCache};
use aqi_tracker_geocoder::pacing::FixedDelay;
use aqi_tracker_geocoder::{GeocodeCache, GeocodeResolver, NominatimGeocoder, service};

/// Default snapshot freshness window in seconds.
const DEFAULT_SNAPSHOT_TTL_SECS: u64 = 300;

/// Credentials and signing secret for the single operator account.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub secret: String,
    /// Accepted username.
    pub username: String,
    /// Accepted password.
    pub password: String,
}

/// Shared application state.
pub struct AppState {
    /// The enrichment pipeline behind `/getAqiData`.
    pub pipeline: Arc<EnrichmentPipeline>,
    /// CSV snapshot cache, exposed for `/clearCache`.
    pub snapshots: Arc<SnapshotCache>,
    /// Geocode result cache, exposed for `/clearCache`.
    pub geocode_cache: Arc<GeocodeCache>,
    /// Login configuration.
    pub auth: AuthConfig,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Starts the AQI tracker API server.
///
/// Reads configuration from the environment, builds the caches and
/// enrichment pipeline, and starts the Actix-Web HTTP server. This is
/// a regular async function — the caller provides the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if `CSV_URL` is not set.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let csv_url = std::env::var("CSV_URL").expect("CSV_URL environment variable is required");
    let ttl = Duration::from_secs(env_or("SNAPSHOT_TTL_SECS", DEFAULT_SNAPSHOT_TTL_SECS));
    let batch_size: usize = env_or("GEOCODE_BATCH_SIZE", DEFAULT_BATCH_SIZE);

    let auth = AuthConfig {
        secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set; using development default");
            "dev-secret-change-me".to_string()
        }),
        username: std::env::var("AUTH_USERNAME").unwrap_or_else(|_| "admin".to_string()),
        password: std::env::var("AUTH_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
    };

    let client = reqwest::Client::new();

    log::info!("Loading geocoding service configuration...");
    let geocode_service = service::nominatim_service();
    let geocode_cache = Arc::new(GeocodeCache::new());
    let resolver = Arc::new(GeocodeResolver::new(
        Arc::new(NominatimGeocoder::new(client.clone(), &geocode_service)),
        geocode_cache.clone(),
        Arc::new(FixedDelay::new(geocode_service.pacing_delay())),
        geocode_service.fallback_point(),
    ));

    let snapshots = Arc::new(SnapshotCache::new(ttl));
    let pipeline = Arc::new(EnrichmentPipeline::new(
        Arc::new(RemoteCsvSource::new(client, csv_url)),
        snapshots.clone(),
        resolver,
        batch_size,
    ));

    let state = web::Data::new(AppState {
        pipeline,
        snapshots,
        geocode_cache,
        auth,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env_or("PORT", 8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .route("/login", web::post().to(handlers::login))
            .route("/getAqiData", web::get().to(handlers::get_aqi_data))
            .route("/clearCache", web::post().to(handlers::clear_cache))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

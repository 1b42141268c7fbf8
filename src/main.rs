mod auth;
mod config;
mod core;
mod models;
mod routes;
mod services;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use tracing::{error, info};

use crate::auth::Authenticator;
use crate::config::Settings;
use crate::core::RecommendationEngine;
use crate::models::ScoringWeights;
use crate::routes::AppState;
use crate::services::{CacheManager, OpenAiClient, PostgresClient, WeatherClient};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap_or_default())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting GolfMatch API...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize external service clients
    let weather = Arc::new(WeatherClient::new(
        settings.weather.base_url.clone(),
        settings.weather.api_key.clone(),
        settings.weather.forecast_days,
    ));

    let openai = Arc::new(OpenAiClient::new(
        settings.openai.base_url.clone(),
        settings.openai.api_key.clone(),
        settings.openai.model.clone(),
    ));

    info!("Weather and completion clients initialized");

    // Initialize cache manager
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
        Ok(c) => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            Arc::new(c)
        }
        Err(e) => {
            error!("Failed to connect to Redis ({})", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "Redis connection required",
            ));
        }
    };

    // Initialize PostgreSQL client
    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let postgres = Arc::new(
        PostgresClient::new(&settings.database.url, db_max_conn, db_min_conn)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                panic!("PostgreSQL connection error: {}", e);
            }),
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    // Initialize the recommendation engine with configured weights
    let weights = ScoringWeights {
        style: settings.scoring.weights.style,
        difficulty: settings.scoring.weights.difficulty,
        social: settings.scoring.weights.social,
        conditions: settings.scoring.weights.conditions,
    };

    let engine = Arc::new(RecommendationEngine::new(
        Arc::clone(&weather),
        Arc::clone(&openai),
        weights,
    ));

    info!("Recommendation engine initialized with weights: {:?}", weights);

    let authenticator = Arc::new(Authenticator::new(&settings.auth));

    // Build application state
    let app_state = AppState {
        postgres,
        cache,
        weather,
        openai,
        engine,
        auth: authenticator,
        recommendation: settings.recommendation.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

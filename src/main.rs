mod auth;
mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

use crate::auth::AuthManager;
use crate::config::Settings;
use crate::core::Matcher;
use crate::models::{ErrorResponse, ScoringWeights};
use crate::routes::AppState;
use crate::services::{
    AppwriteClient, AppwriteCollections, CacheManager, GeminiClient, PostgresClient,
};

/// Malformed payloads rendered in the standard error envelope
#[derive(Debug)]
pub struct PayloadRejection {
    message: String,
}

impl std::fmt::Display for PayloadRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PayloadRejection {}

impl error::ResponseError for PayloadRejection {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ErrorResponse::new(self.message.clone()))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    PayloadRejection {
        message: format!("Invalid JSON payload: {}", err),
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    PayloadRejection {
        message: format!("Invalid query string: {}", err),
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

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Career Coach API...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    if settings.auth.jwt_secret == "change-me-in-production" {
        tracing::warn!("JWT secret is the development default, set JWT_SECRET before deploying");
    }

    // Initialize Appwrite client
    let appwrite_collections = AppwriteCollections {
        users: settings.collection.users,
        jobs: settings.collection.jobs,
    };

    let appwrite = Arc::new(AppwriteClient::new(
        settings.appwrite.endpoint,
        settings.appwrite.api_key,
        settings.appwrite.project_id,
        settings.appwrite.database_id,
        appwrite_collections,
    ));

    info!("Appwrite client initialized");

    // Initialize cache manager
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_ttl = settings.cache.l1_ttl_secs.unwrap_or(60);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match CacheManager::new(
        &settings.cache.redis_url,
        l1_cache_size,
        l1_ttl,
        cache_ttl,
    )
    .await
    {
        Ok(c) => {
            info!(
                "Cache manager initialized (L1: {} entries / {}s, Redis TTL: {}s)",
                l1_cache_size, l1_ttl, cache_ttl
            );
            Arc::new(c)
        }
        Err(e) => {
            error!("Failed to connect to Redis ({}), cannot start without cache", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "Redis connection required",
            ));
        }
    };

    // Initialize PostgreSQL client and run migrations
    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            Some(db_min_conn),
        )
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            panic!("PostgreSQL connection error: {}", e);
        }),
    );

    info!(
        "PostgreSQL client initialized (max: {} connections)",
        db_max_conn
    );

    // Initialize Gemini client
    let gemini = Arc::new(GeminiClient::new(
        settings.gemini.api_key,
        settings.gemini.endpoint,
        settings.gemini.models,
    ));

    if gemini.is_configured() {
        info!("Gemini client initialized");
    } else {
        tracing::warn!(
            "GEMINI_API_KEY not set, career advice is unavailable and resume parsing falls back to basic extraction"
        );
    }

    // Initialize auth manager
    let auth = Arc::new(AuthManager::new(
        &settings.auth.jwt_secret,
        settings.auth.token_ttl_hours,
        settings.auth.bcrypt_cost,
    ));

    // Initialize matcher with configured weights
    let weights = ScoringWeights {
        skills: settings.scoring.weights.skills,
        experience: settings.scoring.weights.experience,
        projects: settings.scoring.weights.projects,
        education: settings.scoring.weights.education,
        goals: settings.scoring.weights.goals,
    };

    let matcher = Matcher::new(weights);

    info!("Matcher initialized with weights: {:?}", weights);

    // Build application state
    let app_state = AppState {
        appwrite,
        cache,
        postgres,
        gemini,
        auth: auth.clone(),
        matcher,
        recommendation_limit: settings.matching.recommendation_limit.unwrap_or(20),
        max_page_size: settings.matching.max_page_size.unwrap_or(50),
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
            .app_data(web::Data::from(auth.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
            .default_service(web::route().to(routes::not_found))
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

// Route configuration and shared application state

pub mod advice;
pub mod auth;
pub mod career;
pub mod user;

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;

use crate::auth::AuthManager;
use crate::core::Matcher;
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{AppwriteClient, CacheManager, GeminiClient, PostgresClient};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub gemini: Arc<GeminiClient>,
    pub auth: Arc<AuthManager>,
    pub matcher: Matcher,
    pub recommendation_limit: usize,
    pub max_page_size: usize,
}

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .configure(auth::configure)
            .configure(career::configure)
            .configure(user::configure)
            .configure(advice::configure),
    );
}

/// Health check endpoint with a database ping
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database_up = state.postgres.health_check().await.unwrap_or(false);

    HttpResponse::Ok().json(HealthResponse {
        success: true,
        status: if database_up { "OK" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        database: if database_up {
            "connected"
        } else {
            "disconnected"
        }
        .to_string(),
    })
}

/// Catch-all for unmatched paths
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "Route not found. Please check the API endpoint.",
    ))
}

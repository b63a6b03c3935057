//! Career Coach API - backend for the Career Coach AI web application
//!
//! This library provides profile management, ranked job recommendations,
//! PDF resume parsing with an AI extraction pipeline, and generated
//! career advice behind an HTTP API.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_match_score, Matcher};
pub use crate::models::{
    CareerAdvice, ExperienceTier, ExtractedResume, JobPosting, MatchedJob, ScoringWeights, User,
};

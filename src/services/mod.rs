// Service exports
pub mod appwrite;
pub mod cache;
pub mod gemini;
pub mod postgres;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use gemini::{AttemptChain, GeminiClient, GeminiError, ModelAttempt};
pub use postgres::{InteractionStats, InteractionType, PostgresClient, PostgresError};

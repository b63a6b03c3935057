use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Kinds of job interaction a user can record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interaction_type", rename_all = "lowercase")]
pub enum InteractionType {
    Saved,
    Applied,
}

/// PostgreSQL client for job interaction tracking
///
/// Saved and applied jobs live here rather than as arrays on the user
/// document: rows are idempotent on their composite key, survive profile
/// rewrites and aggregate cheaply for the activity view.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Record a saved or applied job
    ///
    /// Idempotent: repeating an interaction is a no-op rather than an error,
    /// matching "save" buttons that can be pressed twice.
    pub async fn record_interaction(
        &self,
        user_id: &str,
        job_id: &str,
        interaction: InteractionType,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO job_interactions (user_id, job_id, interaction_type, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, job_id, interaction_type)
            DO NOTHING
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(job_id)
            .bind(interaction)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded interaction: {} -> {} ({:?})",
            user_id,
            job_id,
            interaction
        );

        Ok(())
    }

    /// Remove an interaction, true when a row actually existed
    pub async fn remove_interaction(
        &self,
        user_id: &str,
        job_id: &str,
        interaction: InteractionType,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            DELETE FROM job_interactions
            WHERE user_id = $1 AND job_id = $2 AND interaction_type = $3
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(job_id)
            .bind(interaction)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Job IDs for one interaction kind, most recent first
    pub async fn interaction_ids(
        &self,
        user_id: &str,
        interaction: InteractionType,
    ) -> Result<Vec<String>, PostgresError> {
        let query = r#"
            SELECT job_id
            FROM job_interactions
            WHERE user_id = $1 AND interaction_type = $2
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(interaction)
            .fetch_all(&self.pool)
            .await?;

        let job_ids: Vec<String> = rows.iter().map(|row| row.get("job_id")).collect();

        tracing::debug!(
            "User {} has {} {:?} interactions",
            user_id,
            job_ids.len(),
            interaction
        );

        Ok(job_ids)
    }

    /// Per-user activity counters
    pub async fn interaction_stats(&self, user_id: &str) -> Result<InteractionStats, PostgresError> {
        let query = r#"
            SELECT
                COUNT(*) FILTER (WHERE interaction_type = 'saved') as saved,
                COUNT(*) FILTER (WHERE interaction_type = 'applied') as applied,
                MAX(created_at) as last_activity
            FROM job_interactions
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query).bind(user_id).fetch_one(&self.pool).await?;

        Ok(InteractionStats {
            user_id: user_id.to_string(),
            saved: row.get("saved"),
            applied: row.get("applied"),
            last_activity: row.get("last_activity"),
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// A user's job interaction counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionStats {
    pub user_id: String,
    pub saved: i64,
    pub applied: i64,
    pub last_activity: Option<chrono::DateTime<chrono::Utc>>,
}

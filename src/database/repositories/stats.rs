//! Endpoint hit repository for the stats server

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::stats::{EndpointHit, ViewStats};
use crate::utils::errors::ExploreError;

#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a hit
    pub async fn save(
        &self,
        app: &str,
        uri: &str,
        ip: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<EndpointHit, ExploreError> {
        let hit = sqlx::query_as::<_, EndpointHit>(
            r#"
            INSERT INTO endpoint_hits (app, uri, ip, timestamp)
            VALUES ($1, $2, $3, $4)
            RETURNING id, app, uri, ip, timestamp
            "#,
        )
        .bind(app)
        .bind(uri)
        .bind(ip)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(hit)
    }

    /// Hits per (app, uri) in the range, descending by count.
    /// An empty uri list means no uri restriction.
    pub async fn find_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        uris: &[String],
        unique: bool,
    ) -> Result<Vec<ViewStats>, ExploreError> {
        let count_expr = if unique { "COUNT(DISTINCT ip)" } else { "COUNT(*)" };

        let stats = sqlx::query_as::<_, ViewStats>(&format!(
            r#"
            SELECT app, uri, {count_expr} AS hits
            FROM endpoint_hits
            WHERE timestamp >= $1 AND timestamp <= $2
              AND (CARDINALITY($3::TEXT[]) = 0 OR uri = ANY($3))
            GROUP BY app, uri
            ORDER BY hits DESC
            "#
        ))
        .bind(start)
        .bind(end)
        .bind(uris)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}

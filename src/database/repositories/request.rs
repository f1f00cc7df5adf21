//! Participation request repository implementation
//!
//! Capacity-sensitive operations run against a caller-held transaction so the
//! service layer can keep the event row locked across check and write.

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::request::{ParticipationRequest, RequestStatus};
use crate::utils::errors::ExploreError;

const REQUEST_COLUMNS: &str = "id, created, event_id, requester_id, status";

#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, ExploreError> {
        Ok(self.pool.begin().await?)
    }

    /// Insert a request within the caller's transaction
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
        requester_id: i64,
        status: RequestStatus,
    ) -> Result<ParticipationRequest, ExploreError> {
        let request = sqlx::query_as::<_, ParticipationRequest>(&format!(
            r#"
            INSERT INTO participation_requests (created, event_id, requester_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(Utc::now())
        .bind(event_id)
        .bind(requester_id)
        .bind(status.as_str())
        .fetch_one(&mut **tx)
        .await?;

        Ok(request)
    }

    /// Find request by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ParticipationRequest>, ExploreError> {
        let request = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// All requests made by a user, oldest first
    pub async fn find_by_requester(
        &self,
        requester_id: i64,
    ) -> Result<Vec<ParticipationRequest>, ExploreError> {
        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests \
             WHERE requester_id = $1 ORDER BY created ASC"
        ))
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// All requests targeting an event, oldest first
    pub async fn find_by_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<ParticipationRequest>, ExploreError> {
        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests \
             WHERE event_id = $1 ORDER BY created ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Fetch the given requests within the caller's transaction, oldest first
    pub async fn find_by_ids(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ids: &[i64],
    ) -> Result<Vec<ParticipationRequest>, ExploreError> {
        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM participation_requests \
             WHERE id = ANY($1) ORDER BY created ASC"
        ))
        .bind(ids)
        .fetch_all(&mut **tx)
        .await?;

        Ok(requests)
    }

    /// Check for an existing non-canceled request from this user for this event
    pub async fn exists_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
        requester_id: i64,
    ) -> Result<bool, ExploreError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM participation_requests \
             WHERE event_id = $1 AND requester_id = $2 AND status <> 'CANCELED'",
        )
        .bind(event_id)
        .bind(requester_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(count.0 > 0)
    }

    /// Confirmed request count for an event (pool-scoped read)
    pub async fn count_confirmed(&self, event_id: i64) -> Result<i64, ExploreError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM participation_requests \
             WHERE event_id = $1 AND status = 'CONFIRMED'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Confirmed request count within the caller's transaction
    pub async fn count_confirmed_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<i64, ExploreError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM participation_requests \
             WHERE event_id = $1 AND status = 'CONFIRMED'",
        )
        .bind(event_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(count.0)
    }

    /// Set the status of a single request
    pub async fn update_status(
        &self,
        id: i64,
        status: RequestStatus,
    ) -> Result<ParticipationRequest, ExploreError> {
        let request = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "UPDATE participation_requests SET status = $2 WHERE id = $1 \
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Set the status of many requests within the caller's transaction
    pub async fn update_status_bulk(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ids: &[i64],
        status: RequestStatus,
    ) -> Result<Vec<ParticipationRequest>, ExploreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let requests = sqlx::query_as::<_, ParticipationRequest>(&format!(
            "UPDATE participation_requests SET status = $2 WHERE id = ANY($1) \
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(ids)
        .bind(status.as_str())
        .fetch_all(&mut **tx)
        .await?;

        Ok(requests)
    }
}

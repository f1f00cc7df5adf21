//! Event repository implementation
//!
//! Static queries use `query_as`; the admin/public search is assembled
//! dynamically with `QueryBuilder`, one optional filter at a time.

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::models::event::{Event, EventOrder, EventSearchFilter, NewEventRequest};
use crate::utils::errors::ExploreError;

const EVENT_COLUMNS: &str = "id, annotation, description, title, event_date, created_on, \
     published_on, paid, participant_limit, request_moderation, comments_enabled, state, \
     category_id, initiator_id, location_lat, location_lon";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event in the PENDING state
    pub async fn create(
        &self,
        initiator_id: i64,
        request: &NewEventRequest,
    ) -> Result<Event, ExploreError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (annotation, description, title, event_date, created_on,
                paid, participant_limit, request_moderation, comments_enabled, state,
                category_id, initiator_id, location_lat, location_lon)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'PENDING', $10, $11, $12, $13)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&request.annotation)
        .bind(&request.description)
        .bind(&request.title)
        .bind(request.event_date)
        .bind(Utc::now())
        .bind(request.paid.unwrap_or(false))
        .bind(request.participant_limit.unwrap_or(0))
        .bind(request.request_moderation.unwrap_or(true))
        .bind(request.comments_enabled.unwrap_or(true))
        .bind(request.category)
        .bind(initiator_id)
        .bind(request.location.lat)
        .bind(request.location.lon)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, ExploreError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID, locking the row for the rest of the transaction.
    /// Serializes concurrent capacity checks on the same event.
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<Option<Event>, ExploreError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(event)
    }

    /// Find event owned by the given initiator
    pub async fn find_by_id_and_initiator(
        &self,
        id: i64,
        initiator_id: i64,
    ) -> Result<Option<Event>, ExploreError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND initiator_id = $2"
        ))
        .bind(id)
        .bind(initiator_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Events created by an initiator, newest event date first
    pub async fn find_by_initiator(
        &self,
        initiator_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, ExploreError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE initiator_id = $1 \
             ORDER BY event_date DESC LIMIT $2 OFFSET $3"
        ))
        .bind(initiator_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Fetch the given events, preserving ascending id order
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Event>, ExploreError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1) ORDER BY id ASC"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Persist a mutated event row
    pub async fn save(&self, event: &Event) -> Result<Event, ExploreError> {
        let saved = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET annotation = $2,
                description = $3,
                title = $4,
                event_date = $5,
                published_on = $6,
                paid = $7,
                participant_limit = $8,
                request_moderation = $9,
                comments_enabled = $10,
                state = $11,
                category_id = $12,
                location_lat = $13,
                location_lon = $14
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.annotation)
        .bind(&event.description)
        .bind(&event.title)
        .bind(event.event_date)
        .bind(event.published_on)
        .bind(event.paid)
        .bind(event.participant_limit)
        .bind(event.request_moderation)
        .bind(event.comments_enabled)
        .bind(&event.state)
        .bind(event.category_id)
        .bind(event.location_lat)
        .bind(event.location_lon)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// Check if any event references the category
    pub async fn exists_by_category(&self, category_id: i64) -> Result<bool, ExploreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    /// Evaluate a dynamic search filter with pagination
    pub async fn search(
        &self,
        filter: &EventSearchFilter,
        order: EventOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, ExploreError> {
        let mut query = build_search_query(filter, order, limit, offset);
        let events = query.build_query_as::<Event>().fetch_all(&self.pool).await?;

        Ok(events)
    }
}

/// Assemble the search query. An absent filter adds no constraint.
pub fn build_search_query(
    filter: &EventSearchFilter,
    order: EventOrder,
    limit: i64,
    offset: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<'static, Postgres> =
        QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events WHERE TRUE"));

    if let Some(text) = filter.text.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = format!("%{}%", text.to_lowercase());
        query.push(" AND (LOWER(annotation) LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR LOWER(description) LIKE ");
        query.push_bind(pattern);
        query.push(")");
    }

    if let Some(categories) = filter.categories.as_ref().filter(|c| !c.is_empty()) {
        query.push(" AND category_id = ANY(");
        query.push_bind(categories.clone());
        query.push(")");
    }

    if let Some(initiators) = filter.initiators.as_ref().filter(|u| !u.is_empty()) {
        query.push(" AND initiator_id = ANY(");
        query.push_bind(initiators.clone());
        query.push(")");
    }

    if let Some(states) = filter.states.as_ref().filter(|s| !s.is_empty()) {
        let states: Vec<String> = states.iter().map(|s| s.as_str().to_string()).collect();
        query.push(" AND state = ANY(");
        query.push_bind(states);
        query.push(")");
    }

    if let Some(paid) = filter.paid {
        query.push(" AND paid = ");
        query.push_bind(paid);
    }

    if let Some(range_start) = filter.range_start {
        query.push(" AND event_date >= ");
        query.push_bind(range_start);
    }

    if let Some(range_end) = filter.range_end {
        query.push(" AND event_date <= ");
        query.push_bind(range_end);
    }

    if filter.only_available {
        query.push(
            " AND (participant_limit = 0 OR participant_limit > \
             (SELECT COUNT(*) FROM participation_requests pr \
              WHERE pr.event_id = events.id AND pr.status = 'CONFIRMED'))",
        );
    }

    match order {
        EventOrder::EventDateAsc => query.push(" ORDER BY event_date ASC"),
        EventOrder::EventDateDesc => query.push(" ORDER BY event_date DESC"),
        EventOrder::IdAsc => query.push(" ORDER BY id ASC"),
    };

    query.push(" LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind(offset);

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventState;

    #[test]
    fn test_empty_filter_adds_no_constraints() {
        let query = build_search_query(&EventSearchFilter::default(), EventOrder::IdAsc, 10, 0);
        let sql = query.sql();
        assert!(sql.contains("WHERE TRUE ORDER BY id ASC"));
        assert!(!sql.contains("category_id"));
        assert!(!sql.contains("state = ANY"));
    }

    #[test]
    fn test_text_filter_matches_annotation_and_description() {
        let filter = EventSearchFilter {
            text: Some("music".to_string()),
            ..Default::default()
        };
        let query = build_search_query(&filter, EventOrder::EventDateAsc, 10, 0);
        let sql = query.sql();
        assert!(sql.contains("LOWER(annotation) LIKE"));
        assert!(sql.contains("LOWER(description) LIKE"));
    }

    #[test]
    fn test_blank_text_filter_is_ignored() {
        let filter = EventSearchFilter {
            text: Some("   ".to_string()),
            ..Default::default()
        };
        let query = build_search_query(&filter, EventOrder::EventDateAsc, 10, 0);
        assert!(!query.sql().contains("LIKE"));
    }

    #[test]
    fn test_state_and_availability_filters() {
        let filter = EventSearchFilter {
            states: Some(vec![EventState::Published]),
            only_available: true,
            ..Default::default()
        };
        let query = build_search_query(&filter, EventOrder::EventDateAsc, 10, 0);
        let sql = query.sql();
        assert!(sql.contains("state = ANY"));
        assert!(sql.contains("participant_limit = 0 OR participant_limit >"));
    }

    #[test]
    fn test_order_clauses() {
        let filter = EventSearchFilter::default();
        let sql_views = build_search_query(&filter, EventOrder::EventDateDesc, 10, 0);
        assert!(sql_views.sql().contains("ORDER BY event_date DESC"));
        let sql_date = build_search_query(&filter, EventOrder::EventDateAsc, 10, 0);
        assert!(sql_date.sql().contains("ORDER BY event_date ASC"));
    }
}

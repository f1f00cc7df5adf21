//! Event search and lifecycle service
//!
//! Builds filtered, paginated event queries for public and admin callers and
//! governs the state transitions from creation through moderation to
//! publication or cancellation.

use chrono::{DateTime, Duration, DurationRound, Utc};
use tracing::{debug, info};

use crate::database::repositories::{
    CategoryRepository, EventRepository, RequestRepository, UserRepository,
};
use crate::models::event::{
    AdminSearchParams, AdminStateAction, Event, EventFull, EventOrder, EventSearchFilter,
    EventShort, EventState, NewEventRequest, PublicSearchParams, PublicSearchSort,
    UpdateEventAdminRequest, UpdateEventUserRequest, UserStateAction,
};
use crate::models::user::UserShort;
use crate::services::stats_client::StatsClient;
use crate::utils::errors::{ExploreError, Result};
use crate::utils::logging::log_moderation;

/// Minimum gap between "now" and the event date for create/update
const MIN_HOURS_BEFORE_EVENT: i64 = 2;
/// Minimum gap between "now" and the event date at publication time
const MIN_HOURS_BEFORE_PUBLICATION_FOR_ADMIN: i64 = 1;

#[derive(Debug, Clone)]
pub struct EventService {
    event_repository: EventRepository,
    user_repository: UserRepository,
    category_repository: CategoryRepository,
    request_repository: RequestRepository,
    stats_client: StatsClient,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(
        event_repository: EventRepository,
        user_repository: UserRepository,
        category_repository: CategoryRepository,
        request_repository: RequestRepository,
        stats_client: StatsClient,
    ) -> Self {
        Self {
            event_repository,
            user_repository,
            category_repository,
            request_repository,
            stats_client,
        }
    }

    /// Public search: always restricted to published events; a missing range
    /// start defaults to "now" so past events are never returned.
    pub async fn search_public(
        &self,
        params: &PublicSearchParams,
        from: i64,
        size: i64,
    ) -> Result<Vec<EventShort>> {
        debug!(?params, from = from, size = size, "Public event search");

        validate_range(params.range_start, params.range_end)?;

        let filter = EventSearchFilter {
            text: params.text.clone(),
            categories: params.categories.clone(),
            paid: params.paid,
            initiators: None,
            states: Some(vec![EventState::Published]),
            range_start: Some(params.range_start.unwrap_or_else(Utc::now)),
            range_end: params.range_end,
            only_available: params.only_available,
        };

        // VIEWS ordering must hold across pages, so the full filtered set is
        // fetched and sorted before the from/size window is applied.
        let result = if params.sort == PublicSearchSort::Views {
            let events = self
                .event_repository
                .search(&filter, EventOrder::EventDateAsc, i64::MAX, 0)
                .await?;
            let shorts = self.to_short_list(&events).await?;
            sort_by_views_and_page(shorts, from, size)
        } else {
            let events = self
                .event_repository
                .search(&filter, EventOrder::EventDateAsc, size, from)
                .await?;
            self.to_short_list(&events).await?
        };

        debug!(found = result.len(), "Public search finished");
        Ok(result)
    }

    /// Public single-event read; records a view hit (fail-soft) and decorates
    /// the result with its live view count.
    pub async fn get_event_public(&self, event_id: i64, ip: &str) -> Result<EventFull> {
        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Event", event_id))?;

        if event.state() != EventState::Published {
            return Err(ExploreError::not_found("Event", event_id));
        }

        if !ip.trim().is_empty() {
            self.stats_client.increment_view(event_id, ip).await;
        }

        let views = self.stats_client.get_views_for_event(event_id).await;
        self.to_full(&event, views).await
    }

    /// Admin search: no implicit state or date restriction, ascending by id,
    /// each result annotated with its live confirmed-request count.
    pub async fn search_admin(
        &self,
        params: &AdminSearchParams,
        from: i64,
        size: i64,
    ) -> Result<Vec<EventFull>> {
        debug!(?params, from = from, size = size, "Admin event search");

        validate_range(params.range_start, params.range_end)?;

        let filter = EventSearchFilter {
            text: None,
            categories: params.categories.clone(),
            paid: None,
            initiators: params.users.clone(),
            states: params.states.clone(),
            range_start: params.range_start,
            range_end: params.range_end,
            only_available: false,
        };

        let events = self
            .event_repository
            .search(&filter, EventOrder::IdAsc, size, from)
            .await?;

        let result =
            futures::future::try_join_all(events.iter().map(|event| self.to_full(event, 0)))
                .await?;

        debug!(found = result.len(), "Admin search finished");
        Ok(result)
    }

    /// Create a new event in the PENDING state
    pub async fn add_event(&self, user_id: i64, request: &NewEventRequest) -> Result<EventFull> {
        info!(user_id = user_id, title = %request.title, "Adding event");

        validate_new_event(request, Utc::now())?;

        if !self.user_repository.exists_by_id(user_id).await? {
            return Err(ExploreError::not_found("User", user_id));
        }
        if self.category_repository.find_by_id(request.category).await?.is_none() {
            return Err(ExploreError::not_found("Category", request.category));
        }

        let event = self.event_repository.create(user_id, request).await?;
        info!(event_id = event.id, user_id = user_id, "Event created");
        self.to_full(&event, 0).await
    }

    /// Owner's events, newest event date first; empty list for an unknown user
    pub async fn get_events_by_owner(
        &self,
        user_id: i64,
        from: i64,
        size: i64,
    ) -> Result<Vec<EventShort>> {
        if !self.user_repository.exists_by_id(user_id).await? {
            return Ok(Vec::new());
        }

        let events = self
            .event_repository
            .find_by_initiator(user_id, size, from)
            .await?;
        self.to_short_list(&events).await
    }

    /// Full detail of an owned event
    pub async fn get_event_private(&self, user_id: i64, event_id: i64) -> Result<EventFull> {
        let event = self
            .event_repository
            .find_by_id_and_initiator(event_id, user_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Event", event_id))?;

        self.to_full(&event, 0).await
    }

    /// Partial update by the owner, allowed only while PENDING or CANCELED
    pub async fn update_event_by_owner(
        &self,
        user_id: i64,
        event_id: i64,
        patch: &UpdateEventUserRequest,
    ) -> Result<EventFull> {
        info!(user_id = user_id, event_id = event_id, "Owner updating event");

        let mut event = self
            .event_repository
            .find_by_id_and_initiator(event_id, user_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Event", event_id))?;

        check_owner_can_update(event.state())?;

        validate_patch_fields(
            patch.annotation.as_deref(),
            patch.description.as_deref(),
            patch.title.as_deref(),
            patch.participant_limit,
        )?;

        if let Some(event_date) = patch.event_date {
            check_event_date_floor(event_date, Utc::now())?;
        }

        if let Some(category_id) = patch.category {
            if self.category_repository.find_by_id(category_id).await?.is_none() {
                return Err(ExploreError::not_found("Category", category_id));
            }
        }

        apply_common_patch(
            &mut event,
            patch.annotation.as_deref(),
            patch.category,
            patch.description.as_deref(),
            patch.event_date,
            patch.location,
            patch.paid,
            patch.participant_limit,
            patch.request_moderation,
            patch.comments_enabled,
            patch.title.as_deref(),
        );

        if let Some(action) = patch.state_action {
            apply_user_state_action(&mut event, action);
        }

        let saved = self.event_repository.save(&event).await?;
        info!(event_id = event_id, state = %saved.state, "Owner update saved");
        self.to_full(&saved, 0).await
    }

    /// Partial update + moderation by the administrator
    pub async fn moderate_event_by_admin(
        &self,
        event_id: i64,
        patch: &UpdateEventAdminRequest,
    ) -> Result<EventFull> {
        info!(event_id = event_id, "Admin moderating event");

        let mut event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Event", event_id))?;

        validate_patch_fields(
            patch.annotation.as_deref(),
            patch.description.as_deref(),
            patch.title.as_deref(),
            patch.participant_limit,
        )?;

        if let Some(event_date) = patch.event_date {
            check_event_date_floor(event_date, Utc::now())?;
        }

        if let Some(category_id) = patch.category {
            if self.category_repository.find_by_id(category_id).await?.is_none() {
                return Err(ExploreError::not_found("Category", category_id));
            }
        }

        apply_common_patch(
            &mut event,
            patch.annotation.as_deref(),
            patch.category,
            patch.description.as_deref(),
            patch.event_date,
            patch.location,
            patch.paid,
            patch.participant_limit,
            patch.request_moderation,
            patch.comments_enabled,
            patch.title.as_deref(),
        );

        if let Some(action) = patch.state_action {
            apply_admin_state_action(&mut event, action, Utc::now())?;
            log_moderation(event_id, action_name(action), &event.state);
        }

        let saved = self.event_repository.save(&event).await?;
        info!(event_id = event_id, state = %saved.state, "Moderation saved");
        self.to_full(&saved, 0).await
    }

    async fn to_full(&self, event: &Event, views: i64) -> Result<EventFull> {
        let category = self
            .category_repository
            .find_by_id(event.category_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Category", event.category_id))?;
        let initiator = self
            .user_repository
            .find_by_id(event.initiator_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("User", event.initiator_id))?;
        let confirmed = self.request_repository.count_confirmed(event.id).await?;

        Ok(EventFull {
            id: event.id,
            annotation: event.annotation.clone(),
            category,
            confirmed_requests: confirmed,
            created_on: event.created_on,
            description: event.description.clone(),
            event_date: event.event_date,
            initiator: UserShort::from(&initiator),
            location: event.location(),
            paid: event.paid,
            participant_limit: event.participant_limit,
            published_on: event.published_on,
            request_moderation: event.request_moderation,
            comments_enabled: event.comments_enabled,
            state: event.state(),
            title: event.title.clone(),
            views,
        })
    }

    /// Short representations of the given events, preserving id order
    pub async fn shorts_by_ids(&self, event_ids: &[i64]) -> Result<Vec<EventShort>> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let events = self.event_repository.find_by_ids(event_ids).await?;
        self.to_short_list(&events).await
    }

    /// Short representations with views resolved in one stats round-trip
    pub(crate) async fn to_short_list(&self, events: &[Event]) -> Result<Vec<EventShort>> {
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        let views = self.stats_client.get_views_for_events(&ids).await;

        let mut result = Vec::with_capacity(events.len());
        for (event, views) in events.iter().zip(views) {
            let category = self
                .category_repository
                .find_by_id(event.category_id)
                .await?
                .ok_or_else(|| ExploreError::not_found("Category", event.category_id))?;
            let initiator = self
                .user_repository
                .find_by_id(event.initiator_id)
                .await?
                .ok_or_else(|| ExploreError::not_found("User", event.initiator_id))?;
            let confirmed = self.request_repository.count_confirmed(event.id).await?;

            result.push(EventShort {
                id: event.id,
                annotation: event.annotation.clone(),
                category,
                confirmed_requests: confirmed,
                event_date: event.event_date,
                initiator: UserShort::from(&initiator),
                paid: event.paid,
                title: event.title.clone(),
                views,
            });
        }

        Ok(result)
    }
}

/// Descending views order over the whole result set, then the page window
pub fn sort_by_views_and_page(
    mut events: Vec<EventShort>,
    from: i64,
    size: i64,
) -> Vec<EventShort> {
    events.sort_by(|a, b| b.views.cmp(&a.views));
    events
        .into_iter()
        .skip(from.max(0) as usize)
        .take(size.max(0) as usize)
        .collect()
}

/// Range-order validation shared by public and admin search
pub fn validate_range(
    range_start: Option<DateTime<Utc>>,
    range_end: Option<DateTime<Utc>>,
) -> Result<()> {
    if let (Some(start), Some(end)) = (range_start, range_end) {
        if start > end {
            return Err(ExploreError::InvalidInput(
                "rangeStart cannot be after rangeEnd".to_string(),
            ));
        }
    }
    Ok(())
}

/// The +2h floor applied to user-supplied event dates
pub fn check_event_date_floor(event_date: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if event_date < now + Duration::hours(MIN_HOURS_BEFORE_EVENT) {
        return Err(ExploreError::BusinessRuleViolation(
            "Event date must be at least two hours in the future".to_string(),
        ));
    }
    Ok(())
}

fn check_annotation_len(annotation: &str) -> Result<()> {
    if !(20..=2000).contains(&annotation.chars().count()) {
        return Err(ExploreError::InvalidInput(
            "Annotation must be between 20 and 2000 characters".to_string(),
        ));
    }
    Ok(())
}

fn check_description_len(description: &str) -> Result<()> {
    if !(20..=7000).contains(&description.chars().count()) {
        return Err(ExploreError::InvalidInput(
            "Description must be between 20 and 7000 characters".to_string(),
        ));
    }
    Ok(())
}

fn check_title_len(title: &str) -> Result<()> {
    if !(3..=120).contains(&title.chars().count()) {
        return Err(ExploreError::InvalidInput(
            "Title must be between 3 and 120 characters".to_string(),
        ));
    }
    Ok(())
}

fn check_participant_limit(limit: i32) -> Result<()> {
    if limit < 0 {
        return Err(ExploreError::InvalidInput(
            "Participant limit must be positive or zero".to_string(),
        ));
    }
    Ok(())
}

/// Field bounds plus the event-date floor for a new event
pub fn validate_new_event(request: &NewEventRequest, now: DateTime<Utc>) -> Result<()> {
    check_annotation_len(&request.annotation)?;
    check_description_len(&request.description)?;
    check_title_len(&request.title)?;
    check_participant_limit(request.participant_limit.unwrap_or(0))?;
    check_event_date_floor(request.event_date, now)
}

/// The creation-time field bounds, applied to whichever fields a partial
/// update supplies.
pub fn validate_patch_fields(
    annotation: Option<&str>,
    description: Option<&str>,
    title: Option<&str>,
    participant_limit: Option<i32>,
) -> Result<()> {
    if let Some(annotation) = annotation {
        check_annotation_len(annotation)?;
    }
    if let Some(description) = description {
        check_description_len(description)?;
    }
    if let Some(title) = title {
        check_title_len(title)?;
    }
    if let Some(limit) = participant_limit {
        check_participant_limit(limit)?;
    }
    Ok(())
}

/// Owners may only edit events awaiting review or already canceled
pub fn check_owner_can_update(state: EventState) -> Result<()> {
    if !matches!(state, EventState::Pending | EventState::Canceled) {
        return Err(ExploreError::BusinessRuleViolation(format!(
            "Only pending or canceled events can be changed. Current state: {}",
            state.as_str()
        )));
    }
    Ok(())
}

/// Owner-side state actions; unconditional once the event passed the
/// editability check.
pub fn apply_user_state_action(event: &mut Event, action: UserStateAction) {
    match action {
        UserStateAction::SendToReview => event.state = EventState::Pending.as_str().to_string(),
        UserStateAction::CancelReview => event.state = EventState::Canceled.as_str().to_string(),
    }
}

/// Admin-side state actions with their publication preconditions
pub fn apply_admin_state_action(
    event: &mut Event,
    action: AdminStateAction,
    now: DateTime<Utc>,
) -> Result<()> {
    match action {
        AdminStateAction::PublishEvent => {
            if event.state() != EventState::Pending {
                return Err(ExploreError::BusinessRuleViolation(format!(
                    "Cannot publish the event because it's not in the PENDING state. Current state: {}",
                    event.state
                )));
            }
            if event.event_date < now + Duration::hours(MIN_HOURS_BEFORE_PUBLICATION_FOR_ADMIN) {
                return Err(ExploreError::BusinessRuleViolation(format!(
                    "Cannot publish the event. Event date must be at least {MIN_HOURS_BEFORE_PUBLICATION_FOR_ADMIN} hour(s) in the future. Event date: {}",
                    event.event_date
                )));
            }
            event.state = EventState::Published.as_str().to_string();
            // Second precision on the wire
            event.published_on = Some(
                now.duration_trunc(Duration::seconds(1))
                    .unwrap_or(now),
            );
        }
        AdminStateAction::RejectEvent => {
            if event.state() == EventState::Published {
                return Err(ExploreError::BusinessRuleViolation(format!(
                    "Cannot reject the event because it has already been published. Current state: {}",
                    event.state
                )));
            }
            event.state = EventState::Canceled.as_str().to_string();
        }
    }
    Ok(())
}

fn action_name(action: AdminStateAction) -> &'static str {
    match action {
        AdminStateAction::PublishEvent => "PUBLISH_EVENT",
        AdminStateAction::RejectEvent => "REJECT_EVENT",
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_common_patch(
    event: &mut Event,
    annotation: Option<&str>,
    category: Option<i64>,
    description: Option<&str>,
    event_date: Option<DateTime<Utc>>,
    location: Option<crate::models::event::Location>,
    paid: Option<bool>,
    participant_limit: Option<i32>,
    request_moderation: Option<bool>,
    comments_enabled: Option<bool>,
    title: Option<&str>,
) {
    if let Some(annotation) = annotation {
        event.annotation = annotation.to_string();
    }
    if let Some(category) = category {
        event.category_id = category;
    }
    if let Some(description) = description {
        event.description = description.to_string();
    }
    if let Some(event_date) = event_date {
        event.event_date = event_date;
    }
    if let Some(location) = location {
        event.location_lat = location.lat;
        event.location_lon = location.lon;
    }
    if let Some(paid) = paid {
        event.paid = paid;
    }
    if let Some(participant_limit) = participant_limit {
        event.participant_limit = participant_limit;
    }
    if let Some(request_moderation) = request_moderation {
        event.request_moderation = request_moderation;
    }
    if let Some(comments_enabled) = comments_enabled {
        event.comments_enabled = comments_enabled;
    }
    if let Some(title) = title {
        event.title = title.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Location;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn sample_event(state: EventState, event_date: DateTime<Utc>) -> Event {
        Event {
            id: 1,
            annotation: "An annotation long enough for a sample".to_string(),
            description: "A description long enough for a sample".to_string(),
            title: "Sample".to_string(),
            event_date,
            created_on: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            published_on: None,
            paid: false,
            participant_limit: 0,
            request_moderation: true,
            comments_enabled: true,
            state: state.as_str().to_string(),
            category_id: 1,
            initiator_id: 1,
            location_lat: 55.75,
            location_lon: 37.62,
        }
    }

    fn sample_new_event(event_date: DateTime<Utc>) -> NewEventRequest {
        NewEventRequest {
            annotation: "a".repeat(30),
            category: 1,
            description: "d".repeat(30),
            event_date,
            location: Location { lat: 55.75, lon: 37.62 },
            paid: None,
            participant_limit: None,
            request_moderation: None,
            comments_enabled: None,
            title: "Concert".to_string(),
        }
    }

    #[test]
    fn test_event_date_floor_fails_under_two_hours() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let too_soon = now + Duration::minutes(119);
        assert_matches!(
            check_event_date_floor(too_soon, now),
            Err(ExploreError::BusinessRuleViolation(_))
        );
        assert!(check_event_date_floor(now + Duration::hours(2), now).is_ok());
    }

    #[test]
    fn test_validate_new_event_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let date = now + Duration::hours(3);

        let mut request = sample_new_event(date);
        request.annotation = "short".to_string();
        assert_matches!(
            validate_new_event(&request, now),
            Err(ExploreError::InvalidInput(_))
        );

        let mut request = sample_new_event(date);
        request.title = "ab".to_string();
        assert_matches!(
            validate_new_event(&request, now),
            Err(ExploreError::InvalidInput(_))
        );

        let mut request = sample_new_event(date);
        request.participant_limit = Some(-1);
        assert_matches!(
            validate_new_event(&request, now),
            Err(ExploreError::InvalidInput(_))
        );

        assert!(validate_new_event(&sample_new_event(date), now).is_ok());
    }

    #[test]
    fn test_owner_can_update_only_pending_or_canceled() {
        assert!(check_owner_can_update(EventState::Pending).is_ok());
        assert!(check_owner_can_update(EventState::Canceled).is_ok());
        assert_matches!(
            check_owner_can_update(EventState::Published),
            Err(ExploreError::BusinessRuleViolation(_))
        );
    }

    #[test]
    fn test_publish_requires_pending_state() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut event = sample_event(EventState::Canceled, now + Duration::hours(3));
        assert_matches!(
            apply_admin_state_action(&mut event, AdminStateAction::PublishEvent, now),
            Err(ExploreError::BusinessRuleViolation(_))
        );
    }

    #[test]
    fn test_publish_requires_one_hour_headroom() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut event = sample_event(EventState::Pending, now + Duration::minutes(30));
        assert_matches!(
            apply_admin_state_action(&mut event, AdminStateAction::PublishEvent, now),
            Err(ExploreError::BusinessRuleViolation(_))
        );
    }

    #[test]
    fn test_publish_sets_state_and_published_on() {
        let now = Utc
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .unwrap()
            + Duration::milliseconds(250);
        let mut event = sample_event(EventState::Pending, now + Duration::hours(3));
        apply_admin_state_action(&mut event, AdminStateAction::PublishEvent, now).unwrap();
        assert_eq!(event.state(), EventState::Published);
        let published_on = event.published_on.unwrap();
        assert_eq!(published_on.timestamp_subsec_millis(), 0);
        assert!(published_on <= now);
    }

    #[test]
    fn test_reject_refused_after_publication() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut event = sample_event(EventState::Published, now + Duration::hours(3));
        assert_matches!(
            apply_admin_state_action(&mut event, AdminStateAction::RejectEvent, now),
            Err(ExploreError::BusinessRuleViolation(_))
        );

        let mut event = sample_event(EventState::Pending, now + Duration::hours(3));
        apply_admin_state_action(&mut event, AdminStateAction::RejectEvent, now).unwrap();
        assert_eq!(event.state(), EventState::Canceled);
    }

    #[test]
    fn test_user_state_actions() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut event = sample_event(EventState::Canceled, now + Duration::hours(3));
        apply_user_state_action(&mut event, UserStateAction::SendToReview);
        assert_eq!(event.state(), EventState::Pending);
        apply_user_state_action(&mut event, UserStateAction::CancelReview);
        assert_eq!(event.state(), EventState::Canceled);
    }

    #[test]
    fn test_validate_range_rejects_inverted() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_matches!(
            validate_range(Some(start), Some(end)),
            Err(ExploreError::InvalidInput(_))
        );
        assert!(validate_range(Some(end), Some(start)).is_ok());
        assert!(validate_range(None, Some(end)).is_ok());
        assert!(validate_range(Some(start), None).is_ok());
    }

    fn sample_short(id: i64, views: i64) -> EventShort {
        EventShort {
            id,
            annotation: "An annotation long enough for a sample".to_string(),
            category: crate::models::Category { id: 1, name: "Music".to_string() },
            confirmed_requests: 0,
            event_date: Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap(),
            initiator: UserShort { id: 1, name: "Ann".to_string() },
            paid: false,
            title: "Sample".to_string(),
            views,
        }
    }

    #[test]
    fn test_views_order_holds_across_pages() {
        let events = vec![
            sample_short(1, 5),
            sample_short(2, 1),
            sample_short(3, 9),
            sample_short(4, 3),
        ];

        let first = sort_by_views_and_page(events.clone(), 0, 2);
        assert_eq!(first.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3, 1]);

        let second = sort_by_views_and_page(events, 2, 2);
        assert_eq!(second.iter().map(|e| e.id).collect::<Vec<_>>(), vec![4, 2]);
    }

    #[test]
    fn test_validate_patch_fields_bounds() {
        assert!(validate_patch_fields(None, None, None, None).is_ok());

        let annotation = "a".repeat(30);
        let description = "d".repeat(30);
        assert!(validate_patch_fields(
            Some(annotation.as_str()),
            Some(description.as_str()),
            Some("Concert"),
            Some(10),
        )
        .is_ok());

        assert_matches!(
            validate_patch_fields(None, None, Some("x"), None),
            Err(ExploreError::InvalidInput(_))
        );
        assert_matches!(
            validate_patch_fields(Some("short"), None, None, None),
            Err(ExploreError::InvalidInput(_))
        );
        assert_matches!(
            validate_patch_fields(None, None, None, Some(-1)),
            Err(ExploreError::InvalidInput(_))
        );
    }

    #[test]
    fn test_apply_common_patch_leaves_absent_fields() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut event = sample_event(EventState::Pending, now + Duration::hours(3));
        let original_title = event.title.clone();

        apply_common_patch(
            &mut event,
            None,
            None,
            None,
            None,
            None,
            Some(true),
            Some(10),
            None,
            None,
            None,
        );

        assert_eq!(event.title, original_title);
        assert!(event.paid);
        assert_eq!(event.participant_limit, 10);
    }
}

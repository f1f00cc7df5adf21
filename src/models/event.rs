//! Event model and search filter types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::category::Category;
use crate::models::user::UserShort;
use crate::utils::datetime::{serde_format, serde_format_opt};

/// Moderation state of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventState {
    Pending,
    Published,
    Canceled,
}

impl EventState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Pending => "PENDING",
            EventState::Published => "PUBLISHED",
            EventState::Canceled => "CANCELED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(EventState::Pending),
            "PUBLISHED" => Some(EventState::Published),
            "CANCELED" => Some(EventState::Canceled),
            _ => None,
        }
    }
}

/// Geographic coordinates of the event venue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Event row as stored in the database. The state column is TEXT; use
/// [`Event::state`] for the typed view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub annotation: String,
    pub description: String,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub created_on: DateTime<Utc>,
    pub published_on: Option<DateTime<Utc>>,
    pub paid: bool,
    pub participant_limit: i32,
    pub request_moderation: bool,
    pub comments_enabled: bool,
    pub state: String,
    pub category_id: i64,
    pub initiator_id: i64,
    pub location_lat: f64,
    pub location_lon: f64,
}

impl Event {
    pub fn state(&self) -> EventState {
        EventState::parse(&self.state).unwrap_or(EventState::Pending)
    }

    pub fn location(&self) -> Location {
        Location {
            lat: self.location_lat,
            lon: self.location_lon,
        }
    }
}

/// Full event representation returned to owners, admins and single-event reads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFull {
    pub id: i64,
    pub annotation: String,
    pub category: Category,
    pub confirmed_requests: i64,
    #[serde(with = "serde_format")]
    pub created_on: DateTime<Utc>,
    pub description: String,
    #[serde(with = "serde_format")]
    pub event_date: DateTime<Utc>,
    pub initiator: UserShort,
    pub location: Location,
    pub paid: bool,
    pub participant_limit: i32,
    #[serde(with = "serde_format_opt")]
    pub published_on: Option<DateTime<Utc>>,
    pub request_moderation: bool,
    pub comments_enabled: bool,
    pub state: EventState,
    pub title: String,
    pub views: i64,
}

/// Short event representation used in listings and compilations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventShort {
    pub id: i64,
    pub annotation: String,
    pub category: Category,
    pub confirmed_requests: i64,
    #[serde(with = "serde_format")]
    pub event_date: DateTime<Utc>,
    pub initiator: UserShort,
    pub paid: bool,
    pub title: String,
    pub views: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventRequest {
    pub annotation: String,
    pub category: i64,
    pub description: String,
    #[serde(with = "serde_format")]
    pub event_date: DateTime<Utc>,
    pub location: Location,
    pub paid: Option<bool>,
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
    pub comments_enabled: Option<bool>,
    pub title: String,
}

/// State actions available to the event owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStateAction {
    SendToReview,
    CancelReview,
}

/// State actions available to the administrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminStateAction {
    PublishEvent,
    RejectEvent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventUserRequest {
    pub annotation: Option<String>,
    pub category: Option<i64>,
    pub description: Option<String>,
    #[serde(default, with = "serde_format_opt")]
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<Location>,
    pub paid: Option<bool>,
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
    pub comments_enabled: Option<bool>,
    pub title: Option<String>,
    pub state_action: Option<UserStateAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventAdminRequest {
    pub annotation: Option<String>,
    pub category: Option<i64>,
    pub description: Option<String>,
    #[serde(default, with = "serde_format_opt")]
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<Location>,
    pub paid: Option<bool>,
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
    pub comments_enabled: Option<bool>,
    pub title: Option<String>,
    pub state_action: Option<AdminStateAction>,
}

/// Sort order for public event search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicSearchSort {
    #[default]
    EventDate,
    Views,
}

/// Filters for the public event search
#[derive(Debug, Clone, Default)]
pub struct PublicSearchParams {
    pub text: Option<String>,
    pub categories: Option<Vec<i64>>,
    pub paid: Option<bool>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
    pub only_available: bool,
    pub sort: PublicSearchSort,
}

/// Filters for the admin event search
#[derive(Debug, Clone, Default)]
pub struct AdminSearchParams {
    pub users: Option<Vec<i64>>,
    pub states: Option<Vec<EventState>>,
    pub categories: Option<Vec<i64>>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
}

/// Row-level filter evaluated by the event repository. Absent filters add no
/// constraint; they never mean "match nothing".
#[derive(Debug, Clone, Default)]
pub struct EventSearchFilter {
    pub text: Option<String>,
    pub categories: Option<Vec<i64>>,
    pub paid: Option<bool>,
    pub initiators: Option<Vec<i64>>,
    pub states: Option<Vec<EventState>>,
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
    pub only_available: bool,
}

/// Sort order applied by the event repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOrder {
    #[default]
    EventDateAsc,
    EventDateDesc,
    IdAsc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_state_round_trip() {
        for state in [EventState::Pending, EventState::Published, EventState::Canceled] {
            assert_eq!(EventState::parse(state.as_str()), Some(state));
        }
        assert_eq!(EventState::parse("DRAFT"), None);
    }

    #[test]
    fn test_state_action_deserialization() {
        let action: UserStateAction = serde_json::from_str("\"SEND_TO_REVIEW\"").unwrap();
        assert_eq!(action, UserStateAction::SendToReview);
        let action: AdminStateAction = serde_json::from_str("\"PUBLISH_EVENT\"").unwrap();
        assert_eq!(action, AdminStateAction::PublishEvent);
    }

    #[test]
    fn test_new_event_request_wire_format() {
        let json = r#"{
            "annotation": "An annotation long enough for the bounds",
            "category": 1,
            "description": "A description long enough for the bounds",
            "eventDate": "2030-01-01 12:00:00",
            "location": {"lat": 55.75, "lon": 37.62},
            "title": "Concert"
        }"#;
        let request: NewEventRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.category, 1);
        assert_eq!(request.event_date.to_rfc3339(), "2030-01-01T12:00:00+00:00");
        assert!(request.paid.is_none());
    }
}

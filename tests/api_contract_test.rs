//! Wire-contract tests
//!
//! Verifies the JSON shapes and error responses the services expose, without
//! requiring a running database.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{TimeZone, Utc};

use explore_with_me::handlers::ApiError;
use explore_with_me::models::{
    EndpointHitDto, EventRequestStatusUpdate, EventState, Location, NewEventRequest,
    ParticipationRequestDto, RequestStatus, UpdateEventAdminRequest,
};
use explore_with_me::ExploreError;

#[tokio::test]
async fn not_found_maps_to_404_with_json_body() {
    let response = ExploreError::not_found("Event", 42).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let body: ApiError = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.status, "NOT_FOUND");
    assert!(body.message.contains("Event with id=42 not found"));
}

#[tokio::test]
async fn business_rule_violation_maps_to_409() {
    let response =
        ExploreError::BusinessRuleViolation("The participant limit has been reached".to_string())
            .into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_input_maps_to_400() {
    let response = ExploreError::InvalidInput("bad".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn new_event_request_parses_camel_case_and_wire_dates() {
    let json = r#"{
        "annotation": "An annotation long enough to pass validation checks",
        "category": 3,
        "description": "A description long enough to pass validation checks",
        "eventDate": "2026-06-01 12:00:00",
        "location": {"lat": 55.75, "lon": 37.61},
        "paid": true,
        "participantLimit": 10,
        "requestModeration": false,
        "title": "Concert"
    }"#;

    let request: NewEventRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.category, 3);
    assert_eq!(
        request.event_date,
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(request.location, Location { lat: 55.75, lon: 37.61 });
    assert_eq!(request.participant_limit, Some(10));
}

#[test]
fn admin_patch_tolerates_absent_fields() {
    let patch: UpdateEventAdminRequest = serde_json::from_str("{}").unwrap();
    assert!(patch.event_date.is_none());
    assert!(patch.state_action.is_none());

    let patch: UpdateEventAdminRequest =
        serde_json::from_str(r#"{"stateAction": "PUBLISH_EVENT"}"#).unwrap();
    assert!(patch.state_action.is_some());
}

#[test]
fn request_status_update_parses_screaming_case() {
    let json = r#"{"requestIds": [1, 2, 3], "status": "CONFIRMED"}"#;
    let update: EventRequestStatusUpdate = serde_json::from_str(json).unwrap();
    assert_eq!(update.request_ids, vec![1, 2, 3]);
    assert_eq!(update.status, RequestStatus::Confirmed);
}

#[test]
fn participation_request_serializes_camel_case() {
    let dto = ParticipationRequestDto {
        id: 5,
        created: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
        event: 7,
        requester: 11,
        status: RequestStatus::Pending,
    };
    let value = serde_json::to_value(&dto).unwrap();
    assert_eq!(value["event"], 7);
    assert_eq!(value["requester"], 11);
    assert_eq!(value["status"], "PENDING");
    assert_eq!(value["created"], "2026-03-01 09:30:00");
}

#[test]
fn endpoint_hit_round_trips_wire_format() {
    let json = r#"{
        "app": "explore-with-me",
        "uri": "/events/1",
        "ip": "192.163.0.1",
        "timestamp": "2026-09-06 11:00:23"
    }"#;
    let hit: EndpointHitDto = serde_json::from_str(json).unwrap();
    assert_eq!(hit.uri, "/events/1");
    assert_eq!(
        hit.timestamp,
        Utc.with_ymd_and_hms(2026, 9, 6, 11, 0, 23).unwrap()
    );

    let value = serde_json::to_value(&hit).unwrap();
    assert_eq!(value["timestamp"], "2026-09-06 11:00:23");
}

#[test]
fn event_state_serializes_screaming_case() {
    assert_eq!(
        serde_json::to_value(EventState::Published).unwrap(),
        "PUBLISHED"
    );
    assert_eq!(
        serde_json::from_value::<EventState>(serde_json::json!("CANCELED")).unwrap(),
        EventState::Canceled
    );
}

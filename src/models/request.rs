//! Participation request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::datetime::serde_format;

/// Status of a participation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Rejected,
    Canceled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Confirmed => "CONFIRMED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Canceled => "CANCELED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(RequestStatus::Pending),
            "CONFIRMED" => Some(RequestStatus::Confirmed),
            "REJECTED" => Some(RequestStatus::Rejected),
            "CANCELED" => Some(RequestStatus::Canceled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParticipationRequest {
    pub id: i64,
    pub created: DateTime<Utc>,
    pub event_id: i64,
    pub requester_id: i64,
    pub status: String,
}

impl ParticipationRequest {
    pub fn status(&self) -> RequestStatus {
        RequestStatus::parse(&self.status).unwrap_or(RequestStatus::Pending)
    }
}

/// Wire representation of a participation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationRequestDto {
    pub id: i64,
    #[serde(with = "serde_format")]
    pub created: DateTime<Utc>,
    pub event: i64,
    pub requester: i64,
    pub status: RequestStatus,
}

impl From<&ParticipationRequest> for ParticipationRequestDto {
    fn from(request: &ParticipationRequest) -> Self {
        Self {
            id: request.id,
            created: request.created,
            event: request.event_id,
            requester: request.requester_id,
            status: request.status(),
        }
    }
}

/// Bulk status update issued by the event initiator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequestStatusUpdate {
    pub request_ids: Vec<i64>,
    pub status: RequestStatus,
}

/// Partitioned outcome of a bulk status update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequestStatusUpdateResult {
    pub confirmed_requests: Vec<ParticipationRequestDto>,
    pub rejected_requests: Vec<ParticipationRequestDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Confirmed,
            RequestStatus::Rejected,
            RequestStatus::Canceled,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_update_wire_format() {
        let json = r#"{"requestIds": [1, 2, 3], "status": "CONFIRMED"}"#;
        let update: EventRequestStatusUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.request_ids, vec![1, 2, 3]);
        assert_eq!(update.status, RequestStatus::Confirmed);
    }
}

//! Participation request service
//!
//! Creation and bulk confirmation run inside a transaction holding a row lock
//! on the event, so concurrent capacity checks serialize instead of racing.

use tracing::{debug, info};

use crate::database::repositories::{EventRepository, RequestRepository, UserRepository};
use crate::models::event::EventState;
use crate::models::request::{
    EventRequestStatusUpdateResult, ParticipationRequestDto, RequestStatus,
};
use crate::utils::errors::{ExploreError, Result};

#[derive(Debug, Clone)]
pub struct RequestService {
    request_repository: RequestRepository,
    event_repository: EventRepository,
    user_repository: UserRepository,
}

impl RequestService {
    /// Create a new RequestService instance
    pub fn new(
        request_repository: RequestRepository,
        event_repository: EventRepository,
        user_repository: UserRepository,
    ) -> Self {
        Self {
            request_repository,
            event_repository,
            user_repository,
        }
    }

    /// Create a participation request. Auto-confirmed when the event does not
    /// moderate requests or has no participant limit.
    pub async fn create_request(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<ParticipationRequestDto> {
        info!(user_id = user_id, event_id = event_id, "Creating participation request");

        if !self.user_repository.exists_by_id(user_id).await? {
            return Err(ExploreError::not_found("User", user_id));
        }

        let mut tx = self.request_repository.begin().await?;

        let event = self
            .event_repository
            .find_by_id_for_update(&mut tx, event_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Event", event_id))?;

        if event.initiator_id == user_id {
            return Err(ExploreError::BusinessRuleViolation(
                "Initiator cannot request participation in own event".to_string(),
            ));
        }
        if event.state() != EventState::Published {
            return Err(ExploreError::BusinessRuleViolation(
                "Cannot participate in an unpublished event".to_string(),
            ));
        }
        if self
            .request_repository
            .exists_active(&mut tx, event_id, user_id)
            .await?
        {
            return Err(ExploreError::BusinessRuleViolation(
                "Participation request already exists".to_string(),
            ));
        }

        if event.participant_limit > 0 {
            let confirmed = self
                .request_repository
                .count_confirmed_in_tx(&mut tx, event_id)
                .await?;
            if confirmed >= i64::from(event.participant_limit) {
                return Err(ExploreError::BusinessRuleViolation(
                    "The participant limit has been reached".to_string(),
                ));
            }
        }

        let status = initial_status(event.request_moderation, event.participant_limit);
        let request = self
            .request_repository
            .create(&mut tx, event_id, user_id, status)
            .await?;
        tx.commit().await?;

        info!(request_id = request.id, status = %request.status, "Request created");
        Ok(ParticipationRequestDto::from(&request))
    }

    /// All requests made by a user
    pub async fn get_requests(&self, user_id: i64) -> Result<Vec<ParticipationRequestDto>> {
        if !self.user_repository.exists_by_id(user_id).await? {
            return Err(ExploreError::not_found("User", user_id));
        }

        let requests = self.request_repository.find_by_requester(user_id).await?;
        Ok(requests.iter().map(ParticipationRequestDto::from).collect())
    }

    /// Requests targeting an event, visible to its initiator only
    pub async fn get_requests_for_event(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Vec<ParticipationRequestDto>> {
        self.event_repository
            .find_by_id_and_initiator(event_id, user_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Event", event_id))?;

        let requests = self.request_repository.find_by_event(event_id).await?;
        Ok(requests.iter().map(ParticipationRequestDto::from).collect())
    }

    /// Cancel the user's own request
    pub async fn cancel_request(
        &self,
        user_id: i64,
        request_id: i64,
    ) -> Result<ParticipationRequestDto> {
        let request = self
            .request_repository
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Request", request_id))?;

        if request.requester_id != user_id {
            return Err(ExploreError::not_found("Request", request_id));
        }

        let canceled = self
            .request_repository
            .update_status(request_id, RequestStatus::Canceled)
            .await?;
        info!(request_id = request_id, user_id = user_id, "Request canceled");
        Ok(ParticipationRequestDto::from(&canceled))
    }

    /// Bulk status update by the event initiator. When confirming and the
    /// limit is reached mid-batch, the remaining ids are rejected.
    pub async fn update_requests_status(
        &self,
        user_id: i64,
        event_id: i64,
        request_ids: &[i64],
        target_status: RequestStatus,
    ) -> Result<EventRequestStatusUpdateResult> {
        info!(
            user_id = user_id,
            event_id = event_id,
            requests = request_ids.len(),
            status = target_status.as_str(),
            "Bulk request status update"
        );

        if !matches!(target_status, RequestStatus::Confirmed | RequestStatus::Rejected) {
            return Err(ExploreError::InvalidInput(
                "Target status must be CONFIRMED or REJECTED".to_string(),
            ));
        }

        let mut tx = self.request_repository.begin().await?;

        let event = self
            .event_repository
            .find_by_id_for_update(&mut tx, event_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Event", event_id))?;

        if event.initiator_id != user_id {
            return Err(ExploreError::not_found("Event", event_id));
        }

        let requests = self.request_repository.find_by_ids(&mut tx, request_ids).await?;
        if requests.len() != request_ids.len() {
            return Err(ExploreError::InvalidInput(
                "Some of the given request ids do not exist".to_string(),
            ));
        }
        for request in &requests {
            if request.event_id != event_id {
                return Err(ExploreError::InvalidInput(format!(
                    "Request {} does not belong to event {}",
                    request.id, event_id
                )));
            }
            if request.status() != RequestStatus::Pending {
                return Err(ExploreError::BusinessRuleViolation(format!(
                    "Request {} is not in the PENDING state",
                    request.id
                )));
            }
        }

        let mut result = EventRequestStatusUpdateResult::default();

        match target_status {
            RequestStatus::Rejected => {
                let rejected = self
                    .request_repository
                    .update_status_bulk(&mut tx, request_ids, RequestStatus::Rejected)
                    .await?;
                result.rejected_requests =
                    rejected.iter().map(ParticipationRequestDto::from).collect();
            }
            RequestStatus::Confirmed => {
                let confirmed_count = self
                    .request_repository
                    .count_confirmed_in_tx(&mut tx, event_id)
                    .await?;
                let (to_confirm, to_reject) = partition_for_confirmation(
                    event.participant_limit,
                    confirmed_count,
                    request_ids,
                );

                if to_confirm.is_empty() && !to_reject.is_empty() {
                    return Err(ExploreError::BusinessRuleViolation(
                        "The participant limit has been reached".to_string(),
                    ));
                }

                let confirmed = self
                    .request_repository
                    .update_status_bulk(&mut tx, &to_confirm, RequestStatus::Confirmed)
                    .await?;
                let rejected = self
                    .request_repository
                    .update_status_bulk(&mut tx, &to_reject, RequestStatus::Rejected)
                    .await?;

                result.confirmed_requests =
                    confirmed.iter().map(ParticipationRequestDto::from).collect();
                result.rejected_requests =
                    rejected.iter().map(ParticipationRequestDto::from).collect();
            }
            _ => unreachable!("validated above"),
        }

        tx.commit().await?;
        debug!(
            confirmed = result.confirmed_requests.len(),
            rejected = result.rejected_requests.len(),
            "Bulk update finished"
        );
        Ok(result)
    }
}

/// Initial status of a freshly created request
pub fn initial_status(request_moderation: bool, participant_limit: i32) -> RequestStatus {
    if !request_moderation || participant_limit == 0 {
        RequestStatus::Confirmed
    } else {
        RequestStatus::Pending
    }
}

/// Split a confirmation batch by remaining capacity. A limit of 0 means
/// unlimited; ids past the limit land in the reject partition.
pub fn partition_for_confirmation(
    participant_limit: i32,
    confirmed_count: i64,
    request_ids: &[i64],
) -> (Vec<i64>, Vec<i64>) {
    if participant_limit == 0 {
        return (request_ids.to_vec(), Vec::new());
    }

    let remaining = (i64::from(participant_limit) - confirmed_count).max(0) as usize;
    let to_confirm = request_ids.iter().take(remaining).copied().collect();
    let to_reject = request_ids.iter().skip(remaining).copied().collect();
    (to_confirm, to_reject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status() {
        assert_eq!(initial_status(false, 10), RequestStatus::Confirmed);
        assert_eq!(initial_status(true, 0), RequestStatus::Confirmed);
        assert_eq!(initial_status(true, 10), RequestStatus::Pending);
    }

    #[test]
    fn test_partition_unlimited() {
        let (confirm, reject) = partition_for_confirmation(0, 100, &[1, 2, 3]);
        assert_eq!(confirm, vec![1, 2, 3]);
        assert!(reject.is_empty());
    }

    #[test]
    fn test_partition_rejects_past_the_limit() {
        let (confirm, reject) = partition_for_confirmation(5, 3, &[10, 11, 12]);
        assert_eq!(confirm, vec![10, 11]);
        assert_eq!(reject, vec![12]);
    }

    #[test]
    fn test_partition_full_capacity() {
        let (confirm, reject) = partition_for_confirmation(3, 3, &[10, 11]);
        assert!(confirm.is_empty());
        assert_eq!(reject, vec![10, 11]);
    }
}

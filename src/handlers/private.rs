//! Endpoints scoped to an authenticated user
//!
//! Identity is carried in the path (`/users/:user_id/...`); authentication
//! itself is expected to happen upstream at the gateway.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::models::{
    CommentDto, EventFull, EventRequestStatusUpdate, EventRequestStatusUpdateResult, EventShort,
    NewCommentRequest, NewEventRequest, ParticipationRequestDto, UpdateCommentRequest,
    UpdateEventUserRequest,
};
use crate::utils::errors::Result;

use super::{AppState, Pagination};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/events", get(get_own_events).post(add_event))
        .route(
            "/users/:user_id/events/:event_id",
            get(get_own_event).patch(update_own_event),
        )
        .route(
            "/users/:user_id/events/:event_id/requests",
            get(get_event_requests).patch(update_event_requests),
        )
        .route("/users/:user_id/requests", get(get_own_requests).post(add_request))
        .route(
            "/users/:user_id/requests/:request_id/cancel",
            patch(cancel_request),
        )
        .route("/users/:user_id/comments", post(add_comment))
        .route(
            "/users/:user_id/comments/:comment_id",
            patch(update_comment).delete(delete_comment),
        )
}

async fn get_own_events(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<EventShort>>> {
    page.validate()?;
    let events = state
        .services
        .event_service
        .get_events_by_owner(user_id, page.from, page.size)
        .await?;
    Ok(Json(events))
}

async fn add_event(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<NewEventRequest>,
) -> Result<(StatusCode, Json<EventFull>)> {
    let event = state.services.event_service.add_event(user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn get_own_event(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> Result<Json<EventFull>> {
    let event = state
        .services
        .event_service
        .get_event_private(user_id, event_id)
        .await?;
    Ok(Json(event))
}

async fn update_own_event(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
    Json(patch): Json<UpdateEventUserRequest>,
) -> Result<Json<EventFull>> {
    let event = state
        .services
        .event_service
        .update_event_by_owner(user_id, event_id, &patch)
        .await?;
    Ok(Json(event))
}

async fn get_event_requests(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<ParticipationRequestDto>>> {
    let requests = state
        .services
        .request_service
        .get_requests_for_event(user_id, event_id)
        .await?;
    Ok(Json(requests))
}

async fn update_event_requests(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
    Json(update): Json<EventRequestStatusUpdate>,
) -> Result<Json<EventRequestStatusUpdateResult>> {
    let result = state
        .services
        .request_service
        .update_requests_status(user_id, event_id, &update.request_ids, update.status)
        .await?;
    Ok(Json(result))
}

async fn get_own_requests(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ParticipationRequestDto>>> {
    let requests = state.services.request_service.get_requests(user_id).await?;
    Ok(Json(requests))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddRequestQuery {
    event_id: i64,
}

async fn add_request(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<AddRequestQuery>,
) -> Result<(StatusCode, Json<ParticipationRequestDto>)> {
    let request = state
        .services
        .request_service
        .create_request(user_id, query.event_id)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn cancel_request(
    State(state): State<AppState>,
    Path((user_id, request_id)): Path<(i64, i64)>,
) -> Result<Json<ParticipationRequestDto>> {
    let request = state
        .services
        .request_service
        .cancel_request(user_id, request_id)
        .await?;
    Ok(Json(request))
}

async fn add_comment(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<CommentDto>)> {
    let comment = state
        .services
        .comment_service
        .add_comment(user_id, request.event_id, &request.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn update_comment(
    State(state): State<AppState>,
    Path((user_id, comment_id)): Path<(i64, i64)>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<CommentDto>> {
    let comment = state
        .services
        .comment_service
        .update_user_comment(user_id, comment_id, &request.text)
        .await?;
    Ok(Json(comment))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path((user_id, comment_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    state
        .services
        .comment_service
        .delete_user_comment(user_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

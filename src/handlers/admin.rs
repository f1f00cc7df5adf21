//! Administrative endpoints under `/admin`

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::models::{
    AdminSearchParams, Category, CommentDto, CompilationDto, EventFull, EventState,
    NewCategoryRequest, NewCompilationRequest, NewUserRequest, UpdateCompilationRequest,
    UpdateEventAdminRequest, UpdateUserRequest, User,
};
use crate::utils::datetime::parse_date_time;
use crate::utils::errors::{ExploreError, Result};

use super::{parse_id_list, AppState, Pagination};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(get_users).post(add_user))
        .route("/admin/users/:user_id", patch(update_user).delete(delete_user))
        .route("/admin/categories", post(add_category))
        .route(
            "/admin/categories/:category_id",
            patch(update_category).delete(delete_category),
        )
        .route("/admin/events", get(search_events))
        .route("/admin/events/:event_id", patch(moderate_event))
        .route("/admin/compilations", post(add_compilation))
        .route(
            "/admin/compilations/:compilation_id",
            patch(update_compilation).delete(delete_compilation),
        )
        .route("/admin/comments/:comment_id", delete(delete_comment))
        .route("/admin/comments/:comment_id/restore", patch(restore_comment))
}

#[derive(Debug, Deserialize)]
struct UserListQuery {
    ids: Option<String>,
    #[serde(default)]
    from: i64,
    #[serde(default = "super::default_size")]
    size: i64,
}

async fn get_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<User>>> {
    Pagination { from: query.from, size: query.size }.validate()?;
    let ids = parse_id_list(query.ids.as_deref())?;
    let users = state
        .services
        .user_service
        .get_users(ids.as_deref(), query.from, query.size)
        .await?;
    Ok(Json(users))
}

async fn add_user(
    State(state): State<AppState>,
    Json(request): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.services.user_service.create_user(&request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let user = state.services.user_service.update_user(user_id, &request).await?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode> {
    state.services.user_service.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_category(
    State(state): State<AppState>,
    Json(request): Json<NewCategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state
        .services
        .category_service
        .create_category(&request.name)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Json(request): Json<NewCategoryRequest>,
) -> Result<Json<Category>> {
    let category = state
        .services
        .category_service
        .update_category(category_id, &request.name)
        .await?;
    Ok(Json(category))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<StatusCode> {
    state.services.category_service.delete_category(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminSearchQuery {
    users: Option<String>,
    states: Option<String>,
    categories: Option<String>,
    range_start: Option<String>,
    range_end: Option<String>,
    #[serde(default)]
    from: i64,
    #[serde(default = "super::default_size")]
    size: i64,
}

fn parse_state_list(raw: Option<&str>) -> Result<Option<Vec<EventState>>> {
    match raw {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .split(',')
            .map(|part| {
                EventState::parse(part.trim()).ok_or_else(|| {
                    ExploreError::InvalidInput(format!("Unknown event state: '{part}'"))
                })
            })
            .collect::<Result<Vec<EventState>>>()
            .map(Some),
    }
}

async fn search_events(
    State(state): State<AppState>,
    Query(query): Query<AdminSearchQuery>,
) -> Result<Json<Vec<EventFull>>> {
    Pagination { from: query.from, size: query.size }.validate()?;

    let params = AdminSearchParams {
        users: parse_id_list(query.users.as_deref())?,
        states: parse_state_list(query.states.as_deref())?,
        categories: parse_id_list(query.categories.as_deref())?,
        range_start: query.range_start.as_deref().map(parse_date_time).transpose()?,
        range_end: query.range_end.as_deref().map(parse_date_time).transpose()?,
    };

    let events = state
        .services
        .event_service
        .search_admin(&params, query.from, query.size)
        .await?;
    Ok(Json(events))
}

async fn moderate_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(patch): Json<UpdateEventAdminRequest>,
) -> Result<Json<EventFull>> {
    let event = state
        .services
        .event_service
        .moderate_event_by_admin(event_id, &patch)
        .await?;
    Ok(Json(event))
}

async fn add_compilation(
    State(state): State<AppState>,
    Json(request): Json<NewCompilationRequest>,
) -> Result<(StatusCode, Json<CompilationDto>)> {
    let compilation = state
        .services
        .compilation_service
        .create_compilation(&request)
        .await?;
    Ok((StatusCode::CREATED, Json(compilation)))
}

async fn update_compilation(
    State(state): State<AppState>,
    Path(compilation_id): Path<i64>,
    Json(request): Json<UpdateCompilationRequest>,
) -> Result<Json<CompilationDto>> {
    let compilation = state
        .services
        .compilation_service
        .update_compilation(compilation_id, &request)
        .await?;
    Ok(Json(compilation))
}

async fn delete_compilation(
    State(state): State<AppState>,
    Path(compilation_id): Path<i64>,
) -> Result<StatusCode> {
    state
        .services
        .compilation_service
        .delete_compilation(compilation_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode> {
    state
        .services
        .comment_service
        .delete_comment_by_admin(comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn restore_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<Json<CommentDto>> {
    let comment = state
        .services
        .comment_service
        .restore_comment_by_admin(comment_id)
        .await?;
    Ok(Json(comment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_state_list() {
        assert_eq!(parse_state_list(None).unwrap(), None);
        assert_eq!(
            parse_state_list(Some("PENDING,PUBLISHED")).unwrap(),
            Some(vec![EventState::Pending, EventState::Published])
        );
        assert_matches!(
            parse_state_list(Some("SOMETHING")),
            Err(ExploreError::InvalidInput(_))
        );
    }
}

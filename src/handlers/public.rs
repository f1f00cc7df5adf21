//! Public (unauthenticated) endpoints

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{
    Category, CommentDto, CommentSort, CompilationDto, EventFull, EventShort, PublicSearchParams,
    PublicSearchSort,
};
use crate::utils::datetime::parse_date_time;
use crate::utils::errors::{ExploreError, Result};

use super::{client_ip, parse_id_list, AppState, Pagination};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(search_events))
        .route("/events/:event_id", get(get_event))
        .route("/events/:event_id/comments", get(get_event_comments))
        .route("/categories", get(get_categories))
        .route("/categories/:category_id", get(get_category))
        .route("/compilations", get(get_compilations))
        .route("/compilations/:compilation_id", get(get_compilation))
}

// from/size are spelled out per query struct: serde_urlencoded cannot
// deserialize numeric fields through #[serde(flatten)].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicSearchQuery {
    text: Option<String>,
    categories: Option<String>,
    paid: Option<bool>,
    range_start: Option<String>,
    range_end: Option<String>,
    #[serde(default)]
    only_available: bool,
    sort: Option<String>,
    #[serde(default)]
    from: i64,
    #[serde(default = "super::default_size")]
    size: i64,
}

impl PublicSearchQuery {
    fn page(&self) -> Pagination {
        Pagination { from: self.from, size: self.size }
    }
}

fn parse_date_param(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(parse_date_time).transpose()
}

fn parse_public_sort(raw: Option<&str>) -> Result<PublicSearchSort> {
    match raw {
        None | Some("EVENT_DATE") => Ok(PublicSearchSort::EventDate),
        Some("VIEWS") => Ok(PublicSearchSort::Views),
        Some(other) => Err(ExploreError::InvalidInput(format!(
            "Unknown sort: '{other}'"
        ))),
    }
}

async fn search_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(query): Query<PublicSearchQuery>,
) -> Result<Json<Vec<EventShort>>> {
    let page = query.page();
    page.validate()?;

    let params = PublicSearchParams {
        text: query.text,
        categories: parse_id_list(query.categories.as_deref())?,
        paid: query.paid,
        range_start: parse_date_param(query.range_start.as_deref())?,
        range_end: parse_date_param(query.range_end.as_deref())?,
        only_available: query.only_available,
        sort: parse_public_sort(query.sort.as_deref())?,
    };

    let events = state
        .services
        .event_service
        .search_public(&params, page.from, page.size)
        .await?;

    let ip = client_ip(&headers, peer);
    state.services.stats_client.record_hit("/events", &ip).await;

    Ok(Json(events))
}

async fn get_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventFull>> {
    let ip = client_ip(&headers, peer);
    let event = state
        .services
        .event_service
        .get_event_public(event_id, &ip)
        .await?;
    Ok(Json(event))
}

#[derive(Debug, Deserialize)]
struct CommentQuery {
    sort: Option<String>,
    #[serde(default)]
    from: i64,
    #[serde(default = "super::default_size")]
    size: i64,
}

async fn get_event_comments(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<CommentQuery>,
) -> Result<Json<Vec<CommentDto>>> {
    Pagination { from: query.from, size: query.size }.validate()?;
    let sort = CommentSort::from_query(query.sort.as_deref());
    let comments = state
        .services
        .comment_service
        .get_comments_for_event(event_id, query.from, query.size, sort)
        .await?;
    Ok(Json(comments))
}

async fn get_categories(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Category>>> {
    page.validate()?;
    let categories = state
        .services
        .category_service
        .get_all_categories(page.from, page.size)
        .await?;
    Ok(Json(categories))
}

async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<Category>> {
    let category = state
        .services
        .category_service
        .get_category_by_id(category_id)
        .await?;
    Ok(Json(category))
}

#[derive(Debug, Deserialize)]
struct CompilationQuery {
    pinned: Option<bool>,
    #[serde(default)]
    from: i64,
    #[serde(default = "super::default_size")]
    size: i64,
}

async fn get_compilations(
    State(state): State<AppState>,
    Query(query): Query<CompilationQuery>,
) -> Result<Json<Vec<CompilationDto>>> {
    Pagination { from: query.from, size: query.size }.validate()?;
    let compilations = state
        .services
        .compilation_service
        .get_compilations(query.pinned, query.from, query.size)
        .await?;
    Ok(Json(compilations))
}

async fn get_compilation(
    State(state): State<AppState>,
    Path(compilation_id): Path<i64>,
) -> Result<Json<CompilationDto>> {
    let compilation = state
        .services
        .compilation_service
        .get_compilation_by_id(compilation_id)
        .await?;
    Ok(Json(compilation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_public_sort() {
        assert_eq!(parse_public_sort(None).unwrap(), PublicSearchSort::EventDate);
        assert_eq!(
            parse_public_sort(Some("EVENT_DATE")).unwrap(),
            PublicSearchSort::EventDate
        );
        assert_eq!(parse_public_sort(Some("VIEWS")).unwrap(), PublicSearchSort::Views);
        assert_matches!(parse_public_sort(Some("ID")), Err(ExploreError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_date_param() {
        assert_eq!(parse_date_param(None).unwrap(), None);
        let parsed = parse_date_param(Some("2026-01-15 10:30:00")).unwrap().unwrap();
        assert_eq!(parsed.timestamp(), 1768473000);
        assert!(parse_date_param(Some("not-a-date")).is_err());
    }
}

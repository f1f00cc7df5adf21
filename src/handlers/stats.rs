//! Endpoints of the stats server

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::database::{self, DatabasePool};
use crate::models::stats::{EndpointHitDto, ViewStats};
use crate::services::StatsService;
use crate::utils::datetime::parse_date_time;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct StatsState {
    pub stats_service: StatsService,
    pub pool: DatabasePool,
}

pub fn stats_router(state: StatsState) -> Router {
    Router::new()
        .route("/hit", post(save_hit))
        .route("/stats", get(get_stats))
        .route("/health", get(health))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<StatsState>) -> Result<StatusCode> {
    database::health_check(&state.pool).await?;
    Ok(StatusCode::OK)
}

async fn save_hit(
    State(state): State<StatsState>,
    Json(hit): Json<EndpointHitDto>,
) -> Result<StatusCode> {
    state.stats_service.save_hit(&hit).await?;
    Ok(StatusCode::CREATED)
}

#[derive(Debug, Deserialize)]
struct StatsQuery {
    start: String,
    end: String,
    uris: Option<String>,
    #[serde(default)]
    unique: bool,
}

async fn get_stats(
    State(state): State<StatsState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Vec<ViewStats>>> {
    let start = parse_date_time(&query.start)?;
    let end = parse_date_time(&query.end)?;
    let uris: Vec<String> = query
        .uris
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|uri| !uri.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let stats = state.stats_service.get_stats(start, end, &uris, query.unique).await?;
    Ok(Json(stats))
}

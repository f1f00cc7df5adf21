//! HTTP surface
//!
//! Axum routers mapping REST endpoints onto the service layer. Errors cross
//! the boundary as JSON with a fixed status per error kind.

pub mod admin;
pub mod private;
pub mod public;
pub mod stats;

use std::net::SocketAddr;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::database::{self, DatabasePool};
use crate::services::ServiceFactory;
use crate::utils::datetime::format_date_time;
use crate::utils::errors::ExploreError;

/// Shared state of the main service
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub pool: DatabasePool,
}

/// Build the main-service router
pub fn main_router(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .merge(private::router())
        .merge(admin::router())
        .route("/health", axum::routing::get(health))
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::cors::CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<StatusCode, ExploreError> {
    database::health_check(&state.pool).await?;
    Ok(StatusCode::OK)
}

/// Error payload returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

impl IntoResponse for ExploreError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        let body = ApiError {
            status: status
                .canonical_reason()
                .unwrap_or("UNKNOWN")
                .to_uppercase()
                .replace(' ', "_"),
            message: self.to_string(),
            timestamp: format_date_time(Utc::now()),
        };

        (status, Json(body)).into_response()
    }
}

/// Status mapping for the error taxonomy
pub fn status_for(error: &ExploreError) -> StatusCode {
    match error {
        ExploreError::NotFound { .. } => StatusCode::NOT_FOUND,
        ExploreError::BusinessRuleViolation(_) | ExploreError::AlreadyExists(_) => {
            StatusCode::CONFLICT
        }
        ExploreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ExploreError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Common `from`/`size` pagination parameters
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_size() -> i64 {
    10
}

impl Pagination {
    /// Reject negative offsets and non-positive page sizes
    pub fn validate(&self) -> Result<(), ExploreError> {
        if self.from < 0 || self.size <= 0 {
            return Err(ExploreError::InvalidInput(
                "from must be >= 0 and size must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Comma-separated id list query parameter
pub fn parse_id_list(raw: Option<&str>) -> Result<Option<Vec<i64>>, ExploreError> {
    match raw {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .map_err(|_| ExploreError::InvalidInput(format!("Invalid id: '{part}'")))
            })
            .collect::<Result<Vec<i64>, _>>()
            .map(Some),
    }
}

/// Client address for view accounting: the first X-Forwarded-For hop when
/// present, else X-Real-IP, else the peer address of the connection.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| peer.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ExploreError::not_found("Event", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ExploreError::BusinessRuleViolation("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&ExploreError::AlreadyExists("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&ExploreError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ExploreError::ServiceUnavailable("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&ExploreError::Config("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list(None).unwrap(), None);
        assert_eq!(parse_id_list(Some("")).unwrap(), None);
        assert_eq!(parse_id_list(Some("1,2,3")).unwrap(), Some(vec![1, 2, 3]));
        assert_matches!(parse_id_list(Some("1,x")), Err(ExploreError::InvalidInput(_)));
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let peer: SocketAddr = "192.168.1.5:41000".parse().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "10.0.0.1, 10.0.0.2".parse().unwrap());
        headers.insert("x-real-ip", "10.0.0.9".parse().unwrap());
        assert_eq!(client_ip(&headers, peer), "10.0.0.1");

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "10.0.0.9".parse().unwrap());
        assert_eq!(client_ip(&headers, peer), "10.0.0.9");
    }

    #[test]
    fn test_client_ip_falls_back_to_peer_address() {
        let peer: SocketAddr = "192.168.1.5:41000".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), peer), "192.168.1.5");

        // Blank header values do not shadow the peer address
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "  ".parse().unwrap());
        assert_eq!(client_ip(&headers, peer), "192.168.1.5");
    }

    #[test]
    fn test_pagination_validation() {
        let ok = Pagination { from: 0, size: 10 };
        assert!(ok.validate().is_ok());
        let bad = Pagination { from: -1, size: 10 };
        assert!(bad.validate().is_err());
        let bad = Pagination { from: 0, size: 0 };
        assert!(bad.validate().is_err());
    }
}

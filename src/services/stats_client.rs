//! HTTP client for the stats collaborator
//!
//! The main service records view hits and fetches aggregated view counts
//! through this client. Read-path decoration is fail-soft: a stats outage
//! must never abort an event fetch.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::StatsConfig;
use crate::models::stats::{EndpointHitDto, ViewStats};
use crate::utils::datetime::format_date_time;
use crate::utils::errors::{ExploreError, Result};

#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
    app_name: String,
}

impl StatsClient {
    /// Create a new StatsClient instance
    pub fn new(config: &StatsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("ExploreWithMe/1.0")
            .build()
            .map_err(ExploreError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_name: config.app_name.clone(),
        })
    }

    /// Record a hit
    pub async fn save_hit(&self, hit: &EndpointHitDto) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/hit", self.base_url))
            .json(hit)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExploreError::ServiceUnavailable(format!(
                "Stats service rejected hit: {}",
                response.status()
            )));
        }

        debug!(app = %hit.app, uri = %hit.uri, "Hit saved");
        Ok(())
    }

    /// Fetch aggregated view counts over a time range
    pub async fn get_stats(
        &self,
        start: chrono::DateTime<Utc>,
        end: chrono::DateTime<Utc>,
        uris: &[String],
        unique: bool,
    ) -> Result<Vec<ViewStats>> {
        let mut query: Vec<(&str, String)> = vec![
            ("start", format_date_time(start)),
            ("end", format_date_time(end)),
            ("unique", unique.to_string()),
        ];
        if !uris.is_empty() {
            query.push(("uris", uris.join(",")));
        }

        let response = self
            .client
            .get(format!("{}/stats", self.base_url))
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExploreError::ServiceUnavailable(format!(
                "Stats service returned {}",
                response.status()
            )));
        }

        Ok(response.json::<Vec<ViewStats>>().await?)
    }

    /// Record a hit against an arbitrary uri. Fail-soft: failures are
    /// logged, never propagated to the serving flow.
    pub async fn record_hit(&self, uri: &str, ip: &str) {
        let hit = EndpointHitDto {
            app: self.app_name.clone(),
            uri: uri.to_string(),
            ip: ip.to_string(),
            timestamp: Utc::now(),
        };

        if let Err(e) = self.save_hit(&hit).await {
            warn!(uri = uri, error = %e, "Failed to record hit");
        }
    }

    /// Record a view of an event page
    pub async fn increment_view(&self, event_id: i64, ip: &str) {
        self.record_hit(&event_uri(event_id), ip).await;
    }

    /// View count for an event over the full recorded history, non-unique.
    /// Returns 0 when the stats service has no data or is unreachable.
    pub async fn get_views_for_event(&self, event_id: i64) -> i64 {
        let uri = event_uri(event_id);
        let now = Utc::now();
        // Far past to include all views
        let start = now - ChronoDuration::days(365 * 100);

        match self.get_stats(start, now, &[uri.clone()], false).await {
            Ok(stats) => stats
                .iter()
                .find(|stat| stat.uri == uri)
                .map(|stat| stat.hits)
                .unwrap_or(0),
            Err(e) => {
                warn!(event_id = event_id, error = %e, "Failed to fetch views, defaulting to 0");
                0
            }
        }
    }

    /// View counts for many events at once, missing entries defaulting to 0
    pub async fn get_views_for_events(&self, event_ids: &[i64]) -> Vec<i64> {
        if event_ids.is_empty() {
            return Vec::new();
        }

        let uris: Vec<String> = event_ids.iter().map(|id| event_uri(*id)).collect();
        let now = Utc::now();
        let start = now - ChronoDuration::days(365 * 100);

        match self.get_stats(start, now, &uris, false).await {
            Ok(stats) => uris
                .iter()
                .map(|uri| {
                    stats
                        .iter()
                        .find(|stat| &stat.uri == uri)
                        .map(|stat| stat.hits)
                        .unwrap_or(0)
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch views batch, defaulting to 0");
                vec![0; event_ids.len()]
            }
        }
    }
}

fn event_uri(event_id: i64) -> String {
    format!("/events/{event_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StatsClient {
        StatsClient::new(&StatsConfig {
            base_url: server.uri(),
            app_name: "explore-with-me".to_string(),
            timeout_seconds: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_hit_posts_to_hit_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hit"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let hit = EndpointHitDto {
            app: "explore-with-me".to_string(),
            uri: "/events/1".to_string(),
            ip: "10.0.0.1".to_string(),
            timestamp: Utc::now(),
        };
        client.save_hit(&hit).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_views_for_event_extracts_matching_uri() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {"app": "explore-with-me", "uri": "/events/7", "hits": 12}
        ]);
        Mock::given(method("GET"))
            .and(path("/stats"))
            .and(query_param("unique", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.get_views_for_event(7).await, 12);
    }

    #[tokio::test]
    async fn test_get_views_defaults_to_zero_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.get_views_for_event(99).await, 0);
    }

    #[tokio::test]
    async fn test_get_views_is_fail_soft_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.get_views_for_event(1).await, 0);
    }

    #[tokio::test]
    async fn test_increment_view_swallows_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hit"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        // Must not panic or propagate
        client.increment_view(1, "10.0.0.1").await;
    }
}

//! Stats aggregation service (server side)
//!
//! Records endpoint hits and serves aggregated view counts over a time range.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::database::repositories::StatsRepository;
use crate::models::stats::{EndpointHitDto, ViewStats};
use crate::utils::errors::{ExploreError, Result};

#[derive(Debug, Clone)]
pub struct StatsService {
    stats_repository: StatsRepository,
}

impl StatsService {
    /// Create a new StatsService instance
    pub fn new(stats_repository: StatsRepository) -> Self {
        Self { stats_repository }
    }

    /// Append an immutable hit fact
    pub async fn save_hit(&self, hit: &EndpointHitDto) -> Result<()> {
        validate_hit(hit)?;

        self.stats_repository
            .save(&hit.app, &hit.uri, &hit.ip, hit.timestamp)
            .await?;
        info!(app = %hit.app, uri = %hit.uri, "Hit saved");
        Ok(())
    }

    /// Aggregated hit counts per uri over [start, end], descending by count.
    /// `unique` deduplicates by source ip.
    pub async fn get_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        uris: &[String],
        unique: bool,
    ) -> Result<Vec<ViewStats>> {
        debug!(
            start = %start,
            end = %end,
            uris = uris.len(),
            unique = unique,
            "Requesting stats"
        );
        validate_range(start, end)?;

        let stats = self.stats_repository.find_stats(start, end, uris, unique).await?;
        debug!(entries = stats.len(), "Stats computed");
        Ok(stats)
    }
}

fn validate_hit(hit: &EndpointHitDto) -> Result<()> {
    if hit.app.trim().is_empty() || hit.uri.trim().is_empty() || hit.ip.trim().is_empty() {
        return Err(ExploreError::InvalidInput(
            "app, uri and ip must all be non-blank".to_string(),
        ));
    }
    Ok(())
}

fn validate_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if start > end {
        return Err(ExploreError::InvalidInput(
            "Start date cannot be after end date".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    #[test]
    fn test_validate_range_rejects_inverted() {
        let start = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_matches!(validate_range(start, end), Err(ExploreError::InvalidInput(_)));
        assert!(validate_range(end, start).is_ok());
    }

    #[test]
    fn test_validate_hit_rejects_blank_fields() {
        let mut hit = EndpointHitDto {
            app: "explore-with-me".to_string(),
            uri: "/events/1".to_string(),
            ip: "10.0.0.1".to_string(),
            timestamp: Utc::now(),
        };
        assert!(validate_hit(&hit).is_ok());

        hit.ip = "  ".to_string();
        assert_matches!(validate_hit(&hit), Err(ExploreError::InvalidInput(_)));
    }
}

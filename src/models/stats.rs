//! Stats service models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::datetime::serde_format;

/// Recorded endpoint hit, an append-only fact
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EndpointHit {
    pub id: i64,
    pub app: String,
    pub uri: String,
    pub ip: String,
    pub timestamp: DateTime<Utc>,
}

/// Wire representation of a hit to record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointHitDto {
    pub app: String,
    pub uri: String,
    pub ip: String,
    #[serde(with = "serde_format")]
    pub timestamp: DateTime<Utc>,
}

/// Aggregated view count for a single uri
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ViewStats {
    pub app: String,
    pub uri: String,
    pub hits: i64,
}

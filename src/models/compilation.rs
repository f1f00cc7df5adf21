//! Compilation model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::event::EventShort;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Compilation {
    pub id: i64,
    pub title: String,
    pub pinned: bool,
}

/// Wire representation carrying the embedded short events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationDto {
    pub id: i64,
    pub title: String,
    pub pinned: bool,
    pub events: Vec<EventShort>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompilationRequest {
    pub title: String,
    pub pinned: Option<bool>,
    pub events: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompilationRequest {
    pub title: Option<String>,
    pub pinned: Option<bool>,
    pub events: Option<Vec<i64>>,
}

/// Normalization applied before the uniqueness check on compilation titles:
/// case-insensitive, inner whitespace collapsed.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Best   Events "), "best events");
        assert_eq!(normalize_title("BEST EVENTS"), "best events");
        assert_eq!(normalize_title("best events"), "best events");
    }
}

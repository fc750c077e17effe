//! Snippet data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored snippet. Ids are assigned by the store; `usage_count` only ever
/// grows, via [`Database::increment_usage`](crate::db::Database).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    /// Comma-joined tag list.
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub usage_count: i64,
}

/// Input data for creating a snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetInput {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Option<String>,
}

/// Partial update for an existing snippet; absent fields keep their current
/// values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
}

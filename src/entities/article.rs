use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub const TABLE_NAME: &str = "article";

/// Minimal article row. Articles are managed elsewhere - the comment engine
/// only needs enough of them to validate that a comment target exists and is
/// published, and to seed data in tests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    pub id: Thing,
    pub title: String,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
}

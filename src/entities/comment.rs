use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub const TABLE_NAME: &str = "comment";

/// One persisted comment row. `parent` is a self-reference; `None` marks a
/// root comment attached directly to the article. Moderation only ever flips
/// `is_deleted` - `content` keeps the original text so restore can bring it
/// back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    pub id: Thing,
    pub belongs_to: Thing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Thing>,
    pub content: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct CreateComment {
    pub article: Thing,
    pub created_by: Option<String>,
    pub parent: Option<Thing>,
    pub content: String,
}

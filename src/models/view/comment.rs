use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use crate::entities::comment::Comment;
use crate::middleware::error::{AppError, AppResult};

/// What a deleted comment's body is replaced with on the way out. Stored
/// content is never touched - the substitution happens here, at the
/// serialization boundary.
pub const DELETED_CONTENT_PLACEHOLDER: &str = "[comment deleted]";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Thing,
    pub article_id: Thing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Thing>,
    pub content: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        let content = if comment.is_deleted {
            DELETED_CONTENT_PLACEHOLDER.to_string()
        } else {
            comment.content.clone()
        };
        Self {
            id: comment.id.clone(),
            article_id: comment.belongs_to.clone(),
            created_by: comment.created_by.clone(),
            parent_id: comment.parent.clone(),
            content,
            is_deleted: comment.is_deleted,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// One node of an assembled thread page. `replies` holds the eagerly loaded
/// children; `has_more` marks a truncated branch whose continuation is
/// reachable through `next_cursor` on the replies endpoint. A node the
/// assembler never got to probe (deadline hit) reports `replies_total = 0`
/// with `has_more = true`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: CommentView,
    pub replies: Vec<CommentNode>,
    pub replies_total: u64,
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentTreePage {
    pub comments: Vec<CommentNode>,
    pub roots_total: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepliesPage {
    pub replies: Vec<CommentNode>,
    pub replies_total: u64,
}

/// Continuation token for a truncated branch: which parent to resume under
/// and the child row offset to resume from. Opaque to clients.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyCursor {
    pub parent: String,
    pub start: u32,
}

impl ReplyCursor {
    pub fn encode(&self) -> AppResult<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(token: &str) -> AppResult<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| AppError::Validation {
            description: "invalid cursor".to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|_| AppError::Validation {
            description: "invalid cursor".to_string(),
        })
    }
}

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::database::client::Database;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppEventType {
    CommentCreated,
    CommentDeleted,
    CommentRestored,
}

/// Broadcast to in-process listeners whenever a comment changes. Carries ids
/// only, listeners re-fetch whatever detail they need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEvent {
    pub event: AppEventType,
    pub article_id: String,
    pub comment_id: String,
}

/// Tunables for the comment engine, resolved once at startup from env.
#[derive(Clone, Debug)]
pub struct CommentSettings {
    pub cooldown: chrono::Duration,
    pub node_budget: u32,
    pub reply_node_budget: u32,
    pub child_fetch_limit: u8,
    pub assembly_timeout: Duration,
    pub default_page_size: u8,
    pub max_page_size: u8,
}

impl CommentSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cooldown: chrono::Duration::seconds(config.comment_cooldown_secs as i64),
            node_budget: config.comment_node_budget as u32,
            reply_node_budget: config.reply_node_budget as u32,
            child_fetch_limit: config.child_fetch_limit,
            assembly_timeout: Duration::from_secs(config.assembly_timeout_secs),
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }
}

pub struct CtxState {
    pub db: Database,
    pub event_sender: broadcast::Sender<AppEvent>,
    pub settings: CommentSettings,
    pub is_development: bool,
}

impl Debug for CtxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CTX STATE HERE :)")
    }
}

pub fn create_ctx_state(db: Database, config: &AppConfig) -> Arc<CtxState> {
    let (event_sender, _) = broadcast::channel(100);
    Arc::new(CtxState {
        db,
        event_sender,
        settings: CommentSettings::from_config(config),
        is_development: config.is_development,
    })
}

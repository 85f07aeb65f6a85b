use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::entities::article::ArticleStatus;
use crate::middleware::error::AppResult;

/// What the comment engine needs to know about articles. `None` means the
/// article does not exist.
#[async_trait]
pub trait ArticlesRepositoryInterface: Send + Sync {
    async fn status(&self, id: &Thing) -> AppResult<Option<ArticleStatus>>;
}

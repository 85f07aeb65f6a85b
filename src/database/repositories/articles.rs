use std::sync::Arc;

use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::database::client::Db;
use crate::entities::article::{Article, ArticleStatus, TABLE_NAME};
use crate::interfaces::repositories::articles::ArticlesRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};

/// Collaborator store. Article publishing lives outside the comment engine;
/// this repository only answers "does this article exist and is it
/// published" and seeds rows for tests.
#[derive(Debug)]
pub struct ArticlesRepository {
    client: Arc<Db>,
}

impl ArticlesRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS title ON TABLE {TABLE_NAME} TYPE string ASSERT string::len(string::trim($value))>0;
    DEFINE FIELD IF NOT EXISTS status ON TABLE {TABLE_NAME} TYPE string DEFAULT 'published' ASSERT $value INSIDE ['draft', 'published'];
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    DEFINE FIELD IF NOT EXISTS updated_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE time::now();
    ");
        let mutation = self.client.query(sql).await?;

        mutation.check().expect("should mutate ArticlesRepository");

        Ok(())
    }

    pub async fn create(&self, title: &str, status: ArticleStatus) -> AppResult<Article> {
        let mut res = self
            .client
            .query(format!(
                "INSERT INTO {TABLE_NAME} {{ title: $title, status: $status }};"
            ))
            .bind(("title", title.to_string()))
            .bind(("status", status))
            .await?;

        let created = res.take::<Option<Article>>(0)?;
        created.ok_or(AppError::Generic {
            description: "article insert returned no record".to_string(),
        })
    }
}

#[async_trait]
impl ArticlesRepositoryInterface for ArticlesRepository {
    async fn status(&self, id: &Thing) -> AppResult<Option<ArticleStatus>> {
        if id.tb != TABLE_NAME {
            return Ok(None);
        }
        let article: Option<Article> = self.client.select((TABLE_NAME, id.id.to_raw())).await?;
        Ok(article.map(|a| a.status))
    }
}

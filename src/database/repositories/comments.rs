use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use surrealdb::sql::Thing;
use tokio::time::timeout;

use crate::database::client::Db;
use crate::entities::article::TABLE_NAME as ARTICLE_TABLE_NAME;
use crate::entities::comment::{Comment, CreateComment, TABLE_NAME};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::utils::db_utils::{Pagination, QryOrder};

/// Store for comment rows. Every multi-row query runs under `query_timeout`
/// so a pathological thread cannot stall a request indefinitely; expiry
/// surfaces as [`AppError::QueryTimeout`].
#[derive(Debug)]
pub struct CommentsRepository {
    client: Arc<Db>,
    query_timeout: Duration,
}

impl CommentsRepository {
    pub fn new(client: Arc<Db>, query_timeout: Duration) -> Self {
        Self {
            client,
            query_timeout,
        }
    }

    pub(in crate::database) async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS belongs_to ON TABLE {TABLE_NAME} TYPE record<{ARTICLE_TABLE_NAME}>;
    DEFINE INDEX IF NOT EXISTS belongs_to_idx ON TABLE {TABLE_NAME} COLUMNS belongs_to;
    DEFINE FIELD IF NOT EXISTS created_by ON TABLE {TABLE_NAME} TYPE option<string>;
    DEFINE INDEX IF NOT EXISTS created_by_idx ON TABLE {TABLE_NAME} COLUMNS created_by;
    DEFINE FIELD IF NOT EXISTS parent ON TABLE {TABLE_NAME} TYPE option<record<{TABLE_NAME}>>;
    DEFINE INDEX IF NOT EXISTS parent_idx ON TABLE {TABLE_NAME} COLUMNS parent;
    DEFINE FIELD IF NOT EXISTS content ON TABLE {TABLE_NAME} TYPE string ASSERT string::len(string::trim($value))>0;
    DEFINE FIELD IF NOT EXISTS is_deleted ON TABLE {TABLE_NAME} TYPE bool DEFAULT false;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    DEFINE FIELD IF NOT EXISTS updated_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE time::now();
    ");
        let mutation = self.client.query(sql).await?;

        mutation.check().expect("should mutate CommentsRepository");

        Ok(())
    }

    pub async fn create(&self, record: CreateComment) -> AppResult<Comment> {
        let mut fields = vec!["belongs_to: $article", "content: $content"];
        if record.created_by.is_some() {
            fields.push("created_by: $user");
        }
        if record.parent.is_some() {
            fields.push("parent: $parent");
        }
        let sql = format!("INSERT INTO {TABLE_NAME} {{ {} }};", fields.join(", "));

        let mut qry = self
            .client
            .query(sql)
            .bind(("article", record.article))
            .bind(("content", record.content));
        if let Some(user) = record.created_by {
            qry = qry.bind(("user", user));
        }
        if let Some(parent) = record.parent {
            qry = qry.bind(("parent", parent));
        }

        let created = qry.await?.take::<Option<Comment>>(0)?;
        created.ok_or(AppError::Generic {
            description: "comment insert returned no record".to_string(),
        })
    }

    pub async fn get_by_id(&self, id: &Thing) -> AppResult<Comment> {
        if id.tb != TABLE_NAME {
            return Err(AppError::EntityFailIdNotFound {
                ident: id.to_raw(),
            });
        }
        let data: Option<Comment> = self.client.select((TABLE_NAME, id.id.to_raw())).await?;
        data.ok_or(AppError::EntityFailIdNotFound {
            ident: id.to_raw(),
        })
    }

    /// Non-deleted root comments of an article, newest-first, plus the total
    /// root count. Ties on `created_at` break on `id` to keep pagination
    /// deterministic under concurrent inserts.
    pub async fn get_root_page(
        &self,
        article: &Thing,
        pagination: Pagination,
    ) -> AppResult<(Vec<Comment>, u64)> {
        let order = QryOrder::DESC;
        let filter = "belongs_to = $article AND parent IS NONE AND is_deleted = false";
        let count_sql = format!(
            "(SELECT count() as count FROM ONLY {TABLE_NAME} WHERE {filter} GROUP ALL).count;"
        );
        let list_sql = format!(
            "SELECT * FROM {TABLE_NAME} WHERE {filter} ORDER BY created_at {order}, id {order} LIMIT $limit START $start;"
        );
        let article = article.clone();

        self.with_timeout(async move {
            let mut res = self
                .client
                .query(count_sql)
                .query(list_sql)
                .bind(("article", article))
                .bind(("limit", pagination.count as i64))
                .bind(("start", pagination.start as i64))
                .await?;
            let total = res.take::<Option<u64>>(0)?.unwrap_or(0);
            let rows = res.take::<Vec<Comment>>(1)?;
            Ok((rows, total))
        })
        .await
    }

    /// Direct children of a comment, oldest-first, plus the total child
    /// count. Children of a deleted parent stay reachable, so the tree
    /// assembler always asks for deleted rows too and presents them as
    /// placeholders further up the stack.
    pub async fn get_child_page(
        &self,
        parent: &Thing,
        pagination: Pagination,
        include_deleted: bool,
    ) -> AppResult<(Vec<Comment>, u64)> {
        let order = QryOrder::ASC;
        let filter = child_filter(include_deleted);
        let count_sql = format!(
            "(SELECT count() as count FROM ONLY {TABLE_NAME} WHERE {filter} GROUP ALL).count;"
        );
        let list_sql = format!(
            "SELECT * FROM {TABLE_NAME} WHERE {filter} ORDER BY created_at {order}, id {order} LIMIT $limit START $start;"
        );
        let parent = parent.clone();

        self.with_timeout(async move {
            let mut res = self
                .client
                .query(count_sql)
                .query(list_sql)
                .bind(("parent", parent))
                .bind(("limit", pagination.count as i64))
                .bind(("start", pagination.start as i64))
                .await?;
            let total = res.take::<Option<u64>>(0)?.unwrap_or(0);
            let rows = res.take::<Vec<Comment>>(1)?;
            Ok((rows, total))
        })
        .await
    }

    pub async fn count_children(&self, parent: &Thing, include_deleted: bool) -> AppResult<u64> {
        let filter = child_filter(include_deleted);
        let count_sql = format!(
            "(SELECT count() as count FROM ONLY {TABLE_NAME} WHERE {filter} GROUP ALL).count;"
        );
        let parent = parent.clone();

        self.with_timeout(async move {
            let mut res = self
                .client
                .query(count_sql)
                .bind(("parent", parent))
                .await?;
            Ok(res.take::<Option<u64>>(0)?.unwrap_or(0))
        })
        .await
    }

    /// Most recent comment by a user across all articles. `Ok(None)` means
    /// the user has no comment history - callers treat that as "not rate
    /// limited", the existence-probe pattern.
    pub async fn get_last_by_user(&self, user_id: &str) -> AppResult<Option<Comment>> {
        let order = QryOrder::DESC;
        let sql = format!(
            "SELECT * FROM {TABLE_NAME} WHERE created_by = $user ORDER BY created_at {order}, id {order} LIMIT 1;"
        );
        let user_id = user_id.to_string();

        self.with_timeout(async move {
            let mut res = self.client.query(sql).bind(("user", user_id)).await?;
            Ok(res.take::<Option<Comment>>(0)?)
        })
        .await
    }

    /// Idempotent soft-delete flag flip. `UPDATE` on a missing record
    /// matches nothing, which maps to `NotFound`.
    pub async fn set_deleted(&self, id: &Thing, deleted: bool) -> AppResult<Comment> {
        if id.tb != TABLE_NAME {
            return Err(AppError::EntityFailIdNotFound {
                ident: id.to_raw(),
            });
        }
        let mut res = self
            .client
            .query("UPDATE $id SET is_deleted = $deleted;")
            .bind(("id", id.clone()))
            .bind(("deleted", deleted))
            .await?;
        res.take::<Option<Comment>>(0)?
            .ok_or(AppError::EntityFailIdNotFound {
                ident: id.to_raw(),
            })
    }

    async fn with_timeout<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match timeout(self.query_timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(AppError::QueryTimeout),
        }
    }
}

fn child_filter(include_deleted: bool) -> &'static str {
    if include_deleted {
        "parent = $parent"
    } else {
        "parent = $parent AND is_deleted = false"
    }
}

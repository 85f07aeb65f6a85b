use std::time::Instant;

use serde::Deserialize;
use tokio::sync::broadcast;
use validator::Validate;

use crate::database::repositories::comments::CommentsRepository;
use crate::entities::article::ArticleStatus;
use crate::entities::comment::CreateComment;
use crate::interfaces::repositories::articles::ArticlesRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::mw_ctx::{AppEvent, AppEventType, CommentSettings};
use crate::middleware::utils::db_utils::Pagination;
use crate::middleware::utils::string_utils::get_str_thing;
use crate::models::view::comment::{CommentTreePage, CommentView, RepliesPage};
use crate::services::rate_limiter::RateLimiter;
use crate::services::tree_assembler::TreeAssembler;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "content must be between 1 and 5000 characters"
    ))]
    pub content: String,
    pub parent_id: Option<String>,
}

pub struct CommentService<'a, A: ArticlesRepositoryInterface> {
    comments: &'a CommentsRepository,
    articles: &'a A,
    event_sender: &'a broadcast::Sender<AppEvent>,
    settings: &'a CommentSettings,
}

impl<'a, A: ArticlesRepositoryInterface> CommentService<'a, A> {
    pub fn new(
        comments: &'a CommentsRepository,
        articles: &'a A,
        event_sender: &'a broadcast::Sender<AppEvent>,
        settings: &'a CommentSettings,
    ) -> Self {
        Self {
            comments,
            articles,
            event_sender,
            settings,
        }
    }

    pub async fn create(
        &self,
        article_id: &str,
        created_by: Option<String>,
        input: CreateCommentInput,
    ) -> AppResult<CommentView> {
        input.validate()?;
        if input.content.trim().is_empty() {
            return Err(AppError::Validation {
                description: "content must not be blank".to_string(),
            });
        }

        let article = get_str_thing(article_id)?;
        match self.articles.status(&article).await? {
            None => {
                return Err(AppError::EntityFailIdNotFound {
                    ident: article_id.to_string(),
                })
            }
            Some(ArticleStatus::Draft) => {
                return Err(AppError::Validation {
                    description: "article is not published".to_string(),
                })
            }
            Some(ArticleStatus::Published) => (),
        }

        let parent = match &input.parent_id {
            Some(parent_id) => {
                let parent_thing = get_str_thing(parent_id)?;
                let parent = self.comments.get_by_id(&parent_thing).await?;
                if parent.belongs_to != article {
                    return Err(AppError::Validation {
                        description: "parent comment belongs to a different article".to_string(),
                    });
                }
                Some(parent.id)
            }
            None => None,
        };

        if let Some(user_id) = &created_by {
            RateLimiter::new(self.comments, self.settings.cooldown)
                .check_user(user_id)
                .await?;
        }

        let created = self
            .comments
            .create(CreateComment {
                article,
                created_by,
                parent,
                content: input.content,
            })
            .await?;

        self.emit(AppEventType::CommentCreated, &created.belongs_to, &created.id);
        Ok(CommentView::from(&created))
    }

    pub async fn get_article_tree(
        &self,
        article_id: &str,
        pagination: Pagination,
    ) -> AppResult<CommentTreePage> {
        let article = get_str_thing(article_id)?;
        if self.articles.status(&article).await?.is_none() {
            return Err(AppError::EntityFailIdNotFound {
                ident: article_id.to_string(),
            });
        }

        let (roots, roots_total) = self.comments.get_root_page(&article, pagination).await?;
        let nodes = self
            .assembler()
            .assemble(&roots, self.settings.node_budget)
            .await?;
        Ok(CommentTreePage {
            comments: nodes,
            roots_total,
        })
    }

    pub async fn get_replies(
        &self,
        comment_id: &str,
        pagination: Pagination,
    ) -> AppResult<RepliesPage> {
        let parent = get_str_thing(comment_id)?;
        let parent = self.comments.get_by_id(&parent).await?;

        let (children, replies_total) = self
            .comments
            .get_child_page(&parent.id, pagination, true)
            .await?;
        let nodes = self
            .assembler()
            .assemble(&children, self.settings.reply_node_budget)
            .await?;
        Ok(RepliesPage {
            replies: nodes,
            replies_total,
        })
    }

    pub async fn delete(&self, comment_id: &str) -> AppResult<CommentView> {
        self.set_deleted(comment_id, true, AppEventType::CommentDeleted)
            .await
    }

    pub async fn restore(&self, comment_id: &str) -> AppResult<CommentView> {
        self.set_deleted(comment_id, false, AppEventType::CommentRestored)
            .await
    }

    async fn set_deleted(
        &self,
        comment_id: &str,
        deleted: bool,
        event: AppEventType,
    ) -> AppResult<CommentView> {
        let thing = get_str_thing(comment_id)?;
        let updated = self.comments.set_deleted(&thing, deleted).await?;
        self.emit(event, &updated.belongs_to, &updated.id);
        Ok(CommentView::from(&updated))
    }

    fn assembler(&self) -> TreeAssembler<'_> {
        TreeAssembler::new(
            self.comments,
            self.settings.child_fetch_limit,
            Instant::now() + self.settings.assembly_timeout,
        )
    }

    fn emit(&self, event: AppEventType, article: &surrealdb::sql::Thing, comment: &surrealdb::sql::Thing) {
        let _ = self.event_sender.send(AppEvent {
            event,
            article_id: article.to_string(),
            comment_id: comment.to_string(),
        });
    }
}

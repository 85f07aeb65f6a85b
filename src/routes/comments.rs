use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::mw_ctx::CtxState;
use crate::middleware::user_identity::UserIdentity;
use crate::middleware::utils::db_utils::Pagination;
use crate::middleware::utils::string_utils::get_str_thing;
use crate::models::view::comment::ReplyCursor;
use crate::services::comment_service::{CommentService, CreateCommentInput};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route(
            "/api/articles/:article_id/comments",
            post(create_comment).get(get_article_comments),
        )
        .route("/api/comments/:comment_id/replies", get(get_replies))
        .route("/api/comments/:comment_id", delete(delete_comment))
        .route("/api/comments/:comment_id/restore", post(restore_comment))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u8>,
    cursor: Option<String>,
}

impl ListQuery {
    fn clamped_limit(&self, state: &CtxState) -> u8 {
        self.limit
            .unwrap_or(state.settings.default_page_size)
            .clamp(1, state.settings.max_page_size)
    }

    fn pagination(&self, state: &CtxState) -> Pagination {
        Pagination::from_page(self.page.unwrap_or(1), self.clamped_limit(state))
    }
}

async fn create_comment(
    State(state): State<Arc<CtxState>>,
    Path(article_id): Path<String>,
    UserIdentity(user_id): UserIdentity,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<impl IntoResponse> {
    let service = comment_service(&state);
    let view = service.create(&article_id, user_id, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_article_comments(
    State(state): State<Arc<CtxState>>,
    Path(article_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = query.pagination(&state);
    let service = comment_service(&state);
    let page = service.get_article_tree(&article_id, pagination).await?;
    Ok(Json(page))
}

async fn get_replies(
    State(state): State<Arc<CtxState>>,
    Path(comment_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = match &query.cursor {
        Some(token) => {
            let cursor = ReplyCursor::decode(token)?;
            let parent = get_str_thing(&comment_id)?;
            if cursor.parent != parent.to_string() {
                return Err(AppError::Validation {
                    description: "cursor does not belong to this comment".to_string(),
                });
            }
            Pagination {
                start: cursor.start,
                count: query.clamped_limit(&state),
            }
        }
        None => query.pagination(&state),
    };
    let service = comment_service(&state);
    let page = service.get_replies(&comment_id, pagination).await?;
    Ok(Json(page))
}

async fn delete_comment(
    State(state): State<Arc<CtxState>>,
    Path(comment_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = comment_service(&state);
    let view = service.delete(&comment_id).await?;
    Ok(Json(view))
}

async fn restore_comment(
    State(state): State<Arc<CtxState>>,
    Path(comment_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = comment_service(&state);
    let view = service.restore(&comment_id).await?;
    Ok(Json(view))
}

fn comment_service(
    state: &CtxState,
) -> CommentService<'_, crate::database::repositories::articles::ArticlesRepository> {
    CommentService::new(
        &state.db.comments,
        &state.db.articles,
        &state.event_sender,
        &state.settings,
    )
}

use std::sync::Arc;

use axum_test::{TestResponse, TestServer};
use comment_server::entities::article::{Article, ArticleStatus};
use comment_server::middleware::mw_ctx::CtxState;
use comment_server::models::view::comment::CommentView;
use fake::{faker, Fake};
use serde_json::json;

#[allow(dead_code)]
pub async fn seed_article(ctx_state: &Arc<CtxState>, status: ArticleStatus) -> Article {
    let title: String = faker::lorem::en::Sentence(3..6).fake();
    ctx_state
        .db
        .articles
        .create(&title, status)
        .await
        .expect("article seeded")
}

#[allow(dead_code)]
pub async fn send_comment(
    server: &TestServer,
    article_id: &str,
    parent_id: Option<&str>,
    user_id: Option<&str>,
    content: &str,
) -> TestResponse {
    let mut body = json!({ "content": content });
    if let Some(parent) = parent_id {
        body["parent_id"] = json!(parent);
    }
    let mut request = server
        .post(format!("/api/articles/{article_id}/comments").as_str())
        .json(&body)
        .add_header("Accept", "application/json");
    if let Some(user) = user_id {
        request = request.add_header("X-User-Id", user);
    }
    request.await
}

#[allow(dead_code)]
pub async fn create_comment(
    server: &TestServer,
    article_id: &str,
    parent_id: Option<&str>,
    user_id: Option<&str>,
    content: &str,
) -> CommentView {
    let response = send_comment(server, article_id, parent_id, user_id, content).await;
    response.assert_status_success();
    response.json::<CommentView>()
}

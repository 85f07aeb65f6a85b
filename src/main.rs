use std::time::Duration;

use comment_server::config::AppConfig;
use comment_server::database::client::{Database, DbConfig};
use comment_server::middleware::error::AppResult;
use comment_server::middleware::mw_ctx;
use comment_server::init;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let db = Database::connect(
        DbConfig {
            url: &config.db_url,
            database: &config.db_database,
            namespace: &config.db_namespace,
            username: config.db_username.as_deref(),
            password: config.db_password.as_deref(),
        },
        Duration::from_secs(config.db_query_timeout_secs),
    )
    .await;

    db.run_migrations().await?;

    let ctx_state = mw_ctx::create_ctx_state(db, &config);
    let routes_all = init::main_router(&ctx_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .expect("Failed to bind address");
    info!("->> LISTENING on {}\n", config.bind_address);

    axum::serve(listener, routes_all.into_make_service())
        .await
        .expect("Failed to start server");

    Ok(())
}

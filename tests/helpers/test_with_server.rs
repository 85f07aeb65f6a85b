#[macro_export]
macro_rules! test_with_server {
    ($name:ident, |$server:ident, $ctx_state:ident, $config:ident| $body:block) => {
        $crate::test_with_server!($name, {}, |$server, $ctx_state, $config| $body);
    };
    ($name:ident, {$($field:ident: $value:expr),* $(,)?}, |$server:ident, $ctx_state:ident, $config:ident| $body:block) => {

        #[tokio::test(flavor="multi_thread")]
        #[serial_test::serial]
        async fn $name() {
            use axum_test::{TestServer, TestServerConfig};
            use comment_server::config::AppConfig;
            use comment_server::database::client::{Database, DbConfig};
            use comment_server::middleware::mw_ctx::create_ctx_state;
            use futures::FutureExt;
            use std::panic::resume_unwind;

            #[allow(unused_mut)]
            let mut $config = AppConfig {
                db_namespace: "test".to_string(),
                db_database: "test".to_string(),
                db_password: None,
                db_username: None,
                db_url: "mem://".to_string(),
                bind_address: "127.0.0.1:0".to_string(),
                is_development: true,
                comment_cooldown_secs: 30,
                comment_node_budget: 500,
                reply_node_budget: 50,
                child_fetch_limit: 100,
                db_query_timeout_secs: 5,
                assembly_timeout_secs: 10,
                default_page_size: 10,
                max_page_size: 100,
            };
            $($config.$field = $value;)*

            let $ctx_state = {
                let db = Database::connect(
                    DbConfig {
                        url: &$config.db_url,
                        database: &$config.db_database,
                        namespace: &$config.db_namespace,
                        password: $config.db_password.as_deref(),
                        username: $config.db_username.as_deref(),
                    },
                    std::time::Duration::from_secs($config.db_query_timeout_secs),
                )
                .await;

                db.run_migrations().await.unwrap();
                create_ctx_state(db, &$config)
            };

            let routes_all = comment_server::init::main_router(&$ctx_state);

            let $server = TestServer::new_with_config(
                routes_all,
                TestServerConfig {
                    transport: None,
                    save_cookies: true,
                    expect_success_by_default: false,
                    restrict_requests_with_http_schema: false,
                    default_content_type: None,
                    default_scheme: None,
                },
            )
            .expect("Failed to create test server");

            let test_result = std::panic::AssertUnwindSafe(async {
                (|| async $body)().await;
            })
            .catch_unwind()
            .await;

            $ctx_state.clone().db.client
                .query(format!("REMOVE DATABASE {};", $config.db_database))
                .await
                .expect("failed to remove database");

            if let Err(panic) = test_result {
                resume_unwind(panic);
            }
        }
    };
}

#[derive(Debug)]
pub struct AppConfig {
    pub db_namespace: String,
    pub db_database: String,
    pub db_password: Option<String>,
    pub db_username: Option<String>,
    pub db_url: String,
    pub bind_address: String,
    pub is_development: bool,
    pub comment_cooldown_secs: u32,
    pub comment_node_budget: usize,
    pub reply_node_budget: usize,
    pub child_fetch_limit: u8,
    pub db_query_timeout_secs: u64,
    pub assembly_timeout_secs: u64,
    pub default_page_size: u8,
    pub max_page_size: u8,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let db_namespace = std::env::var("DB_NAMESPACE").unwrap_or("namespace".to_string());
        let db_database = std::env::var("DB_DATABASE").unwrap_or("database".to_string());
        let db_password = std::env::var("DB_PASSWORD").ok();
        let db_username = std::env::var("DB_USERNAME").ok();
        let db_url = std::env::var("DB_URL").expect("Missing DB_URL in env");

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or("0.0.0.0:8080".to_string());

        let is_development = std::env::var("DEVELOPMENT")
            .map(|v| v.eq("true"))
            .unwrap_or(false);

        let comment_cooldown_secs = std::env::var("COMMENT_COOLDOWN_SECS").map_or(30, |t| {
            t.parse::<u32>().expect("COMMENT_COOLDOWN_SECS must be number")
        });

        let comment_node_budget = std::env::var("COMMENT_NODE_BUDGET").map_or(500, |t| {
            t.parse::<usize>().expect("COMMENT_NODE_BUDGET must be number")
        });

        let reply_node_budget = std::env::var("REPLY_NODE_BUDGET").map_or(50, |t| {
            t.parse::<usize>().expect("REPLY_NODE_BUDGET must be number")
        });

        let child_fetch_limit = std::env::var("CHILD_FETCH_LIMIT").map_or(100, |t| {
            t.parse::<u8>().expect("CHILD_FETCH_LIMIT must be number")
        });

        let db_query_timeout_secs = std::env::var("DB_QUERY_TIMEOUT_SECS").map_or(5, |t| {
            t.parse::<u64>().expect("DB_QUERY_TIMEOUT_SECS must be number")
        });

        let assembly_timeout_secs = std::env::var("COMMENT_ASSEMBLY_TIMEOUT_SECS").map_or(10, |t| {
            t.parse::<u64>()
                .expect("COMMENT_ASSEMBLY_TIMEOUT_SECS must be number")
        });

        let default_page_size = std::env::var("DEFAULT_PAGE_SIZE").map_or(10, |t| {
            t.parse::<u8>().expect("DEFAULT_PAGE_SIZE must be number")
        });

        let max_page_size = std::env::var("MAX_PAGE_SIZE").map_or(100, |t| {
            t.parse::<u8>().expect("MAX_PAGE_SIZE must be number")
        });

        Self {
            db_namespace,
            db_database,
            db_password,
            db_username,
            db_url,
            bind_address,
            is_development,
            comment_cooldown_secs,
            comment_node_budget,
            reply_node_budget,
            child_fetch_limit,
            db_query_timeout_secs,
            assembly_timeout_secs,
            default_page_size,
            max_page_size,
        }
    }
}

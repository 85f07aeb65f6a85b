pub mod error;
pub mod mw_ctx;
pub mod user_identity;
pub mod utils;

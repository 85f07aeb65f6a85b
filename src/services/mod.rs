pub mod comment_service;
pub mod rate_limiter;
pub mod tree_assembler;

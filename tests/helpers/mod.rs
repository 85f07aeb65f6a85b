pub mod comment_helpers;
pub mod test_with_server;

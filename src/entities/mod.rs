pub mod article;
pub mod comment;

pub mod article_service;
pub mod comment_service;

pub use article_service::ArticleService;
pub use comment_service::CommentService;

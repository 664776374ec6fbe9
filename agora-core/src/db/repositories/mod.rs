pub mod article_repository;
pub mod comment_repository;
pub mod hashtag_repository;
pub mod user_account_repository;

pub use article_repository::ArticleRepository;
pub use comment_repository::CommentRepository;
pub use hashtag_repository::HashtagRepository;
pub use user_account_repository::UserAccountRepository;

use chrono::{DateTime, Utc};

/// Parse an RFC3339 column value, surfacing bad data as a conversion error
/// instead of panicking inside a row mapper.
pub(crate) fn parse_datetime(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a stored uuid column value.
pub(crate) fn parse_uuid(idx: usize, raw: String) -> rusqlite::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Placeholder list for a dynamic `IN (...)` clause.
pub(crate) fn in_placeholders(count: usize) -> String {
    std::iter::repeat("?").take(count).collect::<Vec<_>>().join(", ")
}

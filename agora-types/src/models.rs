use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

/// A registered board member. `user_id` is the login handle and primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: String,
    pub email: String,
    pub nickname: String,
    pub memo: Option<String>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub user_id: String,
    pub user_nickname: String,
    pub title: String,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    /// Hashtag names attached to this article, filled in by the storage layer
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// Partial update for an article. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub article_id: Uuid,
    pub user_id: String,
    pub user_nickname: String,
    /// Parent comment for threaded replies (None for top-level comments)
    #[serde(default)]
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

impl Hashtag {
    /// Construct a record that has not been persisted yet. The id is
    /// assigned here and becomes durable once the storage layer saves it.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// An article together with its comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleWithComments {
    pub article: Article,
    pub comments: Vec<Comment>,
}

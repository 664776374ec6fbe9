//! Comment management for article threads.

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use agora_types::Comment;

use crate::db::repositories::{ArticleRepository, CommentRepository, UserAccountRepository};
use crate::db::Database;

pub struct CommentService {
    articles: ArticleRepository,
    comments: CommentRepository,
    users: UserAccountRepository,
}

impl CommentService {
    pub fn new(db: &Database) -> Self {
        Self {
            articles: ArticleRepository::new(db.pool.clone()),
            comments: CommentRepository::new(db.pool.clone()),
            users: UserAccountRepository::new(db.pool.clone()),
        }
    }

    /// All comments on an article, in thread order
    pub fn search_comments(&self, article_id: &Uuid) -> Result<Vec<Comment>> {
        self.comments.find_by_article(article_id)
    }

    /// Add a comment, or a threaded reply when `parent_comment_id` is given.
    ///
    /// Returns `None` when the article, author, or parent comment does not
    /// exist; the request is logged and discarded.
    pub fn save_comment(
        &self,
        article_id: &Uuid,
        user_id: &str,
        content: &str,
        parent_comment_id: Option<Uuid>,
    ) -> Result<Option<Comment>> {
        if self.articles.get_by_id(article_id)?.is_none() {
            tracing::warn!(%article_id, "comment save failed: no such article");
            return Ok(None);
        }
        let Some(account) = self.users.get(user_id)? else {
            tracing::warn!(user_id, "comment save failed: no such user account");
            return Ok(None);
        };
        if let Some(parent_id) = parent_comment_id {
            match self.comments.get_by_id(&parent_id)? {
                Some(parent) if parent.article_id == *article_id => {}
                Some(_) => {
                    tracing::warn!(%parent_id, "comment save failed: parent belongs to another article");
                    return Ok(None);
                }
                None => {
                    tracing::warn!(%parent_id, "comment save failed: no such parent comment");
                    return Ok(None);
                }
            }
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            article_id: *article_id,
            user_id: account.user_id,
            user_nickname: account.nickname,
            parent_comment_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.comments.create(&comment)?;
        Ok(Some(comment))
    }

    /// Replace a comment's content. A missing comment is logged and ignored.
    pub fn update_comment(&self, comment_id: &Uuid, content: &str) -> Result<()> {
        if !self.comments.update_content(comment_id, content)? {
            tracing::warn!(%comment_id, "comment update failed: no such comment");
        }
        Ok(())
    }

    /// Delete a comment (author-scoped). Returns true when removed.
    pub fn delete_comment(&self, comment_id: &Uuid, user_id: &str) -> Result<bool> {
        self.comments.delete_by_id_and_user(comment_id, user_id)
    }
}

use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use agora_types::Comment;

use super::{parse_datetime, parse_uuid};
use crate::db::DbPool;

const SELECT_COLUMNS: &str =
    "c.id, c.article_id, c.user_id, u.nickname, c.parent_comment_id, c.content, c.created_at";

pub struct CommentRepository {
    pool: DbPool,
}

impl CommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new comment
    pub fn create(&self, comment: &Comment) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO comments (id, article_id, user_id, parent_comment_id, content, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                comment.id.to_string(),
                comment.article_id.to_string(),
                &comment.user_id,
                comment.parent_comment_id.map(|id| id.to_string()),
                &comment.content,
                comment.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create comment")?;
        Ok(())
    }

    /// Get a single comment by id
    pub fn get_by_id(&self, comment_id: &Uuid) -> Result<Option<Comment>> {
        let conn = self.pool.get()?;
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM comments c
             JOIN user_accounts u ON c.user_id = u.user_id
             WHERE c.id = ?"
        );
        let mut stmt = conn.prepare(&query)?;

        let comment = stmt
            .query_row([comment_id.to_string()], map_comment_row)
            .optional()?;

        Ok(comment)
    }

    /// All comments on an article, oldest first (thread order)
    pub fn find_by_article(&self, article_id: &Uuid) -> Result<Vec<Comment>> {
        let conn = self.pool.get()?;
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM comments c
             JOIN user_accounts u ON c.user_id = u.user_id
             WHERE c.article_id = ?
             ORDER BY c.created_at ASC, c.rowid ASC"
        );
        let mut stmt = conn.prepare(&query)?;

        let comments = stmt
            .query_map([article_id.to_string()], map_comment_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    /// Replace a comment's content. Returns false when the comment is missing.
    pub fn update_content(&self, comment_id: &Uuid, content: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let changed = conn
            .execute(
                "UPDATE comments SET content = ? WHERE id = ?",
                (content, comment_id.to_string()),
            )
            .context("Failed to update comment")?;
        Ok(changed > 0)
    }

    /// Delete a comment only if it belongs to `user_id`.
    /// Child replies cascade with it.
    pub fn delete_by_id_and_user(&self, comment_id: &Uuid, user_id: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let deleted = conn
            .execute(
                "DELETE FROM comments WHERE id = ? AND user_id = ?",
                (comment_id.to_string(), user_id),
            )
            .context("Failed to delete comment")?;
        Ok(deleted > 0)
    }
}

fn map_comment_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    let parent_raw: Option<String> = row.get(4)?;
    let parent_comment_id = match parent_raw {
        Some(raw) => Some(parse_uuid(4, raw)?),
        None => None,
    };

    Ok(Comment {
        id: parse_uuid(0, row.get::<_, String>(0)?)?,
        article_id: parse_uuid(1, row.get::<_, String>(1)?)?,
        user_id: row.get(2)?,
        user_nickname: row.get(3)?,
        parent_comment_id,
        content: row.get(5)?,
        created_at: parse_datetime(6, row.get::<_, String>(6)?)?,
    })
}

use anyhow::{Context, Result};
use rusqlite::{params_from_iter, OptionalExtension, Row};
use uuid::Uuid;

use agora_types::{Article, ArticleUpdate, Page, PageRequest};

use super::{in_placeholders, parse_datetime, parse_uuid};
use crate::db::{DbConnection, DbPool};

const SELECT_COLUMNS: &str = "a.id, a.user_id, u.nickname, a.title, a.content, a.created_at";
const FROM_JOINED: &str = "FROM articles a JOIN user_accounts u ON a.user_id = u.user_id";

pub struct ArticleRepository {
    pool: DbPool,
}

impl ArticleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new article
    pub fn create(&self, article: &Article) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO articles (id, user_id, title, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                article.id.to_string(),
                &article.user_id,
                &article.title,
                &article.content,
                article.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create article")?;
        Ok(())
    }

    /// Get a single article by id, with author nickname and hashtags
    pub fn get_by_id(&self, article_id: &Uuid) -> Result<Option<Article>> {
        let conn = self.pool.get()?;
        let query = format!("SELECT {SELECT_COLUMNS} {FROM_JOINED} WHERE a.id = ?");
        let mut stmt = conn.prepare(&query)?;

        let article = stmt
            .query_row([article_id.to_string()], map_article_row)
            .optional()?;

        match article {
            Some(mut article) => {
                fill_hashtags(&conn, std::slice::from_mut(&mut article))?;
                Ok(Some(article))
            }
            None => Ok(None),
        }
    }

    /// Patch title and/or content. Returns false when the article is missing.
    pub fn update_fields(&self, article_id: &Uuid, update: &ArticleUpdate) -> Result<bool> {
        let conn = self.pool.get()?;

        let mut changed = 0;
        if let Some(title) = &update.title {
            changed += conn
                .execute(
                    "UPDATE articles SET title = ? WHERE id = ?",
                    (title, article_id.to_string()),
                )
                .context("Failed to update article title")?;
        }
        if let Some(content) = &update.content {
            changed += conn
                .execute(
                    "UPDATE articles SET content = ? WHERE id = ?",
                    (content, article_id.to_string()),
                )
                .context("Failed to update article content")?;
        }

        Ok(changed > 0 || (update.title.is_none() && update.content.is_none()))
    }

    /// Delete an article only if it belongs to `user_id`.
    /// Returns true when a row was removed.
    pub fn delete_by_id_and_user(&self, article_id: &Uuid, user_id: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let deleted = conn
            .execute(
                "DELETE FROM articles WHERE id = ? AND user_id = ?",
                (article_id.to_string(), user_id),
            )
            .context("Failed to delete article")?;
        Ok(deleted > 0)
    }

    /// Total number of articles on the board
    pub fn count(&self) -> Result<usize> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All articles, newest first
    pub fn find_all(&self, request: PageRequest) -> Result<Page<Article>> {
        self.paged("", &[], request)
    }

    pub fn find_by_title_containing(
        &self,
        keyword: &str,
        request: PageRequest,
    ) -> Result<Page<Article>> {
        self.paged(
            "WHERE a.title LIKE ?",
            &[like_pattern(keyword)],
            request,
        )
    }

    pub fn find_by_content_containing(
        &self,
        keyword: &str,
        request: PageRequest,
    ) -> Result<Page<Article>> {
        self.paged(
            "WHERE a.content LIKE ?",
            &[like_pattern(keyword)],
            request,
        )
    }

    pub fn find_by_user_id_containing(
        &self,
        keyword: &str,
        request: PageRequest,
    ) -> Result<Page<Article>> {
        self.paged(
            "WHERE a.user_id LIKE ?",
            &[like_pattern(keyword)],
            request,
        )
    }

    pub fn find_by_nickname_containing(
        &self,
        keyword: &str,
        request: PageRequest,
    ) -> Result<Page<Article>> {
        self.paged(
            "WHERE u.nickname LIKE ?",
            &[like_pattern(keyword)],
            request,
        )
    }

    /// Articles associated with any of the given hashtag names
    pub fn find_by_hashtag_names(
        &self,
        names: &[String],
        request: PageRequest,
    ) -> Result<Page<Article>> {
        if names.is_empty() {
            return Ok(Page::empty(request));
        }

        let where_sql = format!(
            "WHERE a.id IN (
                SELECT ah.article_id FROM article_hashtags ah
                JOIN hashtags h ON ah.hashtag_id = h.id
                WHERE h.name IN ({}))",
            in_placeholders(names.len())
        );
        self.paged(&where_sql, names, request)
    }

    /// Run a filtered listing query with its matching COUNT
    fn paged(
        &self,
        where_sql: &str,
        filter_params: &[String],
        request: PageRequest,
    ) -> Result<Page<Article>> {
        let conn = self.pool.get()?;

        let count_query = format!("SELECT COUNT(*) {FROM_JOINED} {where_sql}");
        let total: i64 = conn
            .query_row(&count_query, params_from_iter(filter_params.iter()), |row| {
                row.get(0)
            })
            .context("Failed to count matching articles")?;

        let query = format!(
            "SELECT {SELECT_COLUMNS} {FROM_JOINED} {where_sql}
             ORDER BY a.created_at DESC, a.rowid DESC
             LIMIT ? OFFSET ?"
        );
        let mut stmt = conn.prepare(&query)?;

        let size = request.size as i64;
        let offset = request.offset() as i64;
        let mut params: Vec<&dyn rusqlite::ToSql> = filter_params
            .iter()
            .map(|p| p as &dyn rusqlite::ToSql)
            .collect();
        params.push(&size);
        params.push(&offset);

        let mut articles = stmt
            .query_map(&params[..], map_article_row)?
            .collect::<Result<Vec<_>, _>>()?;

        fill_hashtags(&conn, &mut articles)?;

        Ok(Page::new(articles, request, total as usize))
    }
}

fn like_pattern(keyword: &str) -> String {
    format!("%{keyword}%")
}

fn map_article_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: parse_uuid(0, row.get::<_, String>(0)?)?,
        user_id: row.get(1)?,
        user_nickname: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        created_at: parse_datetime(5, row.get::<_, String>(5)?)?,
        hashtags: Vec::new(), // filled in below
    })
}

fn fill_hashtags(conn: &DbConnection, articles: &mut [Article]) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT h.name FROM hashtags h
         JOIN article_hashtags ah ON h.id = ah.hashtag_id
         WHERE ah.article_id = ?
         ORDER BY h.name",
    )?;

    for article in articles {
        article.hashtags = stmt
            .query_map([article.id.to_string()], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(())
}

use anyhow::{Context, Result};
use rusqlite::params_from_iter;
use uuid::Uuid;

use agora_types::Hashtag;

use super::{in_placeholders, parse_datetime, parse_uuid};
use crate::db::DbPool;

pub struct HashtagRepository {
    pool: DbPool,
}

impl HashtagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist a freshly constructed hashtag record
    pub fn create(&self, hashtag: &Hashtag) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO hashtags (id, name, created_at) VALUES (?, ?, ?)",
            (
                hashtag.id.to_string(),
                &hashtag.name,
                hashtag.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create hashtag")?;
        Ok(())
    }

    /// Look up the stored records for a set of names
    pub fn find_by_name_in(&self, names: &[String]) -> Result<Vec<Hashtag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.pool.get()?;
        let query = format!(
            "SELECT id, name, created_at FROM hashtags WHERE name IN ({})",
            in_placeholders(names.len())
        );
        let mut stmt = conn.prepare(&query)?;

        let hashtags = stmt
            .query_map(params_from_iter(names.iter()), |row| {
                Ok(Hashtag {
                    id: parse_uuid(0, row.get::<_, String>(0)?)?,
                    name: row.get(1)?,
                    created_at: parse_datetime(2, row.get::<_, String>(2)?)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hashtags)
    }

    /// All hashtag names known to the board, sorted for display
    pub fn all_names(&self) -> Result<Vec<String>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT name FROM hashtags ORDER BY name")?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names)
    }

    /// Delete a hashtag record; junction rows cascade
    pub fn delete(&self, hashtag_id: &Uuid) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM hashtags WHERE id = ?",
            [hashtag_id.to_string()],
        )
        .context("Failed to delete hashtag")?;
        Ok(())
    }

    /// Associate a hashtag with an article
    pub fn link_article(&self, article_id: &Uuid, hashtag_id: &Uuid) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO article_hashtags (article_id, hashtag_id) VALUES (?, ?)",
            (article_id.to_string(), hashtag_id.to_string()),
        )
        .context("Failed to link article to hashtag")?;
        Ok(())
    }

    /// Drop every hashtag association an article currently has
    pub fn clear_article_links(&self, article_id: &Uuid) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM article_hashtags WHERE article_id = ?",
            [article_id.to_string()],
        )
        .context("Failed to clear article hashtag links")?;
        Ok(())
    }

    /// Ids of the hashtags currently associated with an article
    pub fn ids_for_article(&self, article_id: &Uuid) -> Result<Vec<Uuid>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT hashtag_id FROM article_hashtags WHERE article_id = ?",
        )?;

        let ids = stmt
            .query_map([article_id.to_string()], |row| {
                parse_uuid(0, row.get::<_, String>(0)?)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Names of the hashtags currently associated with an article
    pub fn names_for_article(&self, article_id: &Uuid) -> Result<Vec<String>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT h.name FROM hashtags h
             JOIN article_hashtags ah ON h.id = ah.hashtag_id
             WHERE ah.article_id = ?
             ORDER BY h.name",
        )?;

        let names = stmt
            .query_map([article_id.to_string()], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names)
    }

    /// How many articles reference a hashtag. Always computed from the
    /// junction table, never cached on the record.
    pub fn referencing_article_count(&self, hashtag_id: &Uuid) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM article_hashtags WHERE hashtag_id = ?",
            [hashtag_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Orphan predicate used by the reconciliation sweep
    pub fn has_no_referencing_articles(&self, hashtag_id: &Uuid) -> Result<bool> {
        Ok(self.referencing_article_count(hashtag_id)? == 0)
    }
}

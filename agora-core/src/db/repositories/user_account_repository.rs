use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use agora_types::UserAccount;

use super::parse_datetime;
use crate::db::DbPool;

pub struct UserAccountRepository {
    pool: DbPool,
}

impl UserAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user account
    pub fn create(&self, account: &UserAccount) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO user_accounts (user_id, email, nickname, memo, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                &account.user_id,
                &account.email,
                &account.nickname,
                account.memo.as_deref(),
                account.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create user account")?;
        Ok(())
    }

    /// Get a user account by its login id
    pub fn get(&self, user_id: &str) -> Result<Option<UserAccount>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, email, nickname, memo, created_at
             FROM user_accounts WHERE user_id = ?",
        )?;

        let account = stmt
            .query_row([user_id], |row| {
                Ok(UserAccount {
                    user_id: row.get(0)?,
                    email: row.get(1)?,
                    nickname: row.get(2)?,
                    memo: row.get(3)?,
                    created_at: parse_datetime(4, row.get::<_, String>(4)?)?,
                })
            })
            .optional()?;

        Ok(account)
    }

    /// Check whether an account exists without loading it
    pub fn exists(&self, user_id: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM user_accounts WHERE user_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::Utc;

    fn test_account(user_id: &str) -> UserAccount {
        UserAccount {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            nickname: user_id.to_uppercase(),
            memo: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_and_get() -> Result<()> {
        let db = Database::in_memory()?;
        db.initialize()?;
        let repo = UserAccountRepository::new(db.pool.clone());

        repo.create(&test_account("kim"))?;

        let fetched = repo.get("kim")?.expect("account should exist");
        assert_eq!(fetched.email, "kim@example.com");
        assert_eq!(fetched.nickname, "KIM");
        assert!(repo.get("missing")?.is_none());

        Ok(())
    }

    #[test]
    fn test_exists() -> Result<()> {
        let db = Database::in_memory()?;
        db.initialize()?;
        let repo = UserAccountRepository::new(db.pool.clone());

        assert!(!repo.exists("kim")?);
        repo.create(&test_account("kim"))?;
        assert!(repo.exists("kim")?);

        Ok(())
    }
}

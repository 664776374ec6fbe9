//! Article management: listing searches, CRUD, and hashtag upkeep.

use std::collections::HashSet;

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use agora_types::{
    Article, ArticleUpdate, ArticleWithComments, Page, PageRequest, SearchType,
};

use crate::db::repositories::{
    ArticleRepository, CommentRepository, HashtagRepository, UserAccountRepository,
};
use crate::db::Database;
use crate::hashtag::{extract_hashtag_names, orphaned_hashtag_ids, resolve_hashtags};

pub struct ArticleService {
    articles: ArticleRepository,
    comments: CommentRepository,
    hashtags: HashtagRepository,
    users: UserAccountRepository,
}

impl ArticleService {
    pub fn new(db: &Database) -> Self {
        Self {
            articles: ArticleRepository::new(db.pool.clone()),
            comments: CommentRepository::new(db.pool.clone()),
            hashtags: HashtagRepository::new(db.pool.clone()),
            users: UserAccountRepository::new(db.pool.clone()),
        }
    }

    /// Paged listing search. A blank keyword lists everything.
    pub fn search_articles(
        &self,
        search_type: SearchType,
        keyword: &str,
        request: PageRequest,
    ) -> Result<Page<Article>> {
        if keyword.trim().is_empty() {
            return self.articles.find_all(request);
        }

        match search_type {
            SearchType::Title => self.articles.find_by_title_containing(keyword, request),
            SearchType::Content => self.articles.find_by_content_containing(keyword, request),
            SearchType::UserId => self.articles.find_by_user_id_containing(keyword, request),
            SearchType::Nickname => self.articles.find_by_nickname_containing(keyword, request),
            SearchType::Hashtag => {
                let names: Vec<String> =
                    keyword.split_whitespace().map(str::to_string).collect();
                self.articles.find_by_hashtag_names(&names, request)
            }
        }
    }

    /// Articles tagged with a single hashtag. Blank name yields an empty page.
    pub fn search_by_hashtag(&self, name: &str, request: PageRequest) -> Result<Page<Article>> {
        if name.trim().is_empty() {
            return Ok(Page::empty(request));
        }
        self.articles
            .find_by_hashtag_names(&[name.to_string()], request)
    }

    /// Create an article and attach the hashtags found in its content.
    ///
    /// Returns `None` when the author account does not exist; the request is
    /// logged and discarded without touching storage.
    pub fn save_article(
        &self,
        user_id: &str,
        title: &str,
        content: &str,
    ) -> Result<Option<Article>> {
        let Some(account) = self.users.get(user_id)? else {
            tracing::warn!(user_id, "article save failed: no such user account");
            return Ok(None);
        };

        let mut article = Article {
            id: Uuid::new_v4(),
            user_id: account.user_id,
            user_nickname: account.nickname,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            hashtags: Vec::new(),
        };
        self.articles.create(&article)?;
        self.attach_hashtags_from_content(&article.id, content)?;

        article.hashtags = self.hashtags.names_for_article(&article.id)?;
        tracing::debug!(article_id = %article.id, tags = article.hashtags.len(), "article saved");
        Ok(Some(article))
    }

    /// Patch an article and bring its hashtag associations in line with the
    /// new content.
    ///
    /// The sequence is: snapshot the previous associations, clear them,
    /// attach the set extracted from the updated text, and only then sweep
    /// the snapshot for orphans. Sweeping last means a tag kept across the
    /// edit is referenced again when the predicate runs, so it survives
    /// with its original identity instead of being deleted and recreated.
    pub fn update_article(
        &self,
        article_id: &Uuid,
        user_id: &str,
        update: &ArticleUpdate,
    ) -> Result<()> {
        let Some(article) = self.articles.get_by_id(article_id)? else {
            tracing::warn!(%article_id, "article update failed: no such article");
            return Ok(());
        };
        if article.user_id != user_id {
            tracing::warn!(%article_id, user_id, "article update rejected: not the author");
            return Ok(());
        }

        self.articles.update_fields(article_id, update)?;

        let content = update.content.as_deref().unwrap_or(&article.content);
        let previous_ids: HashSet<Uuid> =
            self.hashtags.ids_for_article(article_id)?.into_iter().collect();

        self.hashtags.clear_article_links(article_id)?;
        self.attach_hashtags_from_content(article_id, content)?;
        self.sweep_orphans(&previous_ids)?;

        Ok(())
    }

    /// Delete an article (author-scoped) and remove hashtags it orphaned.
    /// Returns true when the article was actually removed.
    pub fn delete_article(&self, article_id: &Uuid, user_id: &str) -> Result<bool> {
        let previous_ids: HashSet<Uuid> =
            self.hashtags.ids_for_article(article_id)?.into_iter().collect();

        let deleted = self.articles.delete_by_id_and_user(article_id, user_id)?;
        if !deleted {
            tracing::warn!(%article_id, user_id, "article delete skipped: no matching article for author");
            return Ok(false);
        }

        // Junction rows are already gone via cascade; sweep the snapshot.
        self.sweep_orphans(&previous_ids)?;
        Ok(true)
    }

    pub fn get_article(&self, article_id: &Uuid) -> Result<Option<Article>> {
        self.articles.get_by_id(article_id)
    }

    pub fn get_article_with_comments(
        &self,
        article_id: &Uuid,
    ) -> Result<Option<ArticleWithComments>> {
        let Some(article) = self.articles.get_by_id(article_id)? else {
            return Ok(None);
        };
        let comments = self.comments.find_by_article(article_id)?;
        Ok(Some(ArticleWithComments { article, comments }))
    }

    pub fn article_count(&self) -> Result<usize> {
        self.articles.count()
    }

    /// Every hashtag name known to the board
    pub fn hashtag_names(&self) -> Result<Vec<String>> {
        self.hashtags.all_names()
    }

    /// Extract names from `content`, reuse or create their records, and
    /// link them all to the article.
    fn attach_hashtags_from_content(&self, article_id: &Uuid, content: &str) -> Result<()> {
        let names = extract_hashtag_names(content);
        let existing = self.hashtags.find_by_name_in(&names)?;
        let resolved = resolve_hashtags(&names, existing);

        for hashtag in &resolved.created {
            self.hashtags.create(hashtag)?;
        }
        for hashtag in resolved.all() {
            self.hashtags.link_article(article_id, &hashtag.id)?;
        }

        Ok(())
    }

    /// Delete every hashtag in `previous_ids` that no article references
    /// anymore. Each id is checked exactly once.
    fn sweep_orphans(&self, previous_ids: &HashSet<Uuid>) -> Result<()> {
        let orphans = orphaned_hashtag_ids(previous_ids, |id| {
            Ok(!self.hashtags.has_no_referencing_articles(&id)?)
        })?;

        for id in &orphans {
            self.hashtags.delete(id)?;
        }
        if !orphans.is_empty() {
            tracing::debug!(count = orphans.len(), "removed orphaned hashtags");
        }

        Ok(())
    }
}

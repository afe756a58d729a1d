//! SQLite persistence for aggregated articles.
//!
//! One table, natural-key uniqueness on title and link. Batch saves run
//! inside a single transaction with `INSERT OR IGNORE`, so resubmitting a
//! batch is harmless and every row reports whether it was new. Reads
//! never fail the caller: a query error is logged and an empty set
//! returned.

use rusqlite::{params, Connection};
use tracing::{debug, error, info, instrument};

use crate::error::StoreError;
use crate::models::{EnrichedArticle, StoredArticle};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT UNIQUE,
        link TEXT UNIQUE,
        content TEXT,
        source TEXT,
        category TEXT DEFAULT 'Uncategorized'
    );
";

/// Fate of one submitted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The row was new and is now persisted.
    Inserted,
    /// The row collided with an existing title or link and was left alone.
    Skipped,
}

/// Per-row outcomes of one batch save, in submission order.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub outcomes: Vec<SaveOutcome>,
}

impl SaveReport {
    pub fn submitted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn inserted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| **outcome == SaveOutcome::Inserted)
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| **outcome == SaveOutcome::Skipped)
            .count()
    }
}

pub struct ArticleStore {
    conn: Connection,
}

impl ArticleStore {
    /// Open the database at `path`, creating file and schema on first
    /// use, in WAL mode.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_string(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// In-memory store used by the test suite.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: ":memory:".to_string(),
            source,
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert a batch atomically. Rows colliding on title or link are
    /// skipped individually; the report says which, in submission order.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub fn save_articles(&self, articles: &[EnrichedArticle]) -> Result<SaveReport, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut outcomes = Vec::with_capacity(articles.len());
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO articles (title, link, content, source, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for enriched in articles {
                let changed = stmt.execute(params![
                    enriched.article.title,
                    enriched.article.link,
                    enriched.summary,
                    enriched.article.source,
                    enriched.category.as_str(),
                ])?;
                outcomes.push(if changed == 0 {
                    SaveOutcome::Skipped
                } else {
                    SaveOutcome::Inserted
                });
            }
        }
        tx.commit()?;

        let report = SaveReport { outcomes };
        info!(
            submitted = report.submitted(),
            inserted = report.inserted(),
            skipped = report.skipped(),
            "saved article batch"
        );
        Ok(report)
    }

    /// Every stored article, oldest first. Empty on error.
    pub fn fetch_all(&self) -> Vec<StoredArticle> {
        let query = self.query_rows(
            "SELECT id, title, link, content, source, category FROM articles ORDER BY id",
            params![],
        );
        match query {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "article query failed, returning no rows");
                Vec::new()
            }
        }
    }

    /// Stored articles labeled `category`, oldest first. Empty on error.
    pub fn fetch_by_category(&self, category: &str) -> Vec<StoredArticle> {
        let query = self.query_rows(
            "SELECT id, title, link, content, source, category FROM articles \
             WHERE category = ?1 ORDER BY id",
            params![category],
        );
        match query {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, category, "article query failed, returning no rows");
                Vec::new()
            }
        }
    }

    fn query_rows(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<StoredArticle>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, |row| {
                Ok(StoredArticle {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    link: row.get(2)?,
                    content: row.get(3)?,
                    source: row.get(4)?,
                    category: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Relabel the article titled `title`. Matching nothing is not an
    /// error.
    pub fn update_category(&self, title: &str, category: &str) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE articles SET category = ?1 WHERE title = ?2",
            params![category, title],
        )?;
        if changed == 0 {
            debug!(title, "no article matched category update");
        }
        Ok(())
    }

    /// Remove the article titled `title`. Matching nothing is not an
    /// error.
    pub fn delete_article(&self, title: &str) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM articles WHERE title = ?1", params![title])?;
        if changed == 0 {
            debug!(title, "no article matched delete");
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleCandidate, Category, Sentiment};

    fn enriched(title: &str, link: &str, summary: &str, category: Category) -> EnrichedArticle {
        EnrichedArticle {
            article: ArticleCandidate {
                title: title.to_string(),
                link: link.to_string(),
                content: format!("{summary} and quite a lot more body text"),
                source: "test".to_string(),
            },
            category,
            summary: summary.to_string(),
            sentiment: Sentiment::Positive,
        }
    }

    #[test]
    fn test_batch_insert_reports_every_row() {
        let store = ArticleStore::open_in_memory().unwrap();
        let batch = [
            enriched("A", "https://s.example/a", "Summary a", Category::Technology),
            enriched("B", "https://s.example/b", "Summary b", Category::Health),
        ];

        let report = store.save_articles(&batch).unwrap();

        assert_eq!(report.submitted(), 2);
        assert_eq!(report.inserted(), 2);
        assert_eq!(report.skipped(), 0);
        assert_eq!(store.fetch_all().len(), 2);
    }

    #[test]
    fn test_resubmitting_a_batch_skips_every_row() {
        let store = ArticleStore::open_in_memory().unwrap();
        let batch = [
            enriched("A", "https://s.example/a", "Summary a", Category::Technology),
            enriched("B", "https://s.example/b", "Summary b", Category::Health),
        ];

        store.save_articles(&batch).unwrap();
        let rerun = store.save_articles(&batch).unwrap();

        assert_eq!(rerun.inserted(), 0);
        assert_eq!(rerun.skipped(), 2);
        assert_eq!(store.fetch_all().len(), 2);
    }

    #[test]
    fn test_mixed_batch_reports_outcomes_in_submission_order() {
        let store = ArticleStore::open_in_memory().unwrap();
        let first = enriched("A", "https://s.example/a", "Summary a", Category::Technology);
        store.save_articles(std::slice::from_ref(&first)).unwrap();

        let second = enriched("B", "https://s.example/b", "Summary b", Category::Health);
        let report = store.save_articles(&[first, second]).unwrap();

        assert_eq!(
            report.outcomes,
            vec![SaveOutcome::Skipped, SaveOutcome::Inserted]
        );
    }

    #[test]
    fn test_title_collision_skips_even_with_fresh_link() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .save_articles(&[enriched(
                "Same title",
                "https://s.example/1",
                "One",
                Category::Uncategorized,
            )])
            .unwrap();

        let report = store
            .save_articles(&[enriched(
                "Same title",
                "https://s.example/2",
                "Two",
                Category::Uncategorized,
            )])
            .unwrap();

        assert_eq!(report.outcomes, vec![SaveOutcome::Skipped]);
        assert_eq!(store.fetch_all().len(), 1);
    }

    #[test]
    fn test_link_collision_skips_even_with_fresh_title() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .save_articles(&[enriched(
                "Title one",
                "https://s.example/same",
                "One",
                Category::Uncategorized,
            )])
            .unwrap();

        let report = store
            .save_articles(&[enriched(
                "Title two",
                "https://s.example/same",
                "Two",
                Category::Uncategorized,
            )])
            .unwrap();

        assert_eq!(report.outcomes, vec![SaveOutcome::Skipped]);
    }

    #[test]
    fn test_stored_content_is_the_summary() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .save_articles(&[enriched(
                "A",
                "https://s.example/a",
                "Short summary",
                Category::Business,
            )])
            .unwrap();

        let rows = store.fetch_all();
        assert_eq!(rows[0].content, "Short summary");
        assert_eq!(rows[0].category, "Business");
    }

    #[test]
    fn test_fetch_by_category_filters() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .save_articles(&[
                enriched("A", "https://s.example/a", "a", Category::Technology),
                enriched("B", "https://s.example/b", "b", Category::Health),
                enriched("C", "https://s.example/c", "c", Category::Technology),
            ])
            .unwrap();

        let tech = store.fetch_by_category("Technology");
        assert_eq!(tech.len(), 2);
        assert_eq!(tech[0].title, "A");
        assert_eq!(tech[1].title, "C");
        assert!(store.fetch_by_category("Sports").is_empty());
    }

    #[test]
    fn test_fetch_all_on_empty_store() {
        let store = ArticleStore::open_in_memory().unwrap();
        assert!(store.fetch_all().is_empty());
    }

    #[test]
    fn test_category_column_defaults_for_external_writers() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .execute_raw(
                "INSERT INTO articles (title, link, content, source)
                 VALUES ('Raw', 'https://s.example/raw', '', 'manual')",
            )
            .unwrap();

        let rows = store.fetch_all();
        assert_eq!(rows[0].category, "Uncategorized");
    }

    #[test]
    fn test_update_category_relabels_matching_row() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .save_articles(&[enriched(
                "A",
                "https://s.example/a",
                "a",
                Category::Uncategorized,
            )])
            .unwrap();

        store.update_category("A", "Politics").unwrap();

        assert_eq!(store.fetch_all()[0].category, "Politics");
    }

    #[test]
    fn test_update_and_delete_on_missing_title_are_no_ops() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .save_articles(&[enriched(
                "Keep",
                "https://s.example/keep",
                "k",
                Category::Health,
            )])
            .unwrap();

        store.update_category("No such title", "Sports").unwrap();
        store.delete_article("No such title").unwrap();

        let rows = store.fetch_all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Health");
    }

    #[test]
    fn test_delete_article_removes_matching_row() {
        let store = ArticleStore::open_in_memory().unwrap();
        store
            .save_articles(&[
                enriched("A", "https://s.example/a", "a", Category::Health),
                enriched("B", "https://s.example/b", "b", Category::Health),
            ])
            .unwrap();

        store.delete_article("A").unwrap();

        let rows = store.fetch_all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "B");
    }
}

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{NewsError, Result};
use crate::domain::{Article, Source};
use crate::store::FavoritesGateway;

const ARTICLE_COLUMNS: &str =
    "title, description, content, url, image_url, published_at, source_name, source_url";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| NewsError::Other(format!("Migration failed: {}", e)))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            NewsError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
        Ok(Article {
            title: row.get(0)?,
            description: row.get(1)?,
            content: row.get(2)?,
            url: row.get(3)?,
            image_url: row.get(4)?,
            published_at: row.get(5)?,
            source: Source {
                name: row.get(6)?,
                url: row.get(7)?,
            },
        })
    }
}

impl FavoritesGateway for SqliteStore {
    fn initialize_user(&self, uid: &str) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (uid, initialized_at) VALUES (?1, ?2)",
            params![uid, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    fn save(&self, uid: &str, article: &Article) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO favorite_articles (uid, {}, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                ARTICLE_COLUMNS
            ),
            params![
                uid,
                article.title,
                article.description,
                article.content,
                article.url,
                article.image_url,
                article.published_at,
                article.source.name,
                article.source.url,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn fetch_all(&self, uid: &str) -> Result<Vec<Article>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM favorite_articles WHERE uid = ?1 ORDER BY saved_at, title",
            ARTICLE_COLUMNS
        ))?;

        let articles = stmt
            .query_map(params![uid], Self::article_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(articles)
    }

    fn fetch_one(&self, uid: &str, title: &str) -> Result<Option<Article>> {
        let conn = self.conn()?;
        let article = conn
            .query_row(
                &format!(
                    "SELECT {} FROM favorite_articles WHERE uid = ?1 AND title = ?2",
                    ARTICLE_COLUMNS
                ),
                params![uid, title],
                Self::article_from_row,
            )
            .optional()?;

        Ok(article)
    }
}

use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::StorageError;
use crate::post::{normalize_id, PostRecord};

/// A row read back for the history listing
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPost {
    pub id: String,
    pub subreddit: String,
    pub cached: String,
    pub title: String,
    pub url: String,
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS posts (
            id TEXT,
            subreddit TEXT,
            cached TEXT,
            title TEXT,
            selftext TEXT,
            url TEXT
        )",
        [],
    )?;

    conn.execute("CREATE INDEX IF NOT EXISTS postindex ON posts(id)", [])?;

    Ok(())
}

/// Seen-posts table. Open once per command, reuse across all operations.
pub struct PostStore {
    conn: Connection,
}

impl PostStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(PostStore { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(PostStore { conn })
    }

    /// True once a post with this id (bare or fully qualified) was recorded.
    pub fn exists(&self, id: &str) -> Result<bool, StorageError> {
        let id = normalize_id(id);
        let mut stmt = self.conn.prepare_cached("SELECT * FROM posts WHERE id = ?1")?;
        let found = stmt.query_row(params![id], |_| Ok(())).optional()?;
        Ok(found.is_some())
    }

    /// Insert one row. Each call commits on its own.
    pub fn record(&self, post: &PostRecord, cached: DateTime<Local>) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO posts (id, subreddit, cached, title, selftext, url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                post.fullname(),
                post.subreddit.to_lowercase(),
                cached.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
                post.title,
                post.selftext,
                post.url
            ],
        )?;

        Ok(())
    }

    pub fn count(&self) -> Result<u64, StorageError> {
        let n: i64 = self.conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }

    /// Most recently cached posts first
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredPost>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subreddit, cached, title, url
             FROM posts
             ORDER BY cached DESC
             LIMIT ?1"
        )?;

        let posts = stmt
            .query_map(params![i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
                Ok(StoredPost {
                    id: row.get(0)?,
                    subreddit: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    cached: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    title: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    url: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }
}

//! SQLite item store.
//!
//! Rows are keyed by `(learner_key, title)` with a `position` column that
//! preserves the collection's stored order.

use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::{ErrorCode, KarteiError, KarteiResult};
use crate::traits::ItemStore;
use crate::types::{Item, ItemKind};

/// SQLite-backed learner item store.
pub struct SqliteItemStore {
    conn: Mutex<Connection>,
}

impl SqliteItemStore {
    /// Open (or create) the database at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> KarteiResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path.as_ref()).map_err(|e| KarteiError::Database {
            message: format!("failed to open '{}': {}", path.as_ref().display(), e),
            code: ErrorCode::DbConnectionFailed,
            source: Some(Box::new(e)),
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> KarteiResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> KarteiResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| KarteiError::database(e.to_string()))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS learner_items (
                learner_key TEXT NOT NULL,
                title TEXT NOT NULL,
                position INTEGER NOT NULL,
                kind TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                question TEXT NOT NULL DEFAULT '',
                answer TEXT NOT NULL DEFAULT '',
                available_timedate TEXT NOT NULL DEFAULT '',
                visit_count INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (learner_key, title)
            );

            CREATE INDEX IF NOT EXISTS idx_learner_items_position
                ON learner_items(learner_key, position);
            ",
        )?;

        Ok(())
    }
}

impl ItemStore for SqliteItemStore {
    fn read_items(&self, learner: &str) -> KarteiResult<Vec<Item>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| KarteiError::database(e.to_string()))?;

        let mut stmt = conn.prepare(
            "SELECT kind, title, description, question, answer, available_timedate, visit_count
             FROM learner_items WHERE learner_key = ?1 ORDER BY position ASC",
        )?;

        let rows = stmt.query_map(params![learner], |row| {
            Ok((
                row.get::<_, String>(0)?,
                Item {
                    kind: ItemKind::Vocabulary,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    question: row.get(3)?,
                    answer: row.get(4)?,
                    available_time: row.get(5)?,
                    visit_count: row.get(6)?,
                    unparsed_available: None,
                },
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (kind, mut item) = row?;
            item.kind = ItemKind::from_str(&kind).map_err(|e| {
                KarteiError::store_corrupted(
                    format!("unknown item kind '{}' for '{}'", kind, item.title),
                    e,
                )
            })?;
            items.push(item);
        }

        debug!(learner, count = items.len(), "Read items from sqlite store");
        Ok(items)
    }

    fn write_items(&self, learner: &str, items: &[Item]) -> KarteiResult<()> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| KarteiError::database(e.to_string()))?;

        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM learner_items WHERE learner_key = ?1",
            params![learner],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO learner_items
                 (learner_key, title, position, kind, description, question, answer,
                  available_timedate, visit_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (position, item) in items.iter().enumerate() {
                insert.execute(params![
                    learner,
                    item.title,
                    position as i64,
                    item.kind.to_string(),
                    item.description,
                    item.question,
                    item.answer,
                    item.available_time,
                    item.visit_count,
                ])?;
            }
        }
        tx.commit()?;

        debug!(learner, count = items.len(), "Wrote items to sqlite store");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

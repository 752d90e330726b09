use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use super::traits::{NewQuote, SavedQuote, Storage};

const DB_SCHEMA_VERSION: i64 = 1;

/// The favorites store. Holds one long-lived connection shared by every request;
/// each operation is a single bound statement so no transaction is needed.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

fn map_quote_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SavedQuote> {
    Ok(SavedQuote {
        id: row.get(0)?,
        quote: row.get(1)?,
        character: row.get(2)?,
        image: row.get(3)?,
        character_direction: row.get(4)?,
    })
}

fn db_create_quote(conn: &Connection, quote: &NewQuote) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO quotes (quote, character, image, characterdirection) VALUES (?1, ?2, ?3, ?4)",
        params![
            quote.quote,
            quote.character,
            quote.image,
            quote.character_direction
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn db_list_quotes(conn: &Connection) -> rusqlite::Result<Vec<SavedQuote>> {
    let mut stmt = conn.prepare(
        "SELECT id, quote, character, image, characterdirection FROM quotes ORDER BY id",
    )?;
    let mapped = stmt
        .query_map([], map_quote_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_load_quote(conn: &Connection, id: i64) -> rusqlite::Result<Option<SavedQuote>> {
    conn.query_row(
        "SELECT id, quote, character, image, characterdirection FROM quotes WHERE id = ?1",
        params![id],
        map_quote_row,
    )
    .optional()
}

fn db_update_quote(conn: &Connection, id: i64, quote: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE quotes SET quote = ?2 WHERE id = ?1",
        params![id, quote],
    )
}

fn db_delete_quote(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM quotes WHERE id = ?1", params![id])
}

impl SqliteStorage {
    /// Opens (creating if needed) the database file and installs the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;
        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Removes the database file and its WAL side files, if present.
    pub fn reset_all<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        for suffix in ["", "-wal", "-shm"] {
            let mut candidate = path.as_os_str().to_owned();
            candidate.push(suffix);
            let candidate = PathBuf::from(candidate);
            if candidate.exists() {
                std::fs::remove_file(&candidate)?;
            }
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("sqlite connection mutex poisoned"))
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        if version == 0 {
            conn.execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS quotes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                quote TEXT NOT NULL DEFAULT '',
                character TEXT NOT NULL DEFAULT '',
                image TEXT NOT NULL DEFAULT '',
                characterdirection TEXT NOT NULL DEFAULT ''
            );
            "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}

impl Storage for SqliteStorage {
    fn create_quote(&self, quote: &NewQuote) -> Result<i64> {
        let conn = self.lock()?;
        let id = db_create_quote(&conn, quote)?;
        Ok(id)
    }

    fn list_quotes(&self) -> Result<Vec<SavedQuote>> {
        let conn = self.lock()?;
        let rows = db_list_quotes(&conn)?;
        Ok(rows)
    }

    fn load_quote(&self, id: i64) -> Result<Option<SavedQuote>> {
        let conn = self.lock()?;
        let row = db_load_quote(&conn, id)?;
        Ok(row)
    }

    fn update_quote(&self, id: i64, quote: &str) -> Result<usize> {
        let conn = self.lock()?;
        let affected = db_update_quote(&conn, id, quote)?;
        Ok(affected)
    }

    fn delete_quote(&self, id: i64) -> Result<usize> {
        let conn = self.lock()?;
        let affected = db_delete_quote(&conn, id)?;
        Ok(affected)
    }
}

use crate::Database;
use crate::models::EntryRow;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_entry(key)?.map(|row| row.value))
    }

    pub fn get_entry(&self, key: &str) -> Result<Option<EntryRow>> {
        self.with_conn(|conn| query_entry(conn, key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    /// Write several entries in one transaction so readers never observe
    /// a half-written session.
    pub fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            for (key, value) in entries {
                tx.execute(
                    "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                    (key, value),
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }

    pub fn remove_many(&self, keys: &[&str]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            for key in keys {
                tx.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
            }
            tx.commit()?;
            Ok(())
        })
    }
}

fn query_entry(conn: &Connection, key: &str) -> Result<Option<EntryRow>> {
    let mut stmt = conn.prepare("SELECT key, value, updated_at FROM kv_store WHERE key = ?1")?;

    let row = stmt
        .query_row([key], |row| {
            Ok(EntryRow {
                key: row.get(0)?,
                value: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TOKEN_KEY, USER_KEY};

    #[test]
    fn set_get_overwrite_remove() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get(TOKEN_KEY).unwrap().is_none());

        db.set(TOKEN_KEY, "first").unwrap();
        db.set(TOKEN_KEY, "second").unwrap();
        assert_eq!(db.get(TOKEN_KEY).unwrap().as_deref(), Some("second"));

        let entry = db.get_entry(TOKEN_KEY).unwrap().unwrap();
        assert_eq!(entry.key, TOKEN_KEY);
        assert!(!entry.updated_at.is_empty());

        db.remove(TOKEN_KEY).unwrap();
        assert!(db.get(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn session_pair_is_written_and_cleared_together() {
        let db = Database::open_in_memory().unwrap();
        db.set_many(&[(TOKEN_KEY, "tok"), (USER_KEY, r#"{"id":"u1"}"#)]).unwrap();
        assert_eq!(db.get(USER_KEY).unwrap().as_deref(), Some(r#"{"id":"u1"}"#));

        db.remove_many(&[TOKEN_KEY, USER_KEY]).unwrap();
        assert!(db.get(TOKEN_KEY).unwrap().is_none());
        assert!(db.get(USER_KEY).unwrap().is_none());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("whatgram_store_test_{}", std::process::id()));
        let path = dir.join("session.db");
        let _ = std::fs::remove_file(&path);

        {
            let db = Database::open(&path).unwrap();
            db.set(TOKEN_KEY, "persisted").unwrap();
        }

        let reopened = Database::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("persisted"));

        drop(reopened);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

use crate::Database;
use anyhow::Result;
use rusqlite::OptionalExtension;

impl Database {
    pub fn get_entry(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| row.get(0))
                .optional()?;
            Ok(value)
        })
    }

    /// Upsert several entries in one transaction: either all land or none do.
    pub fn put_entries(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for (key, value) in entries {
                tx.execute(
                    "INSERT INTO entries (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                    (key, value),
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn delete_entries(&self, keys: &[&str]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for key in keys {
                tx.execute("DELETE FROM entries WHERE key = ?1", [key])?;
            }
            tx.commit()?;
            Ok(())
        })
    }
}

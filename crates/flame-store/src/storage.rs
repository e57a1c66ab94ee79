use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

use crate::Database;

/// Persistent string storage on the client side.
///
/// Multi-entry writes and removals must be all-or-nothing.
pub trait ClientStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()>;
    fn remove_all(&self, keys: &[&str]) -> Result<()>;
}

impl ClientStorage for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_entry(key)
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.put_entries(entries)
    }

    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        self.delete_entries(keys)
    }
}

/// Process-local storage. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|e| anyhow::anyhow!("storage lock poisoned: {}", e))?;
        Ok(entries.get(key).cloned())
    }

    fn set_all(&self, new_entries: &[(&str, &str)]) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|e| anyhow::anyhow!("storage lock poisoned: {}", e))?;
        for (key, value) in new_entries {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|e| anyhow::anyhow!("storage lock poisoned: {}", e))?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

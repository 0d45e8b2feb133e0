use std::path::Path;

use redb::{Database, TableDefinition};

use super::{KeyValueStore, StoreError};

const TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

/// Persistent store backed by redb, a pure-Rust embedded key-value database.
/// One database file per profile; all collections share the single `kv`
/// table.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::Backend(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { db })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_string())),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

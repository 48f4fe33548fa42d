//! Sled-backed [`KeyValueStore`] adapter.
//!
//! The registration record is tiny (three entries), so the adapter keeps a
//! single named tree and flushes after every batch: registration writes are
//! rare and must survive an immediate process kill.


use std::path::Path;
use std::sync::Arc;

use tracing::error;
use tracing::info;

use crate::constants::PUSH_STORE_TREE;
use crate::KeyValueStore;
use crate::Result;
use crate::StoreError;
use crate::WriteBatch;

pub struct SledKeyValueStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl std::fmt::Debug for SledKeyValueStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SledKeyValueStore")
            .field("tree_len", &self.tree.len())
            .finish()
    }
}

impl SledKeyValueStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Arc<Self>> {
        let db = sled::Config::new()
            .path(path)
            .open()
            .map_err(StoreError::backend)?;
        let store = Self::with_db(&db)?;
        Ok(store)
    }

    /// Opens the registration tree inside an already-open sled database,
    /// for hosts that share one database across subsystems.
    pub fn with_db(db: &sled::Db) -> Result<Arc<Self>> {
        let tree = db.open_tree(PUSH_STORE_TREE).map_err(StoreError::backend)?;
        Ok(Arc::new(Self {
            db: db.clone(),
            tree,
        }))
    }
}

impl Drop for SledKeyValueStore {
    fn drop(&mut self) {
        match self.db.flush() {
            Ok(_) => info!("Successfully flushed push registration store"),
            Err(e) => error!(?e, "Failed to flush push registration store"),
        }
    }
}

impl KeyValueStore for SledKeyValueStore {
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<Vec<u8>>> {
        let value = self.tree.get(key).map_err(StoreError::backend)?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn apply(
        &self,
        batch: WriteBatch,
    ) -> Result<()> {
        let mut sled_batch = sled::Batch::default();
        for (key, value) in batch.into_ops() {
            match value {
                Some(bytes) => sled_batch.insert(key.as_bytes(), bytes),
                None => sled_batch.remove(key.as_bytes()),
            }
        }
        self.tree.apply_batch(sled_batch).map_err(StoreError::backend)?;
        self.tree.flush().map_err(StoreError::backend)?;
        Ok(())
    }
}

//! Embedded JSON document store: in-memory collections with optional snapshots on disk

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{AppError, Result};

/// Opens named collections, optionally backed by a data directory
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    data_dir: Option<PathBuf>,
}

impl DocumentStore {
    pub fn in_memory() -> Self {
        Self { data_dir: None }
    }

    pub fn persistent(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.data_dir.is_some()
    }

    /// Open a collection, loading its last snapshot when one exists
    pub async fn collection<T>(&self, name: &str) -> Result<Collection<T>>
    where
        T: Clone + Serialize + DeserializeOwned + Send + Sync,
    {
        let snapshot = match &self.data_dir {
            Some(dir) => {
                fs::create_dir_all(dir)
                    .await
                    .map_err(|e| AppError::Persistence(format!("Cannot create {:?}: {}", dir, e)))?;
                Some(dir.join(format!("{}.json", name)))
            }
            None => None,
        };

        let docs = match &snapshot {
            Some(path) if fs::try_exists(path).await.unwrap_or(false) => {
                let raw = fs::read(path)
                    .await
                    .map_err(|e| AppError::Persistence(format!("Cannot read {:?}: {}", path, e)))?;
                let docs: BTreeMap<String, T> = serde_json::from_slice(&raw)
                    .map_err(|e| AppError::Persistence(format!("Corrupt snapshot {:?}: {}", path, e)))?;
                info!(collection = name, documents = docs.len(), "Loaded collection snapshot");
                docs
            }
            _ => BTreeMap::new(),
        };

        Ok(Collection {
            name: name.to_string(),
            docs: RwLock::new(docs),
            snapshot,
            write_lock: Mutex::new(()),
        })
    }
}

/// Documents keyed by id
pub struct Collection<T> {
    name: String,
    docs: RwLock<BTreeMap<String, T>>,
    snapshot: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl<T> Collection<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn get(&self, id: &str) -> Option<T> {
        self.docs.read().get(id).cloned()
    }

    pub fn find<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.docs
            .read()
            .values()
            .filter(|doc| predicate(doc))
            .cloned()
            .collect()
    }

    pub fn count<P>(&self, predicate: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        self.docs.read().values().filter(|doc| predicate(doc)).count()
    }

    /// Insert a new document; `false` when the id is already taken
    pub async fn insert(&self, id: &str, doc: T) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        {
            let mut docs = self.docs.write();
            if docs.contains_key(id) {
                return Ok(false);
            }
            docs.insert(id.to_string(), doc);
        }
        self.persist().await?;
        Ok(true)
    }

    /// Apply `mutate` to one document and return the updated copy
    pub async fn update<F>(&self, id: &str, mutate: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let updated = self
            .update_if(id, |doc| {
                mutate(doc);
                true
            })
            .await?;
        Ok(updated.map(|(doc, _)| doc))
    }

    /// Like [`Collection::update`], but `mutate` reports whether it changed anything.
    /// Unchanged documents are not persisted.
    pub async fn update_if<F>(&self, id: &str, mutate: F) -> Result<Option<(T, bool)>>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let _guard = self.write_lock.lock().await;
        let updated = {
            let mut docs = self.docs.write();
            docs.get_mut(id).map(|doc| {
                let changed = mutate(doc);
                (doc.clone(), changed)
            })
        };

        if matches!(updated, Some((_, true))) {
            self.persist().await?;
        }
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> Result<Option<T>> {
        let _guard = self.write_lock.lock().await;
        let removed = self.docs.write().remove(id);
        if removed.is_some() {
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Remove every matching document, returning how many went
    pub async fn remove_where<P>(&self, predicate: P) -> Result<usize>
    where
        P: Fn(&T) -> bool,
    {
        let _guard = self.write_lock.lock().await;
        let removed = {
            let mut docs = self.docs.write();
            let before = docs.len();
            docs.retain(|_, doc| !predicate(doc));
            before - docs.len()
        };

        if removed > 0 {
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Write the whole collection to its snapshot file. Callers hold `write_lock`.
    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let bytes = {
            let docs = self.docs.read();
            serde_json::to_vec_pretty(&*docs)?
        };

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| AppError::Persistence(format!("Cannot write {:?}: {}", tmp, e)))?;
        fs::rename(&tmp, path)
            .await
            .map_err(|e| AppError::Persistence(format!("Cannot replace {:?}: {}", path, e)))?;

        debug!(collection = %self.name, size = bytes.len(), "Snapshot written");
        Ok(())
    }
}

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::storage::traits::{ListStore, StorageError, StorageResult};
use crate::storage::types::{
    timestamp_now, ListDocument, ListId, ListInput, ListMetadata, DEFAULT_LIST_NAME,
};

const LIST_FILE_EXTENSION: &str = "json";

/// List ids are used as file names, so only plain tokens may reach the filesystem
pub fn is_valid_list_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// File-per-list store: `<root>/<id>.json`.
///
/// Writes to one id are serialized by a per-id lock and go through a
/// temporary file that is renamed over the target.
pub struct FileListStore {
    root: PathBuf,
    locks: Mutex<HashMap<ListId, Arc<AsyncMutex<()>>>>,
}

impl FileListStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.{LIST_FILE_EXTENSION}"))
    }

    fn path_for(&self, id: &str) -> Option<PathBuf> {
        is_valid_list_id(id).then(|| self.file_path(id))
    }

    fn lock_for<'a>(&'a self, id: &'a str) -> LockLease<'a> {
        let lock = self
            .locks
            .lock()
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        LockLease {
            store: self,
            id,
            lock,
        }
    }

    /// Drop the map entry for `id` once no other task holds or waits on it
    fn release_lock(&self, id: &str, lock: &Arc<AsyncMutex<()>>) {
        let mut locks = self.locks.lock();
        // One reference in the map, one in `lock`
        if Arc::strong_count(lock) == 2
            && locks.get(id).is_some_and(|held| Arc::ptr_eq(held, lock))
        {
            locks.remove(id);
        }
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.lock().len()
    }

    async fn read_document(path: &Path) -> StorageResult<ListDocument> {
        let bytes = fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn read_metadata(path: &Path) -> StorageResult<ListMetadata> {
        let bytes = fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_document(&self, path: &Path, doc: &ListDocument) -> StorageResult<()> {
        fs::create_dir_all(&self.root).await?;
        let bytes = serde_json::to_vec_pretty(doc)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &bytes).await?;
        if let Err(e) = fs::rename(&tmp_path, path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// A task's claim on the per-id lock; the map entry goes away with the last claim
struct LockLease<'a> {
    store: &'a FileListStore,
    id: &'a str,
    lock: Arc<AsyncMutex<()>>,
}

impl Drop for LockLease<'_> {
    fn drop(&mut self) {
        self.store.release_lock(self.id, &self.lock);
    }
}

/// Id of a `<id>.json` directory entry
fn list_file_stem(path: &Path) -> Option<String> {
    if path.extension()?.to_str()? != LIST_FILE_EXTENSION {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_string)
}

#[async_trait]
impl ListStore for FileListStore {
    async fn list_all(&self) -> StorageResult<Vec<ListMetadata>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut lists = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(stem) = list_file_stem(&path) else {
                continue;
            };

            match Self::read_metadata(&path).await {
                Ok(mut meta) => {
                    if meta.id.is_empty() {
                        meta.id = stem;
                    }
                    lists.push(meta);
                }
                Err(e) => {
                    warn!("Skipping unreadable list file {}: {}", path.display(), e);
                }
            }
        }

        // Newest first; an empty string sorts below any timestamp
        lists.sort_by(|a, b| {
            let a = a.modified.as_deref().unwrap_or("");
            let b = b.modified.as_deref().unwrap_or("");
            b.cmp(a)
        });

        Ok(lists)
    }

    async fn get(&self, id: &str) -> StorageResult<Option<ListDocument>> {
        let Some(path) = self.path_for(id) else {
            return Ok(None);
        };

        match Self::read_document(&path).await {
            Ok(doc) => Ok(Some(doc)),
            Err(StorageError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => {
                warn!("Error reading list {}: {}", id, e);
                Ok(None)
            }
        }
    }

    async fn create(&self, input: ListInput) -> StorageResult<ListId> {
        let id = Uuid::new_v4().to_string();
        let now = timestamp_now();

        let doc = ListDocument {
            id: id.clone(),
            name: input.name.unwrap_or_else(|| DEFAULT_LIST_NAME.to_string()),
            created: Some(now.clone()),
            modified: Some(now),
            settings: input.settings.unwrap_or_default(),
            items: input.items.unwrap_or_default(),
        };

        if let Err(e) = self.write_document(&self.file_path(&id), &doc).await {
            error!("Error creating list: {}", e);
            return Err(e);
        }

        debug!("Created list {}", id);
        Ok(id)
    }

    async fn update(&self, id: &str, input: ListInput) -> StorageResult<bool> {
        let Some(path) = self.path_for(id) else {
            return Ok(false);
        };

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(false);
        }

        let lease = self.lock_for(id);
        let _guard = lease.lock.lock().await;

        // Deleted while waiting for the lock
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(false);
        }

        let existing = match Self::read_document(&path).await {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("Existing list {} is unreadable, rewriting it: {}", id, e);
                None
            }
        };

        let now = timestamp_now();
        let (existing_name, existing_created) = match existing {
            Some(doc) => (Some(doc.name), doc.created),
            None => (None, None),
        };

        let doc = ListDocument {
            id: id.to_string(),
            name: input
                .name
                .or(existing_name)
                .unwrap_or_else(|| DEFAULT_LIST_NAME.to_string()),
            created: Some(existing_created.unwrap_or_else(|| now.clone())),
            modified: Some(now),
            // Settings are replaced, never merged with the stored ones
            settings: input.settings.unwrap_or_default(),
            items: input.items.unwrap_or_default(),
        };

        match self.write_document(&path, &doc).await {
            Ok(()) => Ok(true),
            Err(e) => {
                error!("Error updating list {}: {}", id, e);
                Ok(false)
            }
        }
    }

    async fn delete(&self, id: &str) -> StorageResult<bool> {
        let Some(path) = self.path_for(id) else {
            return Ok(false);
        };

        let lease = self.lock_for(id);
        let _guard = lease.lock.lock().await;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                error!("Error deleting list {}: {}", id, e);
                Ok(false)
            }
        }
    }
}

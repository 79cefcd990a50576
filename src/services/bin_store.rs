//! src/services/bin_store.rs
//!
//! BinStore — the flat-file persistence layer. The whole bin collection
//! lives in one JSON document; every operation reads or rewrites the file
//! in full. There is deliberately no cache and no index: callers load the
//! collection, scan or mutate it in memory, and save it back.

use crate::models::bin::WasteBin;
use std::{
    io::{self, ErrorKind},
    path::PathBuf,
    sync::Arc,
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
    sync::Mutex,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bin data file `{}` is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode bin data: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// BinStore owns the data file path and the process-wide file lock.
///
/// Handlers receive a clone as axum state; clones share one lock. The lock
/// serializes individual `load` and `save` calls, never a whole
/// load-mutate-save sequence, so two concurrent writers can overwrite each
/// other's changes (last save wins). That lost-update window is an accepted
/// property of this store, not something callers can opt out of.
#[derive(Clone)]
pub struct BinStore {
    /// JSON document holding every bin record. Absent until the first save.
    pub path: PathBuf,

    lock: Arc<Mutex<()>>,
}

impl BinStore {
    /// Create a store over `path`. The file is created lazily by the first
    /// save; until then it reads back as an empty collection.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Directory the data file lives in. Temp files for atomic saves and
    /// readiness probes land here.
    pub fn data_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Read the full collection from disk.
    ///
    /// A missing file yields an empty collection without creating the file.
    /// Content that fails to parse as a bin array is reported as
    /// [`StoreError::Corrupt`].
    pub async fn load(&self) -> StoreResult<Vec<WasteBin>> {
        let _guard = self.lock.lock().await;

        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Persist the full collection, replacing the previous file contents.
    ///
    /// Writes to a temp file in the data directory and renames it over the
    /// data file, so a crash mid-save leaves either the old document or the
    /// new one, never a partial write.
    pub async fn save(&self, bins: &[WasteBin]) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(bins).map_err(StoreError::Encode)?;

        let _guard = self.lock.lock().await;

        let tmp_path = self.data_dir().join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;
        if let Err(err) = file.write_all(&json).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(err));
        }
        if let Err(err) = file.flush().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(err));
        }
        if let Err(err) = file.sync_all().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(err));
        }
        drop(file);

        if let Err(err) = fs::rename(&tmp_path, &self.path).await {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&self.path).await?;
                fs::rename(&tmp_path, &self.path).await?;
            } else {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StoreError::Io(err));
            }
        }

        debug!("persisted {} bins to {}", bins.len(), self.path.display());
        Ok(())
    }
}

/// Next identifier for a new bin: one greater than the current maximum, or 1
/// for an empty collection. Only the current max is consulted, so deleting
/// the highest-ID bin and creating a new one reassigns that same ID.
pub fn next_bin_id(bins: &[WasteBin]) -> i64 {
    bins.iter().map(|bin| bin.id).max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bin::current_timestamp;
    use tempfile::TempDir;

    fn sample_bin(id: i64, location: &str) -> WasteBin {
        WasteBin {
            id,
            location: location.to_string(),
            fill_level: 0,
            needs_collection: false,
            last_updated: current_timestamp(),
        }
    }

    fn store_in(dir: &TempDir) -> BinStore {
        BinStore::new(dir.path().join("bin_data.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_without_creating_it() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let bins = store.load().await.unwrap();
        assert!(bins.is_empty());
        assert!(!store.path.exists());
    }

    #[tokio::test]
    async fn save_then_load_returns_the_same_records_in_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let bins = vec![sample_bin(1, "North Gate"), sample_bin(2, "South Gate")];
        store.save(&bins).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, 1);
        assert_eq!(loaded[0].location, "North Gate");
        assert_eq!(loaded[1].id, 2);
        assert_eq!(loaded[1].location, "South Gate");
    }

    #[tokio::test]
    async fn save_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .save(&[sample_bin(1, "a"), sample_bin(2, "b")])
            .await
            .unwrap();
        store.save(&[sample_bin(1, "a")]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 1);
    }

    #[tokio::test]
    async fn save_leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&[sample_bin(1, "a")]).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("bin_data.json")]);
    }

    #[tokio::test]
    async fn malformed_file_is_reported_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(&store.path, b"{ definitely not a bin array").unwrap();

        match store.load().await {
            Err(StoreError::Corrupt { path, .. }) => assert_eq!(path, store.path),
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn record_with_missing_fields_is_corrupt_too() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(&store.path, br#"[{"id": 1, "location": "x"}]"#).unwrap();

        assert!(matches!(
            store.load().await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn first_id_is_one() {
        assert_eq!(next_bin_id(&[]), 1);
    }

    #[test]
    fn next_id_is_one_past_the_current_max() {
        let bins = vec![sample_bin(1, "a"), sample_bin(7, "b"), sample_bin(3, "c")];
        assert_eq!(next_bin_id(&bins), 8);
    }

    #[test]
    fn removing_the_max_frees_its_id_for_reuse() {
        let mut bins = vec![sample_bin(1, "a"), sample_bin(2, "b")];
        bins.retain(|bin| bin.id != 2);
        assert_eq!(next_bin_id(&bins), 2);
    }
}

mod hasher;

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use uuid::Uuid;

pub use self::hasher::CacheKeyHasher;
use crate::RpcClientError;

/// The directory name used for the disk cache when no override is given.
///
/// The name is inherited from the project this client descends from; keeping
/// it means existing cache directories remain usable.
pub const DEFAULT_CACHE_DIR_NAME: &str = "etherscan_cache";

/// The default time after which a cached response is considered stale.
pub const DEFAULT_EXPIRE_AFTER: Duration = Duration::from_secs(5);

const TMP_DIR: &str = "tmp";

/// Selects where cached responses are stored.
#[derive(Clone, Debug)]
pub enum CacheBackend {
    /// One JSON file per response in a directory on disk. Entries survive
    /// process restarts.
    Disk {
        /// The cache directory. Defaults to
        /// `<system temp dir>/etherscan_cache` when `None`.
        dir: Option<PathBuf>,
    },
    /// A process-local in-memory store.
    Memory,
    /// No caching; every call reaches the network.
    Disabled,
}

impl Default for CacheBackend {
    fn default() -> Self {
        CacheBackend::Disk { dir: None }
    }
}

/// The cache policy of an RPC client.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Where responses are stored.
    pub backend: CacheBackend,
    /// Entries older than this are treated as misses and refetched.
    pub expire_after: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            expire_after: DEFAULT_EXPIRE_AFTER,
        }
    }
}

/// Wrapper for IO and JSON errors specific to the cache.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An IO error
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A JSON parsing error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
struct MemoryEntry {
    value: serde_json::Value,
    stored_at: Instant,
}

#[derive(Debug)]
enum Store {
    Disk {
        cache_dir: PathBuf,
        tmp_dir: PathBuf,
    },
    Memory(RwLock<HashMap<String, MemoryEntry>>),
    Disabled,
}

/// A time-bounded store of JSON-RPC results, keyed by request fingerprint.
#[derive(Debug)]
pub(crate) struct ResponseCache {
    store: Store,
    expire_after: Duration,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        let store = match config.backend {
            CacheBackend::Disk { dir } => {
                let cache_dir =
                    dir.unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_CACHE_DIR_NAME));
                // The temporary files live inside the cache directory, so the
                // rename that publishes an entry stays on one file system.
                let tmp_dir = cache_dir.join(TMP_DIR);
                Store::Disk { cache_dir, tmp_dir }
            }
            CacheBackend::Memory => Store::Memory(RwLock::new(HashMap::new())),
            CacheBackend::Disabled => Store::Disabled,
        };

        Self {
            store,
            expire_after: config.expire_after,
        }
    }

    /// Returns the cached value for `cache_key` if a fresh entry exists.
    ///
    /// Stale and unreadable entries are dropped and reported as misses; a
    /// cache problem never fails the surrounding request.
    pub async fn read(&self, cache_key: &str) -> Option<serde_json::Value> {
        match &self.store {
            Store::Disk { cache_dir, .. } => {
                let path = entry_path(cache_dir, cache_key);
                match entry_age(&path).await {
                    Ok(age) if age < self.expire_after => read_entry(cache_key, &path).await,
                    Ok(_) => {
                        remove_entry(&path).await;
                        None
                    }
                    Err(error) => {
                        if error.kind() != io::ErrorKind::NotFound {
                            log_error(cache_key, "failed to inspect RPC response cache entry", error);
                        }
                        None
                    }
                }
            }
            Store::Memory(entries) => {
                let mut entries = entries.write().await;
                match entries.get(cache_key) {
                    Some(entry) if entry.stored_at.elapsed() < self.expire_after => {
                        Some(entry.value.clone())
                    }
                    Some(_) => {
                        entries.remove(cache_key);
                        None
                    }
                    None => None,
                }
            }
            Store::Disabled => None,
        }
    }

    /// Drops the entry for `cache_key`, if any.
    ///
    /// Used when a cached value no longer deserializes as the expected type,
    /// e.g. after a field was added to a result type.
    pub async fn remove(&self, cache_key: &str) {
        match &self.store {
            Store::Disk { cache_dir, .. } => {
                remove_entry(&entry_path(cache_dir, cache_key)).await;
            }
            Store::Memory(entries) => {
                entries.write().await.remove(cache_key);
            }
            Store::Disabled => (),
        }
    }

    /// Stores `value` under `cache_key`, overwriting any previous entry.
    pub async fn write(
        &self,
        cache_key: &str,
        value: &serde_json::Value,
    ) -> Result<(), RpcClientError> {
        match &self.store {
            Store::Disk { cache_dir, tmp_dir } => {
                ensure_cache_directory(cache_dir, cache_key).await?;
                ensure_cache_directory(tmp_dir, cache_key).await?;

                // 1. Write to a uniquely named temporary file first, so
                //    concurrent writers cannot observe a half-written entry.
                let tmp_path = tmp_dir.join(Uuid::new_v4().to_string());
                if let Err(error) = tokio::fs::write(&tmp_path, value.to_string()).await {
                    log_error(
                        cache_key,
                        "failed to write to tempfile for RPC response cache",
                        error,
                    );
                    return Ok(());
                }

                // 2. Then publish it with a rename, which is atomic on Unix.
                //    A corrupted entry is detected and dropped when read, so a
                //    non-atomic rename on other platforms is tolerable.
                let cache_path = entry_path(cache_dir, cache_key);
                if let Err(error) = tokio::fs::rename(&tmp_path, cache_path).await {
                    log_error(
                        cache_key,
                        "failed to rename temporary file for RPC response cache",
                        error,
                    );
                }

                // With many concurrent renames, files can be left behind in
                // the tmp dir on Windows.
                #[cfg(target_os = "windows")]
                if let Err(error) = tokio::fs::remove_file(&tmp_path).await {
                    if error.kind() != io::ErrorKind::NotFound {
                        log_error(
                            cache_key,
                            "failed to remove temporary file for RPC response cache",
                            error,
                        );
                    }
                }

                Ok(())
            }
            Store::Memory(entries) => {
                entries.write().await.insert(
                    cache_key.to_string(),
                    MemoryEntry {
                        value: value.clone(),
                        stored_at: Instant::now(),
                    },
                );
                Ok(())
            }
            Store::Disabled => Ok(()),
        }
    }
}

fn entry_path(cache_dir: &Path, cache_key: &str) -> PathBuf {
    cache_dir.join(format!("{cache_key}.json"))
}

async fn entry_age(path: &Path) -> io::Result<Duration> {
    let metadata = tokio::fs::metadata(path).await?;
    let modified = metadata.modified()?;
    // An entry with a modification time in the future counts as just written.
    Ok(modified.elapsed().unwrap_or_default())
}

async fn read_entry(cache_key: &str, path: &Path) -> Option<serde_json::Value> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(error) => {
                log_error(
                    cache_key,
                    "failed to deserialize item from RPC response cache",
                    error,
                );
                remove_entry(path).await;
                None
            }
        },
        Err(error) => {
            if error.kind() != io::ErrorKind::NotFound {
                log_error(cache_key, "failed to read from RPC response cache", error);
            }
            None
        }
    }
}

async fn remove_entry(path: &Path) {
    if let Err(error) = tokio::fs::remove_file(path).await {
        if error.kind() != io::ErrorKind::NotFound {
            log_error(
                path.to_str().unwrap_or("<invalid UTF-8>"),
                "failed to remove from RPC response cache",
                error,
            );
        }
    }
}

/// Don't fail the request, just log an error if we fail to read/write from
/// cache.
fn log_error(cache_key: &str, message: &'static str, error: impl Into<Error>) {
    let cache_error = RpcClientError::CacheError {
        message: message.to_string(),
        cache_key: cache_key.to_string(),
        error: error.into(),
    };
    log::error!("{cache_error}");
}

async fn ensure_cache_directory(
    directory: impl AsRef<Path>,
    cache_key: impl std::fmt::Display,
) -> Result<(), RpcClientError> {
    tokio::fs::DirBuilder::new()
        .recursive(true)
        .create(directory)
        .await
        .map_err(|error| RpcClientError::CacheError {
            message: "failed to create RPC response cache directory".to_string(),
            cache_key: cache_key.to_string(),
            error: error.into(),
        })
}

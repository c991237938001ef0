//! The seam between photo semantics and the remote backend.
//!
//! [`ObjectStore`] covers exactly what the service needs: binary puts with
//! transfer progress, gets, flat directory listings, deletes, and resolved
//! download URLs. The WebDAV implementation lives in [`crate::webdav`]; tests
//! use the in-memory store below.

use async_trait::async_trait;
use std::sync::Arc;

/// Directory for binary payloads, keyed by record id.
pub const PHOTOS_DIR: &str = "photos";

/// Directory for metadata documents, keyed by record id plus `.json`.
pub const METADATA_DIR: &str = "metadata";

/// Transfer progress callback: (bytes_transferred, total_bytes).
/// Invocations are monotonically non-decreasing in the first argument.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Errors reported by a remote object store.
#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    /// The transfer itself failed (network, server rejection).
    Transfer(String),
    Io(std::io::Error),
    Other(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(path) => write!(f, "Not found: {}", path),
            StoreError::Transfer(msg) => write!(f, "Transfer error: {}", msg),
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Asynchronous access to the remote backend.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `data` under `path`, reporting transfer progress.
    async fn put(&self, path: &str, data: Vec<u8>, on_progress: ProgressFn)
        -> Result<(), StoreError>;

    /// Download the object at `path`.
    async fn get(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Entry names (not full paths) directly under `dir`.
    async fn list(&self, dir: &str) -> Result<Vec<String>, StoreError>;

    /// Remove the object at `path`.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;

    /// Resolved download URL for `path`.
    fn download_url(&self, path: &str) -> String;
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store for service tests, with failure injection.

    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        objects: Mutex<BTreeMap<String, Vec<u8>>>,
        fail_put_prefix: Mutex<Option<String>>,
        fail_delete_prefix: Mutex<Option<String>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every put under `prefix` fail with a transfer error.
        pub fn fail_puts_under(&self, prefix: &str) {
            *self.fail_put_prefix.lock().unwrap() = Some(prefix.to_string());
        }

        /// Make every delete under `prefix` fail.
        pub fn fail_deletes_under(&self, prefix: &str) {
            *self.fail_delete_prefix.lock().unwrap() = Some(prefix.to_string());
        }

        pub fn contains(&self, path: &str) -> bool {
            self.objects.lock().unwrap().contains_key(path)
        }

        pub fn object_count(&self) -> usize {
            self.objects.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn put(
            &self,
            path: &str,
            data: Vec<u8>,
            on_progress: ProgressFn,
        ) -> Result<(), StoreError> {
            if let Some(prefix) = self.fail_put_prefix.lock().unwrap().as_deref() {
                if path.starts_with(prefix) {
                    return Err(StoreError::Transfer(format!(
                        "injected put failure for {}",
                        path
                    )));
                }
            }

            let total = data.len() as u64;
            on_progress(total / 2, total);
            on_progress(total, total);

            self.objects
                .lock()
                .unwrap()
                .insert(path.to_string(), data);
            Ok(())
        }

        async fn get(&self, path: &str) -> Result<Vec<u8>, StoreError> {
            self.objects
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(path.to_string()))
        }

        async fn list(&self, dir: &str) -> Result<Vec<String>, StoreError> {
            let prefix = format!("{}/", dir.trim_end_matches('/'));
            let names = self
                .objects
                .lock()
                .unwrap()
                .keys()
                .filter_map(|key| key.strip_prefix(&prefix))
                .filter(|rest| !rest.contains('/'))
                .map(str::to_string)
                .collect();
            Ok(names)
        }

        async fn delete(&self, path: &str) -> Result<(), StoreError> {
            if let Some(prefix) = self.fail_delete_prefix.lock().unwrap().as_deref() {
                if path.starts_with(prefix) {
                    return Err(StoreError::Transfer(format!(
                        "injected delete failure for {}",
                        path
                    )));
                }
            }

            self.objects
                .lock()
                .unwrap()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(path.to_string()))
        }

        fn download_url(&self, path: &str) -> String {
            format!("memory://{}", path)
        }
    }
}

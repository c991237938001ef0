//! WebDAV-backed object store (Nextcloud layout).
//!
//! Binary objects and metadata documents live as plain files under the
//! configured remote path. Listings and deletes go through the WebDAV
//! client; uploads stream through a plain HTTP PUT so transfer progress can
//! be observed chunk by chunk.

use crate::store::{ObjectStore, ProgressFn, StoreError, METADATA_DIR, PHOTOS_DIR};
use async_trait::async_trait;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Connection settings for the WebDAV store.
#[derive(Debug, Clone)]
pub struct PhotoStoreConfig {
    pub server_url: String,
    pub username: String,
    pub app_password: String,
    pub remote_path: String,
}

/// Object store speaking WebDAV against a Nextcloud-style server.
pub struct WebDavStore {
    config: PhotoStoreConfig,
    dav: reqwest_dav::Client,
    http: reqwest::Client,
    base_url: String,
}

impl WebDavStore {
    pub fn new(config: PhotoStoreConfig) -> Result<Self, StoreError> {
        let base_url = format!(
            "{}/remote.php/dav/files/{}",
            config.server_url.trim_end_matches('/'),
            config.username
        );

        let dav = reqwest_dav::ClientBuilder::new()
            .set_host(base_url.clone())
            .set_auth(reqwest_dav::Auth::Basic(
                config.username.clone(),
                config.app_password.clone(),
            ))
            .build()
            .map_err(|e| StoreError::Other(format!("WebDAV client error: {:?}", e)))?;

        let http = reqwest::Client::new();

        Ok(Self {
            config,
            dav,
            http,
            base_url,
        })
    }

    fn remote_path(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.remote_path.trim_end_matches('/'),
            path
        )
    }

    fn absolute_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            self.remote_path(path).trim_start_matches('/')
        )
    }

    /// Create the photo and metadata collections if they are missing.
    /// Existing collections make the server complain; that is fine.
    pub async fn ensure_layout(&self) -> Result<(), StoreError> {
        let base = self.config.remote_path.trim_end_matches('/');
        if let Err(e) = self.dav.mkcol(base).await {
            log::debug!("MKCOL base note: {:?}", e);
        }
        for dir in [PHOTOS_DIR, METADATA_DIR] {
            if let Err(e) = self.dav.mkcol(&self.remote_path(dir)).await {
                log::debug!("MKCOL {} note: {:?}", dir, e);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for WebDavStore {
    async fn put(
        &self,
        path: &str,
        data: Vec<u8>,
        on_progress: ProgressFn,
    ) -> Result<(), StoreError> {
        let total = data.len() as u64;
        let url = self.absolute_url(path);

        // The body is pulled chunk by chunk as the request streams; each
        // chunk reports the running byte count.
        let chunks: Vec<Vec<u8>> = data
            .chunks(UPLOAD_CHUNK_SIZE)
            .map(|chunk| chunk.to_vec())
            .collect();
        let mut sent: u64 = 0;
        let progress = on_progress.clone();
        let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            progress(sent, total);
            Ok::<Vec<u8>, std::io::Error>(chunk)
        }));

        let response = self
            .http
            .put(url.as_str())
            .basic_auth(
                &self.config.username,
                Some(&self.config.app_password),
            )
            .header(reqwest::header::CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await
            .map_err(|e| StoreError::Transfer(format!("PUT {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            return Err(StoreError::Transfer(format!(
                "PUT {} failed: HTTP {}",
                path,
                response.status()
            )));
        }

        on_progress(total, total);
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let response = self
            .dav
            .get(&self.remote_path(path))
            .await
            .map_err(|e| StoreError::NotFound(format!("{}: {:?}", path, e)))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Transfer(format!("GET {} failed: {}", path, e)))?;

        Ok(bytes.to_vec())
    }

    async fn list(&self, dir: &str) -> Result<Vec<String>, StoreError> {
        // Absent collections are created by ensure_layout; a listing failure
        // here is backend trouble and propagates.
        let list = self
            .dav
            .list(&self.remote_path(dir), reqwest_dav::Depth::Number(1))
            .await
            .map_err(|e| StoreError::Transfer(format!("LIST {} failed: {:?}", dir, e)))?;

        let mut names = Vec::new();
        for item in list {
            if let reqwest_dav::list_cmd::ListEntity::File(file) = item {
                if let Some(name) = file.href.split('/').last() {
                    if !name.is_empty() {
                        names.push(name.to_string());
                    }
                }
            }
        }

        Ok(names)
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.dav
            .delete(&self.remote_path(path))
            .await
            .map_err(|e| StoreError::Transfer(format!("DELETE {} failed: {:?}", path, e)))?;
        Ok(())
    }

    fn download_url(&self, path: &str) -> String {
        self.absolute_url(path)
    }
}

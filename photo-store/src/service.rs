//! Upload, list, and delete photo records against an [`ObjectStore`].

use crate::models::{
    guess_content_type, PhotoLocation, RemotePhotoRecord, UploadProgress,
};
use crate::store::{ObjectStore, ProgressFn, StoreError, METADATA_DIR, PHOTOS_DIR};
use geo_location::Location;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Result type for photo store operations
pub type PhotoStoreResult<T> = Result<T, PhotoStoreError>;

/// Errors that can occur while working with the remote photo store
#[derive(Debug)]
pub enum PhotoStoreError {
    /// The local file to upload is gone.
    FileNotFound(String),
    Io(std::io::Error),
    Store(StoreError),
    /// The metadata document could not be produced or written.
    Metadata(String),
}

impl std::fmt::Display for PhotoStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoStoreError::FileNotFound(path) => write!(f, "File not found: {}", path),
            PhotoStoreError::Io(e) => write!(f, "IO error: {}", e),
            PhotoStoreError::Store(e) => write!(f, "{}", e),
            PhotoStoreError::Metadata(msg) => write!(f, "Metadata error: {}", msg),
        }
    }
}

impl std::error::Error for PhotoStoreError {}

impl From<std::io::Error> for PhotoStoreError {
    fn from(err: std::io::Error) -> Self {
        PhotoStoreError::Io(err)
    }
}

impl From<StoreError> for PhotoStoreError {
    fn from(err: StoreError) -> Self {
        PhotoStoreError::Store(err)
    }
}

/// Callback relaying [`UploadProgress`] to the caller during an upload.
pub type OnUploadProgress = Arc<dyn Fn(UploadProgress) + Send + Sync>;

fn binary_path(id: &str) -> String {
    format!("{}/{}", PHOTOS_DIR, id)
}

fn metadata_path(id: &str) -> String {
    format!("{}/{}.json", METADATA_DIR, id)
}

/// Service for managing remote photo records
pub struct PhotoStoreService<S: ObjectStore> {
    store: S,
    last_upload_ts: AtomicI64,
}

impl<S: ObjectStore> PhotoStoreService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_upload_ts: AtomicI64::new(0),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Upload timestamp for the next record, strictly greater than any
    /// timestamp this service issued before (two uploads in the same
    /// millisecond must not collide on their id).
    fn next_upload_timestamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let prev = self
            .last_upload_ts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|prev| prev);
        now.max(prev + 1)
    }

    /// Upload a local image and write its metadata record.
    ///
    /// The identifier is `<timestamp>_<file_name>` and keys both halves.
    /// The metadata document is written only after the binary transfer fully
    /// succeeds, so a failed transfer never leaves queryable metadata
    /// behind. The reverse is not rolled back: a metadata failure after a
    /// successful transfer orphans the binary.
    ///
    /// `on_progress` sees monotonically non-decreasing percentages while
    /// uploading and exactly one terminal event (success or error).
    pub async fn upload_photo(
        &self,
        local: &Path,
        file_name: &str,
        location: &Location,
        on_progress: OnUploadProgress,
    ) -> PhotoStoreResult<String> {
        if !local.exists() {
            return Err(PhotoStoreError::FileNotFound(local.display().to_string()));
        }
        let data = std::fs::read(local)?;
        let file_size = data.len() as u64;

        let timestamp = self.next_upload_timestamp();
        let id = format!("{}_{}", timestamp, file_name);

        log::info!("Uploading photo {} ({} bytes)", id, file_size);

        let progress = on_progress.clone();
        let transfer: ProgressFn = Arc::new(move |sent, total| {
            let pct = if total == 0 {
                100.0
            } else {
                sent as f64 * 100.0 / total as f64
            };
            progress(UploadProgress::uploading(pct));
        });

        if let Err(e) = self.store.put(&binary_path(&id), data, transfer).await {
            let message = e.to_string();
            log::error!("Photo transfer failed for {}: {}", id, message);
            on_progress(UploadProgress::error(message));
            return Err(e.into());
        }

        let record = RemotePhotoRecord {
            id: id.clone(),
            image_url: self.store.download_url(&binary_path(&id)),
            location: PhotoLocation::from(location),
            timestamp,
            file_name: file_name.to_string(),
            file_size: Some(file_size),
            content_type: guess_content_type(file_name).map(str::to_string),
        };

        let document = match serde_json::to_vec(&record) {
            Ok(document) => document,
            Err(e) => {
                on_progress(UploadProgress::error(e.to_string()));
                return Err(PhotoStoreError::Metadata(e.to_string()));
            }
        };

        if let Err(e) = self
            .store
            .put(&metadata_path(&id), document, Arc::new(|_, _| {}))
            .await
        {
            let message = e.to_string();
            log::error!("Metadata write failed for {}: {}", id, message);
            on_progress(UploadProgress::error(message));
            return Err(e.into());
        }

        on_progress(UploadProgress::success());
        log::info!("Uploaded photo {}", id);
        Ok(id)
    }

    /// Every remote photo record, most recent upload first.
    pub async fn get_photos(&self) -> PhotoStoreResult<Vec<RemotePhotoRecord>> {
        let names = self.store.list(METADATA_DIR).await?;

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            if !name.ends_with(".json") {
                continue;
            }
            let bytes = self
                .store
                .get(&format!("{}/{}", METADATA_DIR, name))
                .await?;
            match serde_json::from_slice::<RemotePhotoRecord>(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping unreadable metadata document {}: {}", name, e),
            }
        }

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// Binary payload of an uploaded photo, for display.
    pub async fn get_photo_bytes(&self, id: &str) -> PhotoStoreResult<Vec<u8>> {
        Ok(self.store.get(&binary_path(id)).await?)
    }

    /// Remove a record: metadata document first, then the binary payload.
    /// The backend has no cross-store transaction; a failure between the two
    /// steps leaves an unlisted binary behind.
    pub async fn delete_photo(&self, id: &str) -> PhotoStoreResult<()> {
        log::info!("Deleting photo {}", id);
        self.store.delete(&metadata_path(id)).await?;
        self.store.delete(&binary_path(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UploadState;
    use crate::store::memory::MemoryStore;
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn test_location() -> Location {
        Location {
            latitude: 37.78825,
            longitude: -122.4324,
            accuracy: Some(9.5),
            timestamp: Some(1722855600000),
        }
    }

    fn temp_photo(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("photo-store-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, b"\xFF\xD8\xFFfake jpeg payload").unwrap();
        path
    }

    fn no_progress() -> OnUploadProgress {
        Arc::new(|_| {})
    }

    fn collecting_progress() -> (OnUploadProgress, Arc<Mutex<Vec<UploadProgress>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let callback: OnUploadProgress = Arc::new(move |p| sink.lock().unwrap().push(p));
        (callback, events)
    }

    fn timestamp_prefix(id: &str) -> i64 {
        id.split('_').next().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_upload_then_get_round_trip() {
        let service = PhotoStoreService::new(MemoryStore::new());
        let photo = temp_photo("round_trip.jpg");

        let id = service
            .upload_photo(&photo, "round_trip.jpg", &test_location(), no_progress())
            .await
            .unwrap();
        assert!(id.ends_with("_round_trip.jpg"));

        let photos = service.get_photos().await.unwrap();
        assert_eq!(photos.len(), 1);
        let record = &photos[0];
        assert_eq!(record.id, id);
        assert_eq!(record.location.latitude, 37.78825);
        assert_eq!(record.location.longitude, -122.4324);
        assert_eq!(record.location.accuracy, Some(9.5));
        assert_eq!(record.file_name, "round_trip.jpg");
        assert_eq!(record.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(record.file_size, Some(20));
        assert_eq!(record.timestamp, timestamp_prefix(&record.id));
    }

    #[tokio::test]
    async fn test_upload_ids_strictly_increase() {
        let service = PhotoStoreService::new(MemoryStore::new());
        let photo = temp_photo("increase.jpg");

        let first = service
            .upload_photo(&photo, "increase.jpg", &test_location(), no_progress())
            .await
            .unwrap();
        let second = service
            .upload_photo(&photo, "increase.jpg", &test_location(), no_progress())
            .await
            .unwrap();

        assert!(timestamp_prefix(&second) > timestamp_prefix(&first));
    }

    #[tokio::test]
    async fn test_photos_sorted_most_recent_first() {
        let service = PhotoStoreService::new(MemoryStore::new());
        let photo = temp_photo("ordering.jpg");

        for _ in 0..3 {
            service
                .upload_photo(&photo, "ordering.jpg", &test_location(), no_progress())
                .await
                .unwrap();
        }

        let photos = service.get_photos().await.unwrap();
        assert_eq!(photos.len(), 3);
        assert!(photos.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_empty_store_lists_no_photos() {
        let service = PhotoStoreService::new(MemoryStore::new());
        assert!(service.get_photos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_both_halves() {
        let service = PhotoStoreService::new(MemoryStore::new());
        let photo = temp_photo("delete.jpg");

        let id = service
            .upload_photo(&photo, "delete.jpg", &test_location(), no_progress())
            .await
            .unwrap();
        assert_eq!(service.store().object_count(), 2);

        service.delete_photo(&id).await.unwrap();

        assert!(service.get_photos().await.unwrap().is_empty());
        assert_eq!(service.store().object_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_local_file_is_rejected_before_transfer() {
        let service = PhotoStoreService::new(MemoryStore::new());

        let result = service
            .upload_photo(
                Path::new("/nowhere/gone.jpg"),
                "gone.jpg",
                &test_location(),
                no_progress(),
            )
            .await;

        assert!(matches!(result, Err(PhotoStoreError::FileNotFound(_))));
        assert_eq!(service.store().object_count(), 0);
    }

    #[tokio::test]
    async fn test_transfer_failure_writes_no_metadata() {
        let store = MemoryStore::new();
        store.fail_puts_under("photos/");
        let service = PhotoStoreService::new(store);
        let photo = temp_photo("transfer_fail.jpg");
        let (progress, events) = collecting_progress();

        let result = service
            .upload_photo(&photo, "transfer_fail.jpg", &test_location(), progress)
            .await;

        assert!(result.is_err());
        assert_eq!(service.store().object_count(), 0);
        assert!(service.get_photos().await.unwrap().is_empty());
        let events = events.lock().unwrap();
        assert_eq!(events.last().unwrap().state, UploadState::Error);
        assert!(events.last().unwrap().error.is_some());
    }

    #[tokio::test]
    async fn test_metadata_failure_leaves_binary_orphaned() {
        let store = MemoryStore::new();
        store.fail_puts_under("metadata/");
        let service = PhotoStoreService::new(store);
        let photo = temp_photo("orphan.jpg");
        let (progress, events) = collecting_progress();

        let result = service
            .upload_photo(&photo, "orphan.jpg", &test_location(), progress)
            .await;

        assert!(result.is_err());
        // The binary went through and stays behind; nothing lists it.
        assert_eq!(service.store().object_count(), 1);
        assert!(service.get_photos().await.unwrap().is_empty());
        assert_eq!(
            events.lock().unwrap().last().unwrap().state,
            UploadState::Error
        );
    }

    #[tokio::test]
    async fn test_half_failed_delete_propagates() {
        let service = PhotoStoreService::new(MemoryStore::new());
        let photo = temp_photo("half_delete.jpg");

        let id = service
            .upload_photo(&photo, "half_delete.jpg", &test_location(), no_progress())
            .await
            .unwrap();

        service.store().fail_deletes_under("photos/");
        assert!(service.delete_photo(&id).await.is_err());

        // Metadata is gone, the binary persists unlisted.
        assert!(service.get_photos().await.unwrap().is_empty());
        assert!(service.store().contains(&format!("photos/{}", id)));
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_ends_in_success() {
        let service = PhotoStoreService::new(MemoryStore::new());
        let photo = temp_photo("progress.jpg");
        let (progress, events) = collecting_progress();

        service
            .upload_photo(&photo, "progress.jpg", &test_location(), progress)
            .await
            .unwrap();

        let events = events.lock().unwrap();
        assert!(events.len() >= 2);

        let mut last_pct = 0.0;
        for event in events.iter().take(events.len() - 1) {
            assert_eq!(event.state, UploadState::Uploading);
            assert!(event.progress >= last_pct);
            last_pct = event.progress;
        }

        let terminal = events.last().unwrap();
        assert_eq!(terminal.state, UploadState::Success);
        assert_eq!(terminal.progress, 100.0);
        assert_eq!(terminal.error, None);
    }

    #[tokio::test]
    async fn test_get_photo_bytes_returns_payload() {
        let service = PhotoStoreService::new(MemoryStore::new());
        let photo = temp_photo("payload.jpg");

        let id = service
            .upload_photo(&photo, "payload.jpg", &test_location(), no_progress())
            .await
            .unwrap();

        let bytes = service.get_photo_bytes(&id).await.unwrap();
        assert_eq!(bytes, std::fs::read(&photo).unwrap());
    }
}

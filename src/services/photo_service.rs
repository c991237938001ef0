use crate::error::AppError;
use crate::services::settings;
use base64::{engine::general_purpose, Engine as _};
use geo_location::Location;
use photo_store::{
    OnUploadProgress, PhotoStoreConfig, PhotoStoreService, RemotePhotoRecord, WebDavStore,
};
use std::path::Path;
use std::sync::OnceLock;

// Global photo store service
static PHOTO_SERVICE: OnceLock<PhotoStoreService<WebDavStore>> = OnceLock::new();

/// Initialize (once) the remote photo store service from settings.toml.
fn photo_service() -> Result<&'static PhotoStoreService<WebDavStore>, AppError> {
    if let Some(service) = PHOTO_SERVICE.get() {
        return Ok(service);
    }

    let settings = settings::load_settings()?.ok_or_else(|| {
        AppError::NotConfigured(
            "Remote storage is not configured. Create settings.toml in the app data directory."
                .to_string(),
        )
    })?;

    let config = PhotoStoreConfig {
        server_url: settings.server_url,
        username: settings.username,
        app_password: settings.app_password,
        remote_path: settings.remote_path,
    };
    let store = WebDavStore::new(config).map_err(|e| AppError::Store(e.into()))?;

    Ok(PHOTO_SERVICE.get_or_init(|| PhotoStoreService::new(store)))
}

/// Upload a local photo with its location; progress is relayed to the caller.
pub async fn upload_photo(
    local: &Path,
    file_name: &str,
    location: &Location,
    on_progress: OnUploadProgress,
) -> Result<String, AppError> {
    let service = photo_service()?;
    service
        .store()
        .ensure_layout()
        .await
        .map_err(|e| AppError::Store(e.into()))?;
    service
        .upload_photo(local, file_name, location, on_progress)
        .await
        .map_err(AppError::Store)
}

/// Every remote photo record, most recent first.
pub async fn get_photos() -> Result<Vec<RemotePhotoRecord>, AppError> {
    let service = photo_service()?;
    service
        .store()
        .ensure_layout()
        .await
        .map_err(|e| AppError::Store(e.into()))?;
    service.get_photos().await.map_err(AppError::Store)
}

/// Fetch a photo's binary and inline it as a data URL for display.
/// The backend needs authentication, so a plain remote URL would not render.
pub async fn get_photo_data_url(record: &RemotePhotoRecord) -> Result<String, AppError> {
    let bytes = photo_service()?
        .get_photo_bytes(&record.id)
        .await
        .map_err(AppError::Store)?;
    let mime = record.content_type.as_deref().unwrap_or("image/jpeg");
    Ok(format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(&bytes)
    ))
}

/// Delete a record and its binary payload.
pub async fn delete_photo(id: &str) -> Result<(), AppError> {
    photo_service()?
        .delete_photo(id)
        .await
        .map_err(AppError::Store)
}

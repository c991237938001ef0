use geo_location::Location;
use serde::{Deserialize, Serialize};

/// Location embedded in a remote photo record.
///
/// Unlike [`Location`] it carries no capture timestamp; the record's upload
/// timestamp is the authoritative time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl From<&Location> for PhotoLocation {
    fn from(location: &Location) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            accuracy: location.accuracy,
        }
    }
}

/// Metadata document describing one uploaded photo.
///
/// `id` keys both halves of the record: the binary object and this document.
/// Read-only once written, except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemotePhotoRecord {
    pub id: String,
    pub image_url: String,
    pub location: PhotoLocation,
    /// Upload time in milliseconds since the epoch.
    pub timestamp: i64,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Uploading,
    Success,
    Error,
}

/// Transient progress of a single upload attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadProgress {
    /// Percentage complete, 0–100.
    pub progress: f64,
    pub state: UploadState,
    pub error: Option<String>,
}

impl UploadProgress {
    pub fn uploading(progress: f64) -> Self {
        Self {
            progress,
            state: UploadState::Uploading,
            error: None,
        }
    }

    pub fn success() -> Self {
        Self {
            progress: 100.0,
            state: UploadState::Success,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            progress: 0.0,
            state: UploadState::Error,
            error: Some(message.into()),
        }
    }
}

/// Best-effort MIME type from the file extension.
pub fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit('.').next()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_location_drops_capture_timestamp() {
        let fix = Location {
            latitude: 37.78825,
            longitude: -122.4324,
            accuracy: Some(8.0),
            timestamp: Some(1722855600000),
        };
        let embedded = PhotoLocation::from(&fix);
        assert_eq!(embedded.latitude, 37.78825);
        assert_eq!(embedded.longitude, -122.4324);
        assert_eq!(embedded.accuracy, Some(8.0));
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = RemotePhotoRecord {
            id: "1722855600000_photo_1722855600000.jpg".to_string(),
            image_url: "https://cloud.example/photos/x".to_string(),
            location: PhotoLocation {
                latitude: 48.1,
                longitude: 11.6,
                accuracy: None,
            },
            timestamp: 1722855600000,
            file_name: "photo_1722855600000.jpg".to_string(),
            file_size: Some(204_800),
            content_type: Some("image/jpeg".to_string()),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: RemotePhotoRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("a.JPG"), Some("image/jpeg"));
        assert_eq!(guess_content_type("b.webp"), Some("image/webp"));
        assert_eq!(guess_content_type("noext"), None);
    }
}

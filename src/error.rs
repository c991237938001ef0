use std::fmt;

/// Central error types for the Photolog app
#[derive(Debug)]
pub enum AppError {
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Image picker error (camera or gallery)
    Picker(crate::picker::PickerError),
    /// Geolocation error
    Location(geo_location::LocationError),
    /// Remote photo store error
    Store(photo_store::PhotoStoreError),
    /// Permission denied (e.g. camera)
    #[allow(dead_code)]
    PermissionDenied(String),
    /// Remote storage settings missing or unreadable
    NotConfigured(String),
    /// General error
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Picker(e) => write!(f, "Picker error: {}", e),
            AppError::Location(e) => write!(f, "Location error: {}", e),
            AppError::Store(e) => write!(f, "Store error: {}", e),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AppError::NotConfigured(msg) => write!(f, "Not configured: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<crate::picker::PickerError> for AppError {
    fn from(e: crate::picker::PickerError) -> Self {
        AppError::Picker(e)
    }
}

impl From<geo_location::LocationError> for AppError {
    fn from(e: geo_location::LocationError) -> Self {
        AppError::Location(e)
    }
}

impl From<photo_store::PhotoStoreError> for AppError {
    fn from(e: photo_store::PhotoStoreError) -> Self {
        AppError::Store(e)
    }
}

/// User-friendly error messages for alerts
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Picker(e) => e.to_string(),
            AppError::Location(_) => {
                "Failed to get your current location. Please try again.".to_string()
            }
            AppError::Store(e) => e.to_string(),
            AppError::PermissionDenied(msg) => format!("Permission required: {}", msg),
            AppError::NotConfigured(msg) => msg.clone(),
            AppError::Other(msg) => msg.clone(),
        }
    }
}

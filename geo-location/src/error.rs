use std::fmt;

/// Errors reported by the platform geolocation provider.
#[derive(Debug, Clone)]
pub enum LocationError {
    PermissionDenied(String),
    Timeout(String),
    PlatformNotSupported(String),
    /// Any other provider-side failure, with the provider's message.
    Provider(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            LocationError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            LocationError::PlatformNotSupported(msg) => {
                write!(f, "Platform not supported: {}", msg)
            }
            LocationError::Provider(msg) => write!(f, "Location provider error: {}", msg),
        }
    }
}

impl std::error::Error for LocationError {}

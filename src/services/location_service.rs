// Thin wrapper around geo-location to keep screens on AppError.

use crate::error::AppError;
use geo_location::{FixOptions, Location};

/// Ask for foreground location access; never fails.
pub fn request_permissions() -> bool {
    geo_location::request_permissions()
}

/// One-shot high-accuracy fix with the standard timeout.
pub fn current_location() -> Result<Location, AppError> {
    geo_location::current_location(&FixOptions::default()).map_err(AppError::from)
}

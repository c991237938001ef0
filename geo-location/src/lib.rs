//! # Geo Location
//!
//! A thin adapter over the platform geolocation capability.
//!
//! This crate provides:
//! - Foreground location permission requests
//! - One-shot high-accuracy position fixes with a timeout
//! - A continuous, cancellable location watch
//!
//! ## Platform Separation
//!
//! On Android the provider talks to the main activity over JNI and polls for
//! results. Other platforms report [`LocationError::PlatformNotSupported`]
//! rather than pretending to have a fix.

pub mod error;
pub mod models;
pub mod provider;
pub mod watch;

pub use error::LocationError;
pub use models::{FixOptions, Location};
pub use provider::{current_location, request_permissions};
pub use watch::{watch_location, LocationWatch, WatchOptions};

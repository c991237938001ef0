use serde::{Deserialize, Serialize};

/// A single geographic fix as reported by the platform provider.
///
/// Immutable once read; `accuracy` is the radius of 68% confidence in meters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Capture time in milliseconds since the epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Options for a one-shot fix request.
#[derive(Debug, Clone)]
pub struct FixOptions {
    pub high_accuracy: bool,
    /// How long to wait for the provider before giving up.
    pub timeout_ms: u64,
    /// Cached fixes younger than this are acceptable.
    pub max_age_ms: u64,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 15_000,
            max_age_ms: 10_000,
        }
    }
}

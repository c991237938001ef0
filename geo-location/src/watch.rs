//! Continuous location updates.
//!
//! A watch is resource-shaped: it keeps sampling the provider on its own
//! schedule until its handle is stopped or dropped. Updates are delivered to
//! the supplied callback, gated by movement distance and elapsed time.

use crate::models::{FixOptions, Location};
use crate::provider;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Gating options for a continuous watch.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Emit when the device moved at least this far since the last update.
    pub min_distance_m: f64,
    /// Emit at least this often regardless of movement.
    pub interval_ms: u64,
    /// Never sample the provider faster than this.
    pub fastest_interval_ms: u64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            min_distance_m: 10.0,
            interval_ms: 5_000,
            fastest_interval_ms: 2_000,
        }
    }
}

/// Handle for an active watch. Stopping is idempotent; dropping the handle
/// stops the watch as well.
#[derive(Debug)]
pub struct LocationWatch {
    stopped: Arc<AtomicBool>,
}

impl LocationWatch {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

impl Drop for LocationWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Register for continuous location updates.
///
/// The callback runs on a background task for every accepted fix. The watch
/// never completes on its own; cancel it through the returned handle.
pub fn watch_location<F>(options: WatchOptions, callback: F) -> LocationWatch
where
    F: Fn(Location) + Send + 'static,
{
    let stopped = Arc::new(AtomicBool::new(false));
    let flag = stopped.clone();

    tokio::spawn(async move {
        let fix_options = FixOptions {
            high_accuracy: true,
            timeout_ms: options.interval_ms,
            max_age_ms: options.fastest_interval_ms,
        };
        let mut last_update: Option<(Location, Instant)> = None;

        loop {
            if flag.load(Ordering::Relaxed) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(options.fastest_interval_ms)).await;
            if flag.load(Ordering::Relaxed) {
                break;
            }

            let fix = match provider::current_location(&fix_options) {
                Ok(fix) => fix,
                Err(e) => {
                    log::debug!("Watch sample failed: {}", e);
                    continue;
                }
            };

            let elapsed_ms = last_update
                .as_ref()
                .map(|(_, at)| at.elapsed().as_millis() as u64)
                .unwrap_or(u64::MAX);

            if should_emit(
                last_update.as_ref().map(|(loc, _)| loc),
                &fix,
                &options,
                elapsed_ms,
            ) {
                last_update = Some((fix.clone(), Instant::now()));
                callback(fix);
            }
        }

        log::debug!("Location watch stopped");
    });

    LocationWatch { stopped }
}

/// Whether a fresh fix passes the distance/interval gate.
pub(crate) fn should_emit(
    previous: Option<&Location>,
    next: &Location,
    options: &WatchOptions,
    elapsed_ms: u64,
) -> bool {
    match previous {
        None => true,
        Some(prev) => {
            elapsed_ms >= options.interval_ms
                || distance_meters(prev.latitude, prev.longitude, next.latitude, next.longitude)
                    >= options.min_distance_m
        }
    }
}

/// Great-circle distance between two coordinates (haversine).
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lon: f64) -> Location {
        Location {
            latitude: lat,
            longitude: lon,
            accuracy: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_distance_meters() {
        // One degree of latitude is roughly 111.2 km.
        let d = distance_meters(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);

        assert_eq!(distance_meters(52.52, 13.405, 52.52, 13.405), 0.0);
    }

    #[test]
    fn test_first_fix_always_emits() {
        let options = WatchOptions::default();
        assert!(should_emit(None, &loc(48.0, 11.0), &options, 0));
    }

    #[test]
    fn test_small_move_within_interval_is_gated() {
        let options = WatchOptions::default();
        let prev = loc(48.0, 11.0);
        // ~1 m north of the previous fix, 3 seconds later.
        let next = loc(48.000009, 11.0);
        assert!(!should_emit(Some(&prev), &next, &options, 3_000));
    }

    #[test]
    fn test_movement_beyond_min_distance_emits() {
        let options = WatchOptions::default();
        let prev = loc(48.0, 11.0);
        // ~111 m north.
        let next = loc(48.001, 11.0);
        assert!(should_emit(Some(&prev), &next, &options, 1_000));
    }

    #[test]
    fn test_interval_elapsed_emits_without_movement() {
        let options = WatchOptions::default();
        let prev = loc(48.0, 11.0);
        assert!(should_emit(Some(&prev), &prev.clone(), &options, 5_000));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let watch = watch_location(WatchOptions::default(), |_| {});
        assert!(!watch.is_stopped());
        watch.stop();
        watch.stop();
        assert!(watch.is_stopped());
    }
}

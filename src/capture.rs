//! State machine for the capture screen: select or shoot a photo, tag it
//! with the current position, upload the pair.
//!
//! The machine is pure. All IO (picker, filesystem, location fix, upload)
//! happens in the screen, which feeds outcomes back in as [`CaptureEvent`]s
//! and renders the resulting [`CaptureState`]. User-visible notifications
//! come out of [`transition`] as [`Step::alert`].

use geo_location::Location;
use photo_store::{UploadProgress, UploadState};
use std::path::PathBuf;

/// State of the capture flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CaptureState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A local photo is held; the location may still be resolving. A failed
    /// upload parks its message here so the user can retry without
    /// re-selecting.
    ImageSelected {
        image: PathBuf,
        location: Option<Location>,
        error: Option<String>,
    },
    /// An upload is in flight.
    Uploading {
        image: PathBuf,
        location: Location,
        progress: UploadProgress,
    },
}

impl CaptureState {
    pub fn image(&self) -> Option<&PathBuf> {
        match self {
            CaptureState::Idle => None,
            CaptureState::ImageSelected { image, .. } => Some(image),
            CaptureState::Uploading { image, .. } => Some(image),
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            CaptureState::Idle => None,
            CaptureState::ImageSelected { location, .. } => location.as_ref(),
            CaptureState::Uploading { location, .. } => Some(location),
        }
    }

    pub fn progress(&self) -> Option<&UploadProgress> {
        match self {
            CaptureState::Uploading { progress, .. } => Some(progress),
            _ => None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, CaptureState::Uploading { .. })
    }

    /// Upload requires both a selected image and a resolved location.
    pub fn can_upload(&self) -> bool {
        matches!(
            self,
            CaptureState::ImageSelected {
                location: Some(_),
                ..
            }
        )
    }
}

/// Everything the outside world can report to the capture flow.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// The picker closed without a selection.
    PickerCancelled,
    /// The picker reported an error code.
    PickerFailed(String),
    /// The asset the picker returned is not on local storage.
    FileMissing(String),
    /// Copying the asset into permanent storage failed.
    CopyFailed(String),
    /// The asset was copied into permanent storage at this path.
    ImageReady(PathBuf),
    LocationResolved(Location),
    LocationFailed(String),
    UploadRequested,
    UploadProgressed(UploadProgress),
    UploadSucceeded,
    UploadFailed(String),
    Reset,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: CaptureState,
    pub alert: Option<String>,
}

impl Step {
    fn silent(state: CaptureState) -> Self {
        Self { state, alert: None }
    }

    fn notify(state: CaptureState, message: impl Into<String>) -> Self {
        Self {
            state,
            alert: Some(message.into()),
        }
    }
}

pub fn transition(state: CaptureState, event: CaptureEvent) -> Step {
    match event {
        CaptureEvent::PickerCancelled => Step::silent(CaptureState::Idle),
        CaptureEvent::PickerFailed(message) => Step::notify(CaptureState::Idle, message),
        CaptureEvent::FileMissing(path) => Step::notify(
            CaptureState::Idle,
            format!("Image file does not exist: {}", path),
        ),
        CaptureEvent::CopyFailed(message) => Step::notify(
            CaptureState::Idle,
            format!("Failed to move image to accessible storage: {}", message),
        ),
        CaptureEvent::ImageReady(image) => Step::silent(CaptureState::ImageSelected {
            image,
            location: None,
            error: None,
        }),
        CaptureEvent::LocationResolved(fix) => match state {
            CaptureState::ImageSelected { image, error, .. } => {
                Step::silent(CaptureState::ImageSelected {
                    image,
                    location: Some(fix),
                    error,
                })
            }
            // A fix arriving after a reset or mid-upload changes nothing.
            other => Step::silent(other),
        },
        CaptureEvent::LocationFailed(message) => Step::notify(state, message),
        CaptureEvent::UploadRequested => match state {
            CaptureState::ImageSelected {
                image,
                location: Some(location),
                ..
            } => Step::silent(CaptureState::Uploading {
                image,
                location,
                progress: UploadProgress::uploading(0.0),
            }),
            other => Step::notify(
                other,
                "Please select an image and ensure location is available.",
            ),
        },
        CaptureEvent::UploadProgressed(progress) => match state {
            CaptureState::Uploading {
                image, location, ..
            } => Step::silent(CaptureState::Uploading {
                image,
                location,
                progress,
            }),
            other => Step::silent(other),
        },
        CaptureEvent::UploadSucceeded => {
            Step::notify(CaptureState::Idle, "Photo uploaded successfully!")
        }
        CaptureEvent::UploadFailed(message) => match state {
            CaptureState::Uploading {
                image, location, ..
            } => Step::notify(
                CaptureState::ImageSelected {
                    image,
                    location: Some(location),
                    error: Some(message.clone()),
                },
                message,
            ),
            other => Step::notify(other, message),
        },
        CaptureEvent::Reset => Step::silent(CaptureState::Idle),
    }
}

/// Caption shown above the progress bar.
pub fn progress_label(progress: &UploadProgress) -> &'static str {
    match progress.state {
        UploadState::Uploading => "Uploading...",
        UploadState::Success => "Upload Complete!",
        UploadState::Error => "Upload Failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix() -> Location {
        Location {
            latitude: 37.78825,
            longitude: -122.4324,
            accuracy: Some(5.0),
            timestamp: Some(1722855600000),
        }
    }

    fn selected(location: Option<Location>) -> CaptureState {
        CaptureState::ImageSelected {
            image: PathBuf::from("/data/documents/photo_1.jpg"),
            location,
            error: None,
        }
    }

    #[test]
    fn test_picker_cancel_is_silent_and_idle() {
        let step = transition(CaptureState::Idle, CaptureEvent::PickerCancelled);
        assert_eq!(step.state, CaptureState::Idle);
        assert_eq!(step.alert, None);
    }

    #[test]
    fn test_missing_file_stays_idle_with_alert() {
        let step = transition(
            CaptureState::Idle,
            CaptureEvent::FileMissing("file:///cache/IMG1.jpg".to_string()),
        );
        assert_eq!(step.state, CaptureState::Idle);
        assert!(step.alert.unwrap().contains("does not exist"));
    }

    #[test]
    fn test_copied_image_becomes_selection() {
        let permanent = PathBuf::from("/data/documents/photo_1722855600000.jpg");
        let step = transition(
            CaptureState::Idle,
            CaptureEvent::ImageReady(permanent.clone()),
        );
        assert_eq!(
            step.state,
            CaptureState::ImageSelected {
                image: permanent,
                location: None,
                error: None,
            }
        );
        assert_eq!(step.alert, None);
    }

    #[test]
    fn test_location_attaches_to_selection() {
        let step = transition(selected(None), CaptureEvent::LocationResolved(fix()));
        assert_eq!(step.state.location(), Some(&fix()));
        assert!(step.state.can_upload());
    }

    #[test]
    fn test_location_fix_after_reset_is_ignored() {
        let step = transition(CaptureState::Idle, CaptureEvent::LocationResolved(fix()));
        assert_eq!(step.state, CaptureState::Idle);
    }

    #[test]
    fn test_location_failure_keeps_state() {
        let step = transition(
            selected(None),
            CaptureEvent::LocationFailed("Failed to get your current location.".to_string()),
        );
        assert_eq!(step.state, selected(None));
        assert!(step.alert.is_some());
    }

    #[test]
    fn test_upload_without_location_is_refused() {
        let state = selected(None);
        assert!(!state.can_upload());

        let step = transition(state.clone(), CaptureEvent::UploadRequested);
        assert_eq!(step.state, state);
        assert_eq!(
            step.alert.as_deref(),
            Some("Please select an image and ensure location is available.")
        );
    }

    #[test]
    fn test_upload_flow_reaches_complete_and_resets() {
        let mut state = selected(Some(fix()));

        state = transition(state, CaptureEvent::UploadRequested).state;
        assert_eq!(state.progress().unwrap().progress, 0.0);

        for pct in [0.0, 42.0, 100.0] {
            state = transition(
                state,
                CaptureEvent::UploadProgressed(UploadProgress::uploading(pct)),
            )
            .state;
        }
        state = transition(
            state,
            CaptureEvent::UploadProgressed(UploadProgress::success()),
        )
        .state;
        assert_eq!(progress_label(state.progress().unwrap()), "Upload Complete!");

        let step = transition(state, CaptureEvent::UploadSucceeded);
        assert_eq!(step.state, CaptureState::Idle);
        assert_eq!(step.alert.as_deref(), Some("Photo uploaded successfully!"));
    }

    #[test]
    fn test_upload_failure_retains_selection_for_retry() {
        let mut state = selected(Some(fix()));
        state = transition(state, CaptureEvent::UploadRequested).state;

        let step = transition(
            state,
            CaptureEvent::UploadFailed("Transfer error: connection reset".to_string()),
        );
        assert_eq!(step.alert.as_deref(), Some("Transfer error: connection reset"));
        match &step.state {
            CaptureState::ImageSelected {
                location, error, ..
            } => {
                assert_eq!(location.as_ref(), Some(&fix()));
                assert!(error.is_some());
            }
            other => panic!("expected retained selection, got {:?}", other),
        }
        // Retry is possible without re-selecting.
        assert!(step.state.can_upload());
    }

    #[test]
    fn test_reset_clears_any_state() {
        for state in [
            CaptureState::Idle,
            selected(Some(fix())),
            CaptureState::Uploading {
                image: PathBuf::from("/data/documents/photo_1.jpg"),
                location: fix(),
                progress: UploadProgress::uploading(50.0),
            },
        ] {
            let step = transition(state, CaptureEvent::Reset);
            assert_eq!(step.state, CaptureState::Idle);
            assert_eq!(step.alert, None);
        }
    }
}

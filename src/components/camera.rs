use crate::capture::{progress_label, transition, CaptureEvent, CaptureState, Step};
use crate::filesystem;
use crate::picker::{self, PickerError, PickerOptions};
use crate::services::{location_service, photo_service};
use base64::{engine::general_purpose, Engine as _};
use dioxus::prelude::*;
use photo_store::OnUploadProgress;
use std::path::PathBuf;
use std::sync::Arc;

#[component]
pub fn CameraScreen() -> Element {
    let mut capture = use_signal(CaptureState::default);
    let mut alert = use_signal(|| None::<String>);
    let mut has_location_permission = use_signal(|| false);
    let mut busy = use_signal(|| false);

    let mut apply_step = move |step: Step| {
        if let Some(message) = step.alert {
            alert.set(Some(message));
        }
        capture.set(step.state);
    };

    // One-time permission check on first entry; re-checked only through the
    // "Enable Location" button.
    use_effect(move || {
        spawn(async move {
            let granted = location_service::request_permissions();
            has_location_permission.set(granted);
            if !granted {
                alert.set(Some(
                    "This app needs location access to tag your photos with GPS coordinates."
                        .to_string(),
                ));
            }
        });
    });

    // Shared tail of both picker flows: validate, move into permanent
    // storage, then tag the fresh selection with a fix (fire-and-forget).
    let mut handle_picked = move |picked: Result<PathBuf, PickerError>| match picked {
        Ok(asset) => {
            if !filesystem::file_exists(&asset) {
                apply_step(transition(
                    capture(),
                    CaptureEvent::FileMissing(asset.display().to_string()),
                ));
                return;
            }
            let file_name = format!("photo_{}.jpg", chrono::Utc::now().timestamp_millis());
            match filesystem::copy_into_documents(&asset, &file_name) {
                Ok(permanent) => {
                    apply_step(transition(capture(), CaptureEvent::ImageReady(permanent)));
                    if has_location_permission() {
                        spawn(async move {
                            match location_service::current_location() {
                                Ok(fix) => apply_step(transition(
                                    capture(),
                                    CaptureEvent::LocationResolved(fix),
                                )),
                                Err(e) => {
                                    log::error!("Error getting location: {}", e);
                                    apply_step(transition(
                                        capture(),
                                        CaptureEvent::LocationFailed(e.user_message()),
                                    ));
                                }
                            }
                        });
                    }
                }
                Err(e) => apply_step(transition(
                    capture(),
                    CaptureEvent::CopyFailed(e.to_string()),
                )),
            }
        }
        Err(PickerError::Cancelled) => {
            apply_step(transition(capture(), CaptureEvent::PickerCancelled))
        }
        Err(e) => apply_step(transition(capture(), CaptureEvent::PickerFailed(e.to_string()))),
    };

    let take_photo = move |_| {
        busy.set(true);
        alert.set(None);
        spawn(async move {
            if !picker::request_camera_permission() {
                alert.set(Some(
                    "Camera permission is required to take photos.".to_string(),
                ));
            } else {
                handle_picked(picker::capture_photo(&PickerOptions::default()));
            }
            busy.set(false);
        });
    };

    let pick_from_gallery = move |_| {
        busy.set(true);
        alert.set(None);
        spawn(async move {
            handle_picked(picker::pick_image(&PickerOptions::default()));
            busy.set(false);
        });
    };

    let upload_photo = move |_| {
        let state = capture();
        if !state.can_upload() {
            // Refused before the store adapter is ever contacted.
            apply_step(transition(state, CaptureEvent::UploadRequested));
            return;
        }
        apply_step(transition(state, CaptureEvent::UploadRequested));
        let (image, location) = match capture() {
            CaptureState::Uploading {
                image, location, ..
            } => (image, location),
            _ => return,
        };

        busy.set(true);
        spawn(async move {
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
            let on_progress: OnUploadProgress = Arc::new(move |progress| {
                let _ = tx.send(progress);
            });

            let file_name = format!("photo_{}.jpg", chrono::Utc::now().timestamp_millis());
            let mut upload = Box::pin(photo_service::upload_photo(
                &image,
                &file_name,
                &location,
                on_progress,
            ));

            // Relay progress into the screen while the upload runs.
            let result = loop {
                tokio::select! {
                    progress = rx.recv() => {
                        if let Some(progress) = progress {
                            apply_step(transition(
                                capture(),
                                CaptureEvent::UploadProgressed(progress),
                            ));
                        }
                    }
                    result = &mut upload => break result,
                }
            };
            drop(upload);
            while let Ok(progress) = rx.try_recv() {
                apply_step(transition(
                    capture(),
                    CaptureEvent::UploadProgressed(progress),
                ));
            }

            match result {
                Ok(id) => {
                    log::info!("Upload finished: {}", id);
                    apply_step(transition(capture(), CaptureEvent::UploadSucceeded));
                }
                Err(e) => {
                    log::error!("Upload error: {}", e);
                    apply_step(transition(
                        capture(),
                        CaptureEvent::UploadFailed(e.user_message()),
                    ));
                }
            }
            busy.set(false);
        });
    };

    let reset_selection = move |_| apply_step(transition(capture(), CaptureEvent::Reset));

    let enable_location = move |_| {
        spawn(async move {
            let granted = location_service::request_permissions();
            has_location_permission.set(granted);
            if !granted {
                alert.set(Some(
                    "This app needs location access to tag your photos with GPS coordinates."
                        .to_string(),
                ));
            }
        });
    };

    // Preview of the selected local image as a data URL.
    let preview = use_memo(move || {
        let state = capture();
        state
            .image()
            .and_then(|path| std::fs::read(path).ok())
            .map(|bytes| {
                format!(
                    "data:image/jpeg;base64,{}",
                    general_purpose::STANDARD.encode(bytes)
                )
            })
    });

    let state = capture();
    let location = state.location().cloned();
    let progress = state.progress().cloned();
    let is_uploading = state.is_uploading();
    let can_upload = state.can_upload();
    let has_image = state.image().is_some();
    let disabled = busy() || is_uploading;

    rsx! {
        div { style: "padding: 16px; max-width: 600px; margin: 0 auto; min-height: 100vh; background: #f5f5f5;",

            h1 { style: "color: #1976d2; font-size: 24px; font-weight: 700; text-align: center; margin: 8px 0 24px 0;",
                "📷 Photo Logger"
            }

            if let Some(message) = alert() {
                div { style: "display: flex; align-items: center; background: #fff3e0; border: 1px solid #ffcc80; color: #e65100; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                    div { style: "flex: 1;", "⚠️ {message}" }
                    button {
                        style: "border: none; background: none; cursor: pointer; font-size: 16px; color: #e65100;",
                        onclick: move |_| alert.set(None),
                        "✕"
                    }
                }
            }

            if let Some(url) = preview() {
                div { style: "position: relative; margin-bottom: 20px; height: 300px; background: #f0f0f0; border-radius: 10px; overflow: hidden;",
                    img {
                        src: "{url}",
                        style: "width: 100%; height: 100%; object-fit: cover;",
                    }
                    button {
                        style: "position: absolute; bottom: 10px; left: 10px; padding: 8px 16px; border: none; border-radius: 8px; background: rgba(0, 0, 0, 0.6); color: white; cursor: pointer;",
                        onclick: reset_selection,
                        "Reset"
                    }
                }
            }

            if let Some(fix) = location {
                div { style: "padding: 15px; background: #ffffff; border-radius: 10px; margin-bottom: 20px;",
                    div { style: "font-size: 16px; font-weight: 700;",
                        {format!("📍 {:.6}, {:.6}", fix.latitude, fix.longitude)}
                    }
                    if let Some(accuracy) = fix.accuracy {
                        div { style: "font-size: 14px; color: #888;",
                            {format!("Accuracy: ±{:.1}m", accuracy)}
                        }
                    }
                }
            }

            if let Some(progress) = progress {
                div { style: "padding: 15px; background: #ffffff; border-radius: 10px; margin-bottom: 20px;",
                    div { style: "font-size: 16px; text-align: center;",
                        {progress_label(&progress)}
                    }
                    div { style: "height: 8px; background: #e0e0e0; border-radius: 4px; margin: 10px 0; overflow: hidden;",
                        div { style: format!("height: 100%; width: {:.0}%; background: #1976d2;", progress.progress) }
                    }
                    div { style: "text-align: center; font-weight: 700;",
                        {format!("{:.0}%", progress.progress)}
                    }
                }
            }

            div { style: "display: flex; gap: 12px; margin-bottom: 16px;",
                button {
                    style: "flex: 1; padding: 14px; border: none; border-radius: 8px; background: #1976d2; color: white; cursor: pointer;",
                    disabled,
                    onclick: take_photo,
                    if busy() { "⏳ Working..." } else { "📸 Take Photo" }
                }
                button {
                    style: "flex: 1; padding: 14px; border: none; border-radius: 8px; background: #1976d2; color: white; cursor: pointer;",
                    disabled,
                    onclick: pick_from_gallery,
                    if busy() { "⏳ Working..." } else { "🖼️ Pick from Gallery" }
                }
            }

            if has_image && (can_upload || is_uploading) {
                button {
                    style: "width: 100%; padding: 14px; border: none; border-radius: 8px; background: #2e7d32; color: white; cursor: pointer; margin-bottom: 16px;",
                    disabled,
                    onclick: upload_photo,
                    if is_uploading { "Uploading..." } else { "🚀 Upload Photo" }
                }
            }

            if !has_location_permission() {
                button {
                    style: "width: 100%; padding: 14px; border-radius: 8px; background: #ffffff; color: #1976d2; border: 1px solid #1976d2; cursor: pointer;",
                    onclick: enable_location,
                    "📍 Enable Location"
                }
            }
        }
    }
}

//! Display of remotely stored photos.
//!
//! Binaries come through the store adapter and are inlined as data URLs;
//! the component owns its own loading state.

use crate::services::photo_service;
use dioxus::prelude::*;
use photo_store::RemotePhotoRecord;

#[derive(Debug, Clone)]
enum ImageLoadState {
    Loading,
    Loaded(String),
    Failed,
}

/// A single remote photo, fetched once on mount.
#[component]
pub fn RemoteImage(
    record: RemotePhotoRecord,
    #[props(default = "height: 200px;".to_string())] frame_style: String,
) -> Element {
    let mut image_state = use_signal(|| ImageLoadState::Loading);

    use_effect(move || {
        let record = record.clone();
        spawn(async move {
            match photo_service::get_photo_data_url(&record).await {
                Ok(url) => image_state.set(ImageLoadState::Loaded(url)),
                Err(e) => {
                    log::warn!("Failed to load photo {}: {}", record.id, e);
                    image_state.set(ImageLoadState::Failed);
                }
            }
        });
    });

    rsx! {
        div {
            style: "width: 100%; {frame_style} border-radius: 8px; overflow: hidden; background: #f0f0f0;",
            match image_state() {
                ImageLoadState::Loading => rsx! {
                    div {
                        style: "width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; color: #999;",
                        "⏳"
                    }
                },
                ImageLoadState::Loaded(url) => rsx! {
                    img {
                        src: "{url}",
                        style: "width: 100%; height: 100%; object-fit: cover;",
                    }
                },
                ImageLoadState::Failed => rsx! {
                    div {
                        style: "width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; color: #999;",
                        "📷"
                    }
                },
            }
        }
    }
}

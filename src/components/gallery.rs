use crate::components::RemoteImage;
use crate::services::photo_service;
use chrono::TimeZone;
use dioxus::prelude::*;
use photo_store::RemotePhotoRecord;

/// Upload timestamp rendered in local time.
pub(crate) fn format_timestamp(timestamp_ms: i64) -> String {
    match chrono::Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

#[component]
pub fn GalleryScreen() -> Element {
    let mut photos = use_signal(Vec::<RemotePhotoRecord>::new);
    let mut loading = use_signal(|| true);
    let mut alert = use_signal(|| None::<String>);
    let mut fullscreen = use_signal(|| None::<RemotePhotoRecord>);
    let mut pending_delete = use_signal(|| None::<String>);

    // Fetch once on mount.
    use_effect(move || {
        spawn(async move {
            loading.set(true);
            match photo_service::get_photos().await {
                Ok(fetched) => photos.set(fetched),
                Err(e) => {
                    log::error!("Error loading photos: {}", e);
                    alert.set(Some("Failed to load photos. Please try again.".to_string()));
                }
            }
            loading.set(false);
        });
    });

    let confirm_delete = move |id: String| {
        spawn(async move {
            match photo_service::delete_photo(&id).await {
                Ok(()) => {
                    photos.write().retain(|p| p.id != id);
                    alert.set(Some("Photo deleted successfully!".to_string()));
                }
                Err(e) => {
                    log::error!("Error deleting photo: {}", e);
                    alert.set(Some(
                        "Failed to delete photo. Please try again.".to_string(),
                    ));
                }
            }
            pending_delete.set(None);
        });
    };

    if loading() {
        return rsx! {
            div { style: "display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100%; color: #666;",
                div { style: "font-size: 32px;", "⏳" }
                div { style: "margin-top: 10px; font-size: 16px;", "Loading photos..." }
            }
        };
    }

    let count = photos().len();

    rsx! {
        div { style: "min-height: 100vh; background: #f5f5f5;",

            div { style: "padding: 20px; background: #ffffff; border-bottom: 1px solid #e0e0e0;",
                h1 { style: "font-size: 24px; font-weight: 700; text-align: center; margin: 0;",
                    "🖼️ Photo Gallery"
                }
                div { style: "font-size: 16px; text-align: center; margin-top: 5px; opacity: 0.7;",
                    if count == 1 {
                        "1 photo uploaded"
                    } else {
                        {format!("{} photos uploaded", count)}
                    }
                }
            }

            if let Some(message) = alert() {
                div { style: "display: flex; align-items: center; background: #fff3e0; border: 1px solid #ffcc80; color: #e65100; padding: 12px; margin: 10px; border-radius: 8px; font-size: 14px;",
                    div { style: "flex: 1;", "{message}" }
                    button {
                        style: "border: none; background: none; cursor: pointer; font-size: 16px; color: #e65100;",
                        onclick: move |_| alert.set(None),
                        "✕"
                    }
                }
            }

            if count == 0 {
                div { style: "display: flex; flex-direction: column; align-items: center; justify-content: center; padding: 60px 20px; text-align: center;",
                    div { style: "font-size: 18px; font-weight: 600; margin-bottom: 10px;",
                        "No photos uploaded yet"
                    }
                    div { style: "font-size: 14px; opacity: 0.7;",
                        "Take some photos and upload them to see them here!"
                    }
                }
            } else {
                div { style: "padding: 10px;",
                    for photo in photos() {
                        div {
                            key: "{photo.id}",
                            style: "background: #ffffff; border-radius: 10px; margin-bottom: 15px; padding: 15px;",

                            div {
                                style: "cursor: pointer;",
                                onclick: {
                                    let photo = photo.clone();
                                    move |_| fullscreen.set(Some(photo.clone()))
                                },
                                RemoteImage { record: photo.clone() }
                            }

                            div { style: "margin-top: 10px;",
                                div { style: "font-size: 14px; font-weight: 600; margin-bottom: 5px;",
                                    {format_timestamp(photo.timestamp)}
                                }
                                div { style: "font-size: 14px; margin-bottom: 3px;",
                                    {format!("📍 {:.4}, {:.4}", photo.location.latitude, photo.location.longitude)}
                                }
                                if let Some(accuracy) = photo.location.accuracy {
                                    div { style: "font-size: 12px; opacity: 0.7; margin-bottom: 10px;",
                                        {format!("Accuracy: ±{:.1}m", accuracy)}
                                    }
                                }

                                div { style: "display: flex; gap: 10px; margin-top: 10px;",
                                    button {
                                        style: "flex: 1; padding: 10px; border: none; border-radius: 8px; background: #2196f3; color: white; cursor: pointer;",
                                        onclick: {
                                            let latitude = photo.location.latitude;
                                            let longitude = photo.location.longitude;
                                            move |_| {
                                                alert.set(Some(format!(
                                                    "Would open: https://www.google.com/maps?q={},{}",
                                                    latitude, longitude
                                                )));
                                            }
                                        },
                                        "🗺️ Maps"
                                    }
                                    button {
                                        style: "flex: 1; padding: 10px; border: none; border-radius: 8px; background: #f44336; color: white; cursor: pointer;",
                                        onclick: {
                                            let id = photo.id.clone();
                                            move |_| pending_delete.set(Some(id.clone()))
                                        },
                                        "🗑️ Delete"
                                    }
                                }
                            }
                        }
                    }
                }
            }

            // Full image overlay
            if let Some(record) = fullscreen() {
                div { style: "position: fixed; top: 0; left: 0; right: 0; bottom: 0; background: rgba(0, 0, 0, 0.95); z-index: 1000; display: flex; flex-direction: column;",
                    div { style: "display: flex; justify-content: flex-end; padding: 16px;",
                        button {
                            style: "width: 40px; height: 40px; background: rgba(255, 255, 255, 0.2); color: white; border-radius: 50%; font-size: 20px; cursor: pointer; border: none;",
                            onclick: move |_| fullscreen.set(None),
                            "✕"
                        }
                    }
                    div { style: "flex: 1; display: flex; align-items: center; justify-content: center; padding: 20px;",
                        RemoteImage { record: record.clone(), frame_style: "height: 70vh;".to_string() }
                    }
                }
            }

            // Delete confirmation
            if let Some(id) = pending_delete() {
                div { style: "position: fixed; top: 0; left: 0; right: 0; bottom: 0; background: rgba(0, 0, 0, 0.5); z-index: 1000; display: flex; align-items: center; justify-content: center;",
                    div { style: "background: #ffffff; border-radius: 10px; padding: 20px; margin: 20px; max-width: 400px;",
                        div { style: "font-size: 18px; font-weight: 700; margin-bottom: 10px;",
                            "Delete Photo"
                        }
                        div { style: "font-size: 14px; margin-bottom: 20px;",
                            "Are you sure you want to delete this photo?"
                        }
                        div { style: "display: flex; gap: 10px;",
                            button {
                                style: "flex: 1; padding: 12px; border: none; border-radius: 8px; background: #e0e0e0; cursor: pointer;",
                                onclick: move |_| pending_delete.set(None),
                                "Cancel"
                            }
                            button {
                                style: "flex: 1; padding: 12px; border: none; border-radius: 8px; background: #f44336; color: white; cursor: pointer;",
                                onclick: move |_| { confirm_delete(id.clone()); },
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_is_stable_for_invalid_input() {
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn test_format_timestamp_renders_date_and_time() {
        let rendered = format_timestamp(1722855600000);
        assert_eq!(rendered.len(), 19);
        assert!(rendered.contains("202"));
        assert!(rendered.contains(':'));
    }
}

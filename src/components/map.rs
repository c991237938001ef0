use super::gallery::format_timestamp;
use crate::components::RemoteImage;
use crate::services::photo_service;
use dioxus::prelude::*;
use photo_store::RemotePhotoRecord;

/// Visible map region: center plus span, in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            latitude: 37.78825,
            longitude: -122.4324,
            latitude_delta: 0.0922,
            longitude_delta: 0.0421,
        }
    }
}

impl Region {
    /// Default span centered on a coordinate.
    pub fn centered_on(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    /// Shift the center by fractions of the visible span
    /// (positive `dx` east, positive `dy` north).
    pub fn pan(&self, dx: f64, dy: f64) -> Self {
        Self {
            latitude: self.latitude + dy * self.latitude_delta,
            longitude: self.longitude + dx * self.longitude_delta,
            ..self.clone()
        }
    }

    /// Scale the visible span; factors below 1.0 zoom in.
    pub fn zoom(&self, factor: f64) -> Self {
        Self {
            latitude_delta: self.latitude_delta * factor,
            longitude_delta: self.longitude_delta * factor,
            ..self.clone()
        }
    }
}

/// Project a coordinate into viewport fractions (x right, y down, 0..1).
/// Equirectangular; adequate at the city-scale spans the region uses.
/// `None` when the coordinate falls outside the visible region.
pub(crate) fn project(region: &Region, latitude: f64, longitude: f64) -> Option<(f64, f64)> {
    let west = region.longitude - region.longitude_delta / 2.0;
    let north = region.latitude + region.latitude_delta / 2.0;
    let x = (longitude - west) / region.longitude_delta;
    let y = (north - latitude) / region.latitude_delta;
    if (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y) {
        Some((x, y))
    } else {
        None
    }
}

const MARKER_COLORS: [&str; 6] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD",
];

fn marker_color(index: usize) -> &'static str {
    MARKER_COLORS[index % MARKER_COLORS.len()]
}

#[component]
pub fn MapScreen() -> Element {
    let mut photos = use_signal(Vec::<RemotePhotoRecord>::new);
    let mut loading = use_signal(|| true);
    let mut alert = use_signal(|| None::<String>);
    let mut region = use_signal(Region::default);
    let mut selected = use_signal(|| None::<RemotePhotoRecord>);

    // Fetch once on mount; recenter on the most recent photo if any exist.
    use_effect(move || {
        spawn(async move {
            loading.set(true);
            match photo_service::get_photos().await {
                Ok(fetched) => {
                    if let Some(first) = fetched.first() {
                        region.set(Region::centered_on(
                            first.location.latitude,
                            first.location.longitude,
                        ));
                    }
                    photos.set(fetched);
                }
                Err(e) => {
                    log::error!("Error loading photos: {}", e);
                    alert.set(Some("Failed to load photos. Please try again.".to_string()));
                }
            }
            loading.set(false);
        });
    });

    if loading() {
        return rsx! {
            div { style: "display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100%; color: #666;",
                div { style: "font-size: 32px;", "⏳" }
                div { style: "margin-top: 10px; font-size: 16px;", "Loading map..." }
            }
        };
    }

    let count = photos().len();
    let control_style = "width: 36px; height: 36px; border: none; border-radius: 8px; background: rgba(255, 255, 255, 0.9); cursor: pointer; font-size: 16px;";

    rsx! {
        div { style: "min-height: 100vh; background: #f5f5f5;",

            div { style: "padding: 20px; background: #ffffff; border-bottom: 1px solid #e0e0e0;",
                h1 { style: "font-size: 24px; font-weight: 700; text-align: center; margin: 0;",
                    "🗺️ Photo Map"
                }
                div { style: "font-size: 16px; text-align: center; margin-top: 5px; opacity: 0.7;",
                    if count == 1 {
                        "1 photo on map"
                    } else {
                        {format!("{} photos on map", count)}
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

            // Map viewport; the region is adjustable and kept across
            // re-renders, but not persisted.
            div { style: "position: relative; height: 60vh; margin: 10px; border-radius: 10px; overflow: hidden; background: linear-gradient(#dcebdc, #cfe3cf);",

                for (index, photo) in photos().into_iter().enumerate() {
                    if let Some((x, y)) = project(&region(), photo.location.latitude, photo.location.longitude) {
                        button {
                            key: "{photo.id}",
                            style: format!(
                                "position: absolute; left: {:.2}%; top: {:.2}%; transform: translate(-50%, -50%); width: 22px; height: 22px; border-radius: 50%; border: 2px solid #ffffff; background: {}; cursor: pointer;",
                                x * 100.0,
                                y * 100.0,
                                marker_color(index),
                            ),
                            onclick: {
                                let photo = photo.clone();
                                move |_| selected.set(Some(photo.clone()))
                            },
                        }
                    }
                }

                div { style: "position: absolute; top: 10px; right: 10px; display: flex; flex-direction: column; gap: 6px;",
                    button { style: control_style, onclick: move |_| { let r = region(); region.set(r.zoom(0.5)); }, "+" }
                    button { style: control_style, onclick: move |_| { let r = region(); region.set(r.zoom(2.0)); }, "−" }
                    button { style: control_style, onclick: move |_| { let r = region(); region.set(r.pan(0.0, 0.25)); }, "↑" }
                    button { style: control_style, onclick: move |_| { let r = region(); region.set(r.pan(0.0, -0.25)); }, "↓" }
                    button { style: control_style, onclick: move |_| { let r = region(); region.set(r.pan(-0.25, 0.0)); }, "←" }
                    button { style: control_style, onclick: move |_| { let r = region(); region.set(r.pan(0.25, 0.0)); }, "→" }
                }

                if count > 0 {
                    div { style: "position: absolute; bottom: 10px; left: 10px; right: 10px; background: rgba(0, 0, 0, 0.7); color: #ffffff; padding: 10px; border-radius: 8px; text-align: center; font-size: 12px;",
                        "Tap markers to view photo details"
                    }
                }
            }

            // Photo detail overlay
            if let Some(photo) = selected() {
                div { style: "position: fixed; top: 0; left: 0; right: 0; bottom: 0; background: rgba(0, 0, 0, 0.5); z-index: 1000; display: flex; align-items: flex-end;",
                    div { style: "background: #ffffff; border-radius: 20px 20px 0 0; padding: 20px; width: 100%; max-height: 80vh; overflow-y: auto;",

                        RemoteImage { record: photo.clone(), frame_style: "height: 300px;".to_string() }

                        div { style: "margin: 15px 0 20px 0;",
                            div { style: "font-size: 18px; font-weight: 700; margin-bottom: 10px;",
                                "📸 Photo Details"
                            }
                            div { style: "font-size: 14px; margin-bottom: 5px;",
                                {format!("📅 {}", format_timestamp(photo.timestamp))}
                            }
                            div { style: "font-size: 14px; margin-bottom: 5px;",
                                {format!("📍 {:.6}, {:.6}", photo.location.latitude, photo.location.longitude)}
                            }
                            if let Some(accuracy) = photo.location.accuracy {
                                div { style: "font-size: 14px; margin-bottom: 5px;",
                                    {format!("🎯 Accuracy: ±{:.1}m", accuracy)}
                                }
                            }
                            if let Some(size) = photo.file_size {
                                div { style: "font-size: 14px; margin-bottom: 5px;",
                                    {format!("💾 Size: {:.2} MB", size as f64 / 1024.0 / 1024.0)}
                                }
                            }
                        }

                        button {
                            style: "width: 100%; padding: 12px; border: none; border-radius: 8px; background: #2196f3; color: white; cursor: pointer;",
                            onclick: move |_| selected.set(None),
                            "Close"
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
    fn test_default_region_is_the_fixed_fallback() {
        let region = Region::default();
        assert_eq!(region.latitude, 37.78825);
        assert_eq!(region.longitude, -122.4324);
        assert_eq!(region.latitude_delta, 0.0922);
        assert_eq!(region.longitude_delta, 0.0421);
    }

    #[test]
    fn test_project_center_lands_mid_viewport() {
        let region = Region::default();
        let (x, y) = project(&region, region.latitude, region.longitude).unwrap();
        assert!((x - 0.5).abs() < 1e-9);
        assert!((y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_project_edges() {
        let region = Region::centered_on(0.0, 0.0);
        // North-west corner maps to the top-left.
        let (x, y) = project(
            &region,
            region.latitude_delta / 2.0,
            -region.longitude_delta / 2.0,
        )
        .unwrap();
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_project_outside_region_is_none() {
        let region = Region::default();
        assert_eq!(project(&region, 48.1351, 11.5820), None);
    }

    #[test]
    fn test_zoom_scales_the_span() {
        let region = Region::default();
        let zoomed = region.zoom(0.5);
        assert_eq!(zoomed.latitude, region.latitude);
        assert_eq!(zoomed.latitude_delta, region.latitude_delta * 0.5);
        assert_eq!(zoomed.longitude_delta, region.longitude_delta * 0.5);
    }

    #[test]
    fn test_pan_shifts_the_center_by_span_fractions() {
        let region = Region::default();
        let panned = region.pan(0.25, -0.25);
        assert!((panned.longitude - (region.longitude + 0.25 * region.longitude_delta)).abs() < 1e-12);
        assert!((panned.latitude - (region.latitude - 0.25 * region.latitude_delta)).abs() < 1e-12);
        assert_eq!(panned.latitude_delta, region.latitude_delta);
    }
}

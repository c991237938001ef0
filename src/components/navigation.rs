use crate::Screen;
use dioxus::prelude::*;

#[component]
pub fn NavigationBar(current_screen: Screen, on_navigate: EventHandler<Screen>) -> Element {
    let nav_style = "display: flex; justify-content: space-around; padding: 10px; background: #ffffff; border-top: 1px solid #e0e0e0;";
    let active = "flex: 1; padding: 12px; margin: 0 5px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px; text-align: center; background: #1976d2; color: #ffffff;";
    let inactive = "flex: 1; padding: 12px; margin: 0 5px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px; text-align: center; background: #ffffff; color: #888;";

    rsx! {
        div {
            style: "{nav_style}",

            button {
                style: if matches!(current_screen, Screen::Camera) { active } else { inactive },
                onclick: move |_| on_navigate.call(Screen::Camera),
                "📷 Camera"
            }

            button {
                style: if matches!(current_screen, Screen::Gallery) { active } else { inactive },
                onclick: move |_| on_navigate.call(Screen::Gallery),
                "🖼️ Gallery"
            }

            button {
                style: if matches!(current_screen, Screen::Map) { active } else { inactive },
                onclick: move |_| on_navigate.call(Screen::Map),
                "🗺️ Map"
            }
        }
    }
}

use dioxus::prelude::*;

mod capture;
mod components;
mod error;
mod filesystem;
mod picker;
mod services;

use components::{CameraScreen, GalleryScreen, MapScreen, NavigationBar};

fn main() {
    init_logging();
    dioxus::launch(App);
}

fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default().with_max_level(log::LevelFilter::Info),
    );

    #[cfg(not(target_os = "android"))]
    env_logger::init();
}

/// Screen navigation for the app
#[derive(Clone, PartialEq, Debug)]
pub enum Screen {
    Camera,
    Gallery,
    Map,
}

#[component]
fn App() -> Element {
    let mut current_screen = use_signal(|| Screen::Camera);

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100vh; font-family: sans-serif;",

            // Main Content
            div { style: "flex: 1; overflow-y: auto;",
                match current_screen() {
                    Screen::Camera => rsx! {
                        CameraScreen {}
                    },
                    Screen::Gallery => rsx! {
                        GalleryScreen {}
                    },
                    Screen::Map => rsx! {
                        MapScreen {}
                    },
                }
            }

            // Bottom Navigation Bar
            NavigationBar {
                current_screen: current_screen(),
                on_navigate: move |screen| current_screen.set(screen),
            }
        }
    }
}

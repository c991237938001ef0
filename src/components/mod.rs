mod camera;
mod gallery;
mod map;
mod navigation;
mod remote_image;

pub use camera::CameraScreen;
pub use gallery::GalleryScreen;
pub use map::MapScreen;
pub use navigation::NavigationBar;
pub(crate) use remote_image::RemoteImage;

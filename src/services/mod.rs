pub mod location_service;
pub mod photo_service;
pub mod settings;

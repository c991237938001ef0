//! # Photo Store
//!
//! A remote photo store adapter: binary uploads with progress reporting,
//! metadata documents queried most-recent-first, and two-step deletes.
//!
//! The backend is modeled as an [`ObjectStore`]: a binary object under
//! `photos/<id>` plus a JSON metadata document under `metadata/<id>.json`,
//! both keyed by the same timestamp-prefixed identifier. The shipped
//! implementation talks WebDAV to a Nextcloud-style server (enable the
//! `webdav` feature); tests run against an in-memory store.
//!
//! There is no cross-store transaction: a metadata write that fails after a
//! successful binary transfer leaves the binary orphaned, and a half-failed
//! delete can leave an unlisted binary behind. Callers get the error either
//! way.

pub mod models;
pub mod service;
pub mod store;

#[cfg(feature = "webdav")]
pub mod webdav;

pub use models::{
    guess_content_type, PhotoLocation, RemotePhotoRecord, UploadProgress, UploadState,
};
pub use service::{OnUploadProgress, PhotoStoreError, PhotoStoreResult, PhotoStoreService};
pub use store::{ObjectStore, ProgressFn, StoreError, METADATA_DIR, PHOTOS_DIR};

#[cfg(feature = "webdav")]
pub use webdav::{PhotoStoreConfig, WebDavStore};

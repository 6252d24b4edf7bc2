//! Media storage for uploaded files (images, videos, documents).
//!
//! Handlers talk to a [`MediaStore`] trait object. Two backends exist:
//! [`CloudinaryStore`] for production and [`LocalStore`], which writes to
//! disk and is used in development and tests.

use async_trait::async_trait;
use serde::Serialize;

pub mod cloudinary;
pub mod config;
pub mod local;

pub use cloudinary::CloudinaryStore;
pub use config::MediaConfig;
pub use local::LocalStore;

/// Every stored object lives under this top-level folder.
pub const ROOT_FOLDER: &str = "smcd-congress";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Storage class of an object. Cloudinary addresses images, videos and
/// everything else (`raw`) through different endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Let the backend detect the class from the content.
    Auto,
    Image,
    Video,
    Raw,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Auto => "auto",
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Raw => "raw",
        }
    }
}

/// An uploaded file held in memory.
#[derive(Debug, Clone, Default)]
pub struct MediaFile {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl MediaFile {
    pub fn new(bytes: Vec<u8>, filename: Option<String>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            filename,
            content_type,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where a stored object can be fetched from and how to delete it later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
    /// Playback length reported by the backend for videos.
    pub duration_secs: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Media service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Media storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected media service response: {0}")]
    InvalidResponse(String),

    #[error("Invalid public id: {0}")]
    InvalidPublicId(String),
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Short backend name, reported by the diagnostics endpoint.
    fn backend(&self) -> &'static str;

    /// Store `file` under `smcd-congress/{folder}`. When `public_id` is
    /// `None` the backend picks a unique name.
    async fn put(
        &self,
        file: &MediaFile,
        folder: &str,
        kind: MediaKind,
        public_id: Option<&str>,
    ) -> Result<StoredMedia, MediaError>;

    /// Remove an object. Returns `false` when nothing was deleted.
    async fn delete(&self, public_id: &str, kind: MediaKind) -> Result<bool, MediaError>;

    async fn upload(
        &self,
        file: &MediaFile,
        folder: &str,
        kind: MediaKind,
    ) -> Result<StoredMedia, MediaError> {
        self.put(file, folder, kind, None).await
    }

    /// Upload with a caller-chosen name (without extension).
    async fn upload_named(
        &self,
        file: &MediaFile,
        folder: &str,
        kind: MediaKind,
        public_id: &str,
    ) -> Result<StoredMedia, MediaError> {
        self.put(file, folder, kind, Some(public_id)).await
    }
}

/// `folder` prefixed with [`ROOT_FOLDER`].
pub fn full_folder(folder: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        ROOT_FOLDER.to_string()
    } else {
        format!("{ROOT_FOLDER}/{folder}")
    }
}

/// Recover the public id from a delivery URL:
/// `https://res.cloudinary.com/demo/image/upload/v1712/smcd-congress/rooms/a.jpg`
/// gives `smcd-congress/rooms/a`.
pub fn extract_public_id(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/upload/")?;
    let rest = rest.split(['?', '#']).next().unwrap_or_default();

    let rest = match rest.split_once('/') {
        Some((version, tail))
            if version.len() > 1
                && version.starts_with('v')
                && version[1..].bytes().all(|b| b.is_ascii_digit()) =>
        {
            tail
        }
        _ => rest,
    };

    let without_ext = match rest.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') && !stem.is_empty() => stem,
        _ => rest,
    };

    if without_ext.is_empty() {
        None
    } else {
        Some(without_ext.to_string())
    }
}

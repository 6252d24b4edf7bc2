//! Media backend selection from the environment.

use std::path::PathBuf;
use std::sync::Arc;

use crate::{CloudinaryStore, LocalStore, MediaStore};

const DEFAULT_MEDIA_ROOT: &str = "./uploads";
const DEFAULT_MEDIA_PUBLIC_URL: &str = "/media";

#[derive(Debug, Clone)]
pub enum MediaConfig {
    Cloudinary {
        cloud_name: String,
        api_key: String,
        api_secret: String,
    },
    Local {
        root: PathBuf,
        public_url: String,
    },
}

impl MediaConfig {
    /// Read `MEDIA_BACKEND` (`cloudinary` or `local`, default `local`).
    ///
    /// | Env var                 | Default     |
    /// |-------------------------|-------------|
    /// | `CLOUDINARY_CLOUD_NAME` | (required)  |
    /// | `CLOUDINARY_API_KEY`    | (required)  |
    /// | `CLOUDINARY_API_SECRET` | (required)  |
    /// | `MEDIA_ROOT`            | `./uploads` |
    /// | `MEDIA_PUBLIC_URL`      | `/media`    |
    ///
    /// # Panics
    ///
    /// Panics when the Cloudinary backend is selected without credentials.
    pub fn from_env() -> Self {
        let backend = std::env::var("MEDIA_BACKEND").unwrap_or_else(|_| "local".into());

        if backend.eq_ignore_ascii_case("cloudinary") {
            Self::Cloudinary {
                cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME")
                    .expect("CLOUDINARY_CLOUD_NAME must be set when MEDIA_BACKEND=cloudinary"),
                api_key: std::env::var("CLOUDINARY_API_KEY")
                    .expect("CLOUDINARY_API_KEY must be set when MEDIA_BACKEND=cloudinary"),
                api_secret: std::env::var("CLOUDINARY_API_SECRET")
                    .expect("CLOUDINARY_API_SECRET must be set when MEDIA_BACKEND=cloudinary"),
            }
        } else {
            Self::Local {
                root: std::env::var("MEDIA_ROOT")
                    .unwrap_or_else(|_| DEFAULT_MEDIA_ROOT.into())
                    .into(),
                public_url: std::env::var("MEDIA_PUBLIC_URL")
                    .unwrap_or_else(|_| DEFAULT_MEDIA_PUBLIC_URL.into()),
            }
        }
    }

    /// Instantiate the configured backend.
    pub fn build_store(&self) -> Arc<dyn MediaStore> {
        match self {
            Self::Cloudinary {
                cloud_name,
                api_key,
                api_secret,
            } => Arc::new(CloudinaryStore::new(
                cloud_name.clone(),
                api_key.clone(),
                api_secret.clone(),
            )),
            Self::Local { root, public_url } => {
                Arc::new(LocalStore::new(root.clone(), public_url.clone()))
            }
        }
    }

    /// Directory and URL prefix to serve when files are stored locally.
    pub fn local_mount(&self) -> Option<(&PathBuf, &str)> {
        match self {
            Self::Local { root, public_url } => Some((root, public_url.as_str())),
            Self::Cloudinary { .. } => None,
        }
    }
}

//! Filesystem-backed media store.
//!
//! Objects are written to `{root}/{public_id}.{ext}` and served by the API
//! under `{public_url}/{public_id}.{ext}`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::{full_folder, MediaError, MediaFile, MediaKind, MediaStore, StoredMedia};

pub struct LocalStore {
    root: PathBuf,
    public_url: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a public id to a directory and file stem inside `root`,
    /// refusing anything that would escape it.
    fn locate(&self, public_id: &str) -> Result<(PathBuf, String), MediaError> {
        let relative = Path::new(public_id);
        let safe = !public_id.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(MediaError::InvalidPublicId(public_id.to_string()));
        }

        let path = self.root.join(relative);
        let stem = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| MediaError::InvalidPublicId(public_id.to_string()))?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        Ok((dir, stem))
    }
}

/// Lower-case extension of `filename`, restricted to ASCII alphanumerics.
fn extension_of(filename: Option<&str>) -> Option<String> {
    let (_, ext) = filename?.rsplit_once('.')?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[async_trait]
impl MediaStore for LocalStore {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn put(
        &self,
        file: &MediaFile,
        folder: &str,
        _kind: MediaKind,
        public_id: Option<&str>,
    ) -> Result<StoredMedia, MediaError> {
        let name = match public_id {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().simple().to_string(),
        };
        let public_id = format!("{}/{name}", full_folder(folder));
        let (dir, stem) = self.locate(&public_id)?;

        let file_name = match extension_of(file.filename.as_deref()) {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        };

        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &file.bytes).await?;
        tracing::debug!(path = %path.display(), bytes = file.len(), "Media stored locally");

        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| MediaError::InvalidPublicId(public_id.clone()))?
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect::<Vec<_>>()
            .join("/");

        Ok(StoredMedia {
            url: format!("{}/{relative}", self.public_url),
            public_id,
            duration_secs: None,
        })
    }

    async fn delete(&self, public_id: &str, _kind: MediaKind) -> Result<bool, MediaError> {
        let (dir, stem) = self.locate(public_id)?;

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches = path.file_stem().and_then(|s| s.to_str()) == Some(stem.as_str())
                || path.file_name().and_then(|s| s.to_str()) == Some(stem.as_str());
            if matches && entry.file_type().await?.is_file() {
                tokio::fs::remove_file(&path).await?;
                tracing::debug!(path = %path.display(), "Local media deleted");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

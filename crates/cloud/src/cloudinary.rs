//! Cloudinary upload API client (signed uploads).
//!
//! Requests are signed by hashing the alphabetically sorted parameters,
//! joined as `k=v&k=v`, concatenated with the API secret (SHA-256, hex).

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{full_folder, MediaError, MediaFile, MediaKind, MediaStore, StoredMedia};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Large video uploads can take minutes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

pub struct CloudinaryStore {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryStore {
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            cloud_name,
            api_key,
            api_secret,
        }
    }

    fn endpoint(&self, kind: MediaKind, action: &str) -> String {
        format!("{API_BASE}/{}/{}/{action}", self.cloud_name, kind.as_str())
    }

    /// Signed parameter set: `params` plus `api_key` and `signature`.
    fn signed(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        let signature = sign(&params, &self.api_secret);
        params.insert("api_key", self.api_key.clone());
        params.insert("signature", signature);
        params
    }

    async fn error_from(response: reqwest::Response) -> MediaError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => "no error details".to_string(),
        };
        MediaError::Rejected { status, message }
    }
}

/// Cloudinary request signature over `params` (excluding `api_key`,
/// `file` and `resource_type`, which are never part of `params` here).
pub fn sign(params: &BTreeMap<&'static str, String>, secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    fn backend(&self) -> &'static str {
        "cloudinary"
    }

    async fn put(
        &self,
        file: &MediaFile,
        folder: &str,
        kind: MediaKind,
        public_id: Option<&str>,
    ) -> Result<StoredMedia, MediaError> {
        let mut params = BTreeMap::new();
        params.insert("folder", full_folder(folder));
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        if let Some(id) = public_id {
            params.insert("public_id", id.to_string());
        }

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone().unwrap_or_else(|| "upload".into()));
        let mut form = Form::new().part("file", part);
        for (key, value) in self.signed(params) {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.endpoint(kind, "upload"))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: UploadResponse = response.json().await?;
        tracing::info!(public_id = %body.public_id, kind = kind.as_str(), "Media uploaded");
        Ok(StoredMedia {
            url: body.secure_url,
            public_id: body.public_id,
            duration_secs: body.duration.map(|d| d.round() as i32),
        })
    }

    async fn delete(&self, public_id: &str, kind: MediaKind) -> Result<bool, MediaError> {
        if public_id.trim().is_empty() {
            return Err(MediaError::InvalidPublicId("empty".into()));
        }
        // Destroy has no `auto` endpoint.
        let kind = match kind {
            MediaKind::Auto => MediaKind::Image,
            other => other,
        };

        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());

        let response = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .form(&self.signed(params))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: DestroyResponse = response.json().await?;
        match body.result.as_str() {
            "ok" => {
                tracing::info!(public_id, "Media deleted");
                Ok(true)
            }
            "not found" => {
                tracing::warn!(public_id, "Media to delete was not found");
                Ok(false)
            }
            other => Err(MediaError::InvalidResponse(format!("destroy result: {other}"))),
        }
    }
}

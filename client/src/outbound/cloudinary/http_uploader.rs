//! Reqwest-backed Cloudinary uploader.
//!
//! This adapter owns transport details only: request signing, multipart
//! encoding, status mapping, and decoding of the hosted URL. Every call makes
//! exactly one request; nothing is retried or cached.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::dto::UploadResponseDto;
use super::signature::{sign_upload, upload_timestamp};
use crate::domain::DocumentFile;
use crate::domain::ports::{DocumentUploadError, DocumentUploader};

/// Public Cloudinary API host.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

const MISSING_CONFIGURATION: &str = "Missing Cloudinary configuration";
const FALLBACK_MIME: &str = "application/octet-stream";

/// Account identity used to sign uploads.
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Zeroizing<String>,
}

impl CloudinaryCredentials {
    /// Build credentials when all three values are present and non-blank.
    pub fn from_parts(
        cloud_name: Option<String>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Option<Self> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Some(Self {
            cloud_name: present(cloud_name)?,
            api_key: present(api_key)?,
            api_secret: Zeroizing::new(present(api_secret)?),
        })
    }
}

impl fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Document uploader that POSTs signed multipart forms to one API base.
pub struct CloudinaryUploader {
    client: Client,
    api_base: Url,
    credentials: Option<CloudinaryCredentials>,
    clock: Arc<dyn Clock>,
}

impl CloudinaryUploader {
    /// Build an uploader with an explicit request timeout. Missing
    /// credentials are reported on each upload rather than here.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        api_base: Url,
        credentials: Option<CloudinaryCredentials>,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base,
            credentials,
            clock,
        })
    }

    fn endpoint(&self, cloud_name: &str) -> String {
        format!(
            "{}/v1_1/{cloud_name}/auto/upload",
            self.api_base.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl DocumentUploader for CloudinaryUploader {
    async fn upload(
        &self,
        file: &DocumentFile,
        folder: &str,
    ) -> Result<String, DocumentUploadError> {
        let Some(credentials) = self.credentials.as_ref() else {
            return Err(DocumentUploadError::missing_configuration(
                MISSING_CONFIGURATION,
            ));
        };

        let timestamp = upload_timestamp(self.clock.utc());
        let signature = sign_upload(folder, timestamp, credentials.api_secret.as_str());
        let form = build_form(file, folder, timestamp, &credentials.api_key, signature)?;

        debug!(folder, file_name = file.file_name(), size = file.size(), "uploading document");
        let response = self
            .client
            .post(self.endpoint(&credentials.cloud_name))
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            debug!(status = status.as_u16(), body = %body_preview(body.as_ref()), "upload rejected");
            return Err(map_status_error(status));
        }

        let url = parse_secure_url(body.as_ref())?;
        info!(folder, url = %url, "document uploaded");
        Ok(url)
    }
}

fn build_form(
    file: &DocumentFile,
    folder: &str,
    timestamp: i64,
    api_key: &str,
    signature: String,
) -> Result<Form, DocumentUploadError> {
    let mime = file
        .media_type()
        .map(|media| media.mime())
        .unwrap_or(FALLBACK_MIME);
    let part = Part::bytes(file.bytes().to_vec())
        .file_name(file.file_name().to_owned())
        .mime_str(mime)
        .map_err(|err| DocumentUploadError::transport(err.to_string()))?;

    Ok(Form::new()
        .part("file", part)
        .text("folder", folder.to_owned())
        .text("timestamp", timestamp.to_string())
        .text("api_key", api_key.to_owned())
        .text("signature", signature))
}

fn parse_secure_url(body: &[u8]) -> Result<String, DocumentUploadError> {
    let decoded: UploadResponseDto = serde_json::from_slice(body).map_err(|err| {
        DocumentUploadError::decode(format!("Upload failed: invalid response: {err}"))
    })?;
    if let Some(error) = decoded.error {
        return Err(DocumentUploadError::rejected(error.message));
    }
    decoded
        .secure_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| DocumentUploadError::decode("Upload failed: response has no secure_url"))
}

fn map_transport_error(error: reqwest::Error) -> DocumentUploadError {
    DocumentUploadError::transport(error.to_string())
}

fn map_status_error(status: StatusCode) -> DocumentUploadError {
    let reason = status
        .canonical_reason()
        .map_or_else(|| status.as_u16().to_string(), str::to_owned);
    DocumentUploadError::status(reason)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    compact.chars().take(PREVIEW_CHAR_LIMIT).collect()
}

//! Upload API response payloads.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct UploadResponseDto {
    #[serde(default)]
    pub(super) secure_url: Option<String>,
    #[serde(default)]
    pub(super) error: Option<UploadErrorDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UploadErrorDto {
    pub(super) message: String,
}

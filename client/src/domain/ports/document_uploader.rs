//! Driven port for hosting registry documents.
//!
//! Callers receive either the hosted URL or an error whose display string is
//! the user-facing reason. Adapters never retry and never cache.

use async_trait::async_trait;

use crate::domain::{DocumentCategory, DocumentFile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while uploading a document.
    pub enum DocumentUploadError {
        /// Credentials for the media service are absent.
        MissingConfiguration { message: String } => "{message}",
        /// The media service answered with a non-success status.
        Status { reason: String } => "Upload failed: {reason}",
        /// The media service reported an error in its response body.
        Rejected { message: String } => "{message}",
        /// The request could not be sent or the response not read.
        Transport { message: String } => "{message}",
        /// The response did not carry a hosted URL.
        Decode { message: String } => "{message}",
    }
}

/// Port for storing one file under a folder path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentUploader: Send + Sync {
    /// Upload `file` into `folder` and return its hosted URL.
    async fn upload(&self, file: &DocumentFile, folder: &str)
    -> Result<String, DocumentUploadError>;
}

/// Upload a document into the owner's folder for its category,
/// `land-management/<category>-documents/<owner>`.
pub async fn upload_document<U>(
    uploader: &U,
    file: &DocumentFile,
    owner: &UserId,
    category: DocumentCategory,
) -> Result<String, DocumentUploadError>
where
    U: DocumentUploader + ?Sized,
{
    uploader.upload(file, &category.folder_for(owner)).await
}

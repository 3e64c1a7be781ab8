//! Supabase object storage as an alternative document host.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::client::{SupabaseClient, SupabaseError};
use crate::domain::DocumentFile;
use crate::domain::ports::{DocumentUploadError, DocumentUploader};

/// Bucket that holds registry documents.
pub const DEFAULT_BUCKET: &str = "land-documents";

/// Uploads documents into a public bucket and returns their public URL.
///
/// Objects are named `<folder>/<owner>-<millis>.<ext>`, where the owner is the
/// last segment of the folder.
pub struct SupabaseStorageUploader {
    client: SupabaseClient,
    bucket: String,
    clock: Arc<dyn Clock>,
}

impl SupabaseStorageUploader {
    pub fn new(client: SupabaseClient, bucket: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            clock,
        }
    }

    fn object_path(&self, file: &DocumentFile, folder: &str) -> String {
        let folder = folder.trim_matches('/');
        let owner = folder.rsplit('/').next().unwrap_or_default();
        let millis = self.clock.utc().timestamp_millis();
        let extension = file
            .extension()
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "bin".to_owned());
        format!("{folder}/{owner}-{millis}.{extension}")
    }
}

fn map_error(error: SupabaseError) -> DocumentUploadError {
    match error {
        SupabaseError::Transport(message) => DocumentUploadError::transport(message),
        SupabaseError::Status { message, .. } => DocumentUploadError::rejected(message),
        SupabaseError::Decode(message) => DocumentUploadError::decode(message),
    }
}

#[async_trait]
impl DocumentUploader for SupabaseStorageUploader {
    async fn upload(
        &self,
        file: &DocumentFile,
        folder: &str,
    ) -> Result<String, DocumentUploadError> {
        let path = self.object_path(file, folder);
        let content_type = file
            .media_type()
            .map(|media| media.mime())
            .unwrap_or("application/octet-stream");
        self.client
            .put_object(&self.bucket, &path, content_type, file.bytes().to_vec())
            .await
            .map_err(map_error)?;
        let url = self.client.public_object_url(&self.bucket, &path);
        info!(bucket = %self.bucket, path = %path, "document stored");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::supabase::SessionToken;
    use crate::test_support::FixtureClock;
    use chrono::{TimeZone, Utc};
    use reqwest::Url;
    use std::time::Duration;

    #[test]
    fn objects_are_named_after_owner_and_time() {
        let client = SupabaseClient::new(
            Url::parse("https://project.supabase.co").expect("url"),
            "anon",
            Arc::new(SessionToken::default()),
            Duration::from_secs(5),
        )
        .expect("client");
        let now = Utc
            .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
            .single()
            .expect("timestamp");
        let uploader = SupabaseStorageUploader::new(
            client,
            DEFAULT_BUCKET,
            Arc::new(FixtureClock::at(now)),
        );
        let file = DocumentFile::with_inferred_type("Contract.PDF", b"%PDF".to_vec());

        assert_eq!(
            uploader.object_path(&file, "land-management/contract-documents/owner-1"),
            "land-management/contract-documents/owner-1/owner-1-1704153600000.pdf"
        );
    }
}

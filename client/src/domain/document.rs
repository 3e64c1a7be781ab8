//! Supporting and contract documents staged for upload.
//!
//! Documents are validated before any remote call: only PDF, JPEG, and PNG
//! files up to [`MAX_DOCUMENT_BYTES`] are accepted.

use std::fmt;

use super::user::UserId;

/// Largest accepted document, in bytes (5 MiB).
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// Root folder in the media store for documents without a category.
pub const DEFAULT_UPLOAD_FOLDER: &str = "land-management";

/// Why a staged document was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentValidationError {
    UnsupportedType,
    TooLarge,
}

impl fmt::Display for DocumentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType => write!(f, "Only PDF, JPEG, and PNG files are allowed"),
            Self::TooLarge => write!(f, "File size must be less than 5MB"),
        }
    }
}

impl std::error::Error for DocumentValidationError {}

/// Media types accepted for registry documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentMediaType {
    Pdf,
    Jpeg,
    Png,
}

impl DocumentMediaType {
    /// Match a MIME type such as `application/pdf`. Parameters after `;` are
    /// ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Match a file extension without the leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Canonical MIME type.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Which registry flow a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentCategory {
    /// Proof of ownership attached to a land registration.
    Supporting,
    /// Signed contract attached to a transfer.
    Contract,
}

impl DocumentCategory {
    /// Lowercase category label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supporting => "supporting",
            Self::Contract => "contract",
        }
    }

    /// Folder that holds this category's documents for one owner.
    ///
    /// # Examples
    /// ```
    /// use land_registry::domain::{DocumentCategory, UserId};
    ///
    /// let owner = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
    /// assert_eq!(
    ///     DocumentCategory::Contract.folder_for(&owner),
    ///     "land-management/contract-documents/3fa85f64-5717-4562-b3fc-2c963f66afa6",
    /// );
    /// ```
    pub fn folder_for(self, owner: &UserId) -> String {
        format!("{DEFAULT_UPLOAD_FOLDER}/{}-documents/{owner}", self.as_str())
    }
}

/// A file chosen by the user, held in memory until it is uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl DocumentFile {
    /// Stage a file with an explicit (client-reported) content type.
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Stage a file and infer its content type from the extension.
    pub fn with_inferred_type(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = extension_of(&file_name)
            .and_then(DocumentMediaType::from_extension)
            .map(|media| media.mime().to_owned());
        Self::new(file_name, content_type, bytes)
    }

    /// Original file name.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Content type reported for the file, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// File contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// File extension without the dot, if the name has one.
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.file_name)
    }

    /// Media type of the file. A reported content type wins over the
    /// extension.
    pub fn media_type(&self) -> Option<DocumentMediaType> {
        match self.content_type() {
            Some(mime) => DocumentMediaType::from_mime(mime),
            None => self.extension().and_then(DocumentMediaType::from_extension),
        }
    }

    /// Check the file against the accepted media types and size limit.
    pub fn validate(&self) -> Result<DocumentMediaType, DocumentValidationError> {
        let media = self
            .media_type()
            .ok_or(DocumentValidationError::UnsupportedType)?;
        if self.size() > MAX_DOCUMENT_BYTES {
            return Err(DocumentValidationError::TooLarge);
        }
        Ok(media)
    }
}

impl fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

fn extension_of(file_name: &str) -> Option<&str> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

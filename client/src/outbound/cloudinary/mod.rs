//! Cloudinary outbound adapter.
//!
//! Implements the `DocumentUploader` port with signed multipart uploads.

mod dto;
mod http_uploader;
mod signature;

pub use http_uploader::{CloudinaryCredentials, CloudinaryUploader, DEFAULT_API_BASE};
pub use signature::{sign_upload, upload_timestamp};

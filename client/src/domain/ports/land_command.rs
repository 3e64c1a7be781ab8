//! Driving port for the land mutations used by the registration workflow.

use async_trait::async_trait;

use crate::domain::{DocumentFile, Error, Land, NewLand, UserId};

/// Land use-cases invoked by the registration workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LandCommand: Send + Sync {
    /// Host a supporting document for `owner` and return its URL.
    async fn upload_supporting_document(
        &self,
        file: &DocumentFile,
        owner: &UserId,
    ) -> Result<String, Error>;

    /// Persist a new land registration.
    async fn register_land(&self, land: NewLand) -> Result<Land, Error>;
}

//! Driving port for the transfer mutations used by the submission workflow.

use async_trait::async_trait;

use crate::domain::{DocumentFile, Error, NewTransfer, Transfer, UserId};

/// Transfer use-cases invoked by the submission workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferCommand: Send + Sync {
    /// Host a contract document for `owner` and return its URL.
    async fn upload_contract_document(
        &self,
        file: &DocumentFile,
        owner: &UserId,
    ) -> Result<String, Error>;

    /// Persist a new transfer.
    async fn create_transfer(&self, transfer: NewTransfer) -> Result<Transfer, Error>;
}

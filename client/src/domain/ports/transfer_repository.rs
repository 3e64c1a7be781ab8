//! Port abstraction for transfer persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewTransfer, Transfer, TransferId, TransferUpdate, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by transfer repository adapters.
    pub enum TransferRepositoryError {
        /// The remote store rejected the query or mutation.
        Rejected { message: String } => "{message}",
        /// The remote store could not be reached.
        Connection { message: String } => "{message}",
        /// The remote store answered with rows that do not decode.
        Decode { message: String } => "unexpected transfer response: {message}",
        /// No row matched the identifier.
        NotFound { id: String } => "transfer {id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferRepository: Send + Sync {
    /// Fetch transfers created by a user, newest first.
    async fn list_by_sender(&self, sender: &UserId)
    -> Result<Vec<Transfer>, TransferRepositoryError>;

    /// Insert a transfer and return the stored row.
    async fn insert(&self, transfer: &NewTransfer) -> Result<Transfer, TransferRepositoryError>;

    /// Apply a partial update and return the updated row.
    async fn update(
        &self,
        id: &TransferId,
        update: &TransferUpdate,
    ) -> Result<Transfer, TransferRepositoryError>;

    /// Delete a transfer.
    async fn delete(&self, id: &TransferId) -> Result<(), TransferRepositoryError>;
}

//! Cache of the transfers initiated by the signed-in user.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::land_store::map_upload_error;
use crate::domain::ports::{
    DocumentUploader, TransferCommand, TransferRepository, TransferRepositoryError,
    upload_document,
};
use crate::domain::store_state::{StateCell, StoreState};
use crate::domain::{
    DocumentCategory, DocumentFile, Error, NewTransfer, Transfer, TransferId, TransferUpdate,
    UserId,
};

/// Transfer records and mutations.
pub struct TransferStore<R: ?Sized = dyn TransferRepository, U: ?Sized = dyn DocumentUploader> {
    repository: Arc<R>,
    uploader: Arc<U>,
    state: StateCell<Vec<Transfer>>,
}

impl<R: ?Sized, U: ?Sized> TransferStore<R, U> {
    /// Create an empty store.
    pub fn new(repository: Arc<R>, uploader: Arc<U>) -> Self {
        Self {
            repository,
            uploader,
            state: StateCell::new(),
        }
    }

    /// Loaded transfers, newest first.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.state.read(Clone::clone)
    }

    pub fn state(&self) -> StoreState<Vec<Transfer>> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<Vec<Transfer>>> {
        self.state.subscribe()
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }
}

impl<R, U> TransferStore<R, U>
where
    R: TransferRepository + ?Sized,
    U: DocumentUploader + ?Sized,
{
    fn map_repository_error(error: TransferRepositoryError) -> Error {
        match error {
            TransferRepositoryError::Rejected { message } => Error::invalid_request(message),
            TransferRepositoryError::Connection { message } => Error::service_unavailable(message),
            err @ TransferRepositoryError::Decode { .. } => Error::internal(err.to_string()),
            err @ TransferRepositoryError::NotFound { .. } => Error::not_found(err.to_string()),
        }
    }

    /// Replace the cache with the transfers sent by `sender`.
    pub async fn fetch_user_transfers(&self, sender: &UserId) -> Result<Vec<Transfer>, Error> {
        let call = async {
            self.repository
                .list_by_sender(sender)
                .await
                .map_err(Self::map_repository_error)
        };
        let transfers = self
            .state
            .track(call, |cached, fetched: &Vec<Transfer>| cached.clone_from(fetched))
            .await?;
        info!(sender_id = %sender, count = transfers.len(), "fetched transfers");
        Ok(transfers)
    }

    /// Insert a transfer and prepend it to the cache.
    pub async fn create_transfer(&self, transfer: NewTransfer) -> Result<Transfer, Error> {
        let call = async {
            self.repository
                .insert(&transfer)
                .await
                .map_err(Self::map_repository_error)
        };
        let stored = self
            .state
            .track(call, |cached, stored: &Transfer| cached.insert(0, stored.clone()))
            .await?;
        info!(transfer_id = %stored.id, parcel_id = %stored.parcel_id, "created transfer");
        Ok(stored)
    }

    /// Apply a partial update and replace the cached row in place.
    pub async fn update_transfer(
        &self,
        id: &TransferId,
        update: &TransferUpdate,
    ) -> Result<Transfer, Error> {
        let call = async {
            self.repository
                .update(id, update)
                .await
                .map_err(Self::map_repository_error)
        };
        self.state
            .track(call, |cached, updated: &Transfer| {
                for row in cached.iter_mut().filter(|row| row.id == updated.id) {
                    *row = updated.clone();
                }
            })
            .await
    }

    /// Delete a transfer and drop it from the cache.
    pub async fn delete_transfer(&self, id: &TransferId) -> Result<(), Error> {
        let call = async {
            self.repository
                .delete(id)
                .await
                .map_err(Self::map_repository_error)
        };
        self.state
            .track(call, |cached, _: &()| cached.retain(|row| &row.id != id))
            .await?;
        info!(transfer_id = %id, "deleted transfer");
        Ok(())
    }

    /// Host a contract document. Failures are recorded on the store but do
    /// not toggle `loading`.
    pub async fn upload_contract_document(
        &self,
        file: &DocumentFile,
        owner: &UserId,
    ) -> Result<String, Error> {
        match upload_document(self.uploader.as_ref(), file, owner, DocumentCategory::Contract).await
        {
            Ok(url) => Ok(url),
            Err(err) => {
                let err = map_upload_error(err);
                warn!(owner_id = %owner, error = %err, "contract document upload failed");
                self.state.record_error(err.message());
                Err(err)
            }
        }
    }
}

#[async_trait]
impl<R, U> TransferCommand for TransferStore<R, U>
where
    R: TransferRepository + ?Sized,
    U: DocumentUploader + ?Sized,
{
    async fn upload_contract_document(
        &self,
        file: &DocumentFile,
        owner: &UserId,
    ) -> Result<String, Error> {
        TransferStore::upload_contract_document(self, file, owner).await
    }

    async fn create_transfer(&self, transfer: NewTransfer) -> Result<Transfer, Error> {
        TransferStore::create_transfer(self, transfer).await
    }
}

//! PostgREST-backed transfer repository.

use async_trait::async_trait;

use super::client::{SupabaseClient, SupabaseError, eq};
use crate::domain::ports::{TransferRepository, TransferRepositoryError};
use crate::domain::{NewTransfer, Transfer, TransferId, TransferUpdate, UserId};

const TABLE: &str = "transfers";

/// Transfer rows in the `transfers` table. Rows are scoped to a user through
/// the `sender_id` column, which the database fills from the session.
#[derive(Clone)]
pub struct SupabaseTransferRepository {
    client: SupabaseClient,
}

impl SupabaseTransferRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn map_error(error: SupabaseError) -> TransferRepositoryError {
    match error {
        SupabaseError::Transport(message) => TransferRepositoryError::connection(message),
        SupabaseError::Status { message, .. } => TransferRepositoryError::rejected(message),
        SupabaseError::Decode(message) => TransferRepositoryError::decode(message),
    }
}

#[async_trait]
impl TransferRepository for SupabaseTransferRepository {
    async fn list_by_sender(
        &self,
        sender: &UserId,
    ) -> Result<Vec<Transfer>, TransferRepositoryError> {
        self.client
            .select(
                TABLE,
                &[
                    ("sender_id", eq(sender)),
                    ("order", "created_at.desc".to_owned()),
                ],
            )
            .await
            .map_err(map_error)
    }

    async fn insert(&self, transfer: &NewTransfer) -> Result<Transfer, TransferRepositoryError> {
        self.client.insert(TABLE, transfer).await.map_err(map_error)
    }

    async fn update(
        &self,
        id: &TransferId,
        update: &TransferUpdate,
    ) -> Result<Transfer, TransferRepositoryError> {
        let rows: Vec<Transfer> = self
            .client
            .update(TABLE, &[("id", eq(id))], update)
            .await
            .map_err(map_error)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| TransferRepositoryError::not_found(id.as_ref()))
    }

    async fn delete(&self, id: &TransferId) -> Result<(), TransferRepositoryError> {
        self.client
            .delete(TABLE, &[("id", eq(id))])
            .await
            .map_err(map_error)
    }
}

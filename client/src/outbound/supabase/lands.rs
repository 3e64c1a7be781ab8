//! PostgREST-backed land repository.

use async_trait::async_trait;

use super::client::{SupabaseClient, SupabaseError, eq};
use crate::domain::ports::{LandRepository, LandRepositoryError};
use crate::domain::{Land, NewLand, UserId};

const TABLE: &str = "lands";

/// Land rows in the `lands` table.
#[derive(Clone)]
pub struct SupabaseLandRepository {
    client: SupabaseClient,
}

impl SupabaseLandRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn map_error(error: SupabaseError) -> LandRepositoryError {
    match error {
        SupabaseError::Transport(message) => LandRepositoryError::connection(message),
        SupabaseError::Status { message, .. } => LandRepositoryError::rejected(message),
        SupabaseError::Decode(message) => LandRepositoryError::decode(message),
    }
}

#[async_trait]
impl LandRepository for SupabaseLandRepository {
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Land>, LandRepositoryError> {
        self.client
            .select(
                TABLE,
                &[
                    ("owner_id", eq(owner)),
                    ("order", "created_at.desc".to_owned()),
                ],
            )
            .await
            .map_err(map_error)
    }

    async fn insert(&self, land: &NewLand) -> Result<Land, LandRepositoryError> {
        self.client.insert(TABLE, land).await.map_err(map_error)
    }
}

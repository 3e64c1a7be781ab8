//! Port abstraction for land persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Land, NewLand, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by land repository adapters.
    pub enum LandRepositoryError {
        /// The remote store rejected the query or mutation.
        Rejected { message: String } => "{message}",
        /// The remote store could not be reached.
        Connection { message: String } => "{message}",
        /// The remote store answered with rows that do not decode.
        Decode { message: String } => "unexpected land response: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LandRepository: Send + Sync {
    /// Fetch the parcels owned by a user, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Land>, LandRepositoryError>;

    /// Insert a registration and return the stored row.
    async fn insert(&self, land: &NewLand) -> Result<Land, LandRepositoryError>;
}

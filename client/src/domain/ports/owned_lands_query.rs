//! Driving port exposing a user's already-fetched parcels.

use crate::domain::{ParcelId, UserId};

/// Read access to cached land records.
#[cfg_attr(test, mockall::automock)]
pub trait OwnedLandsQuery: Send + Sync {
    /// Parcels owned by `owner` among the loaded land records.
    fn owned_parcels(&self, owner: &UserId) -> Vec<ParcelId>;
}

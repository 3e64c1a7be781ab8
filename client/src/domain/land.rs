//! Land parcels owned by registry users.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Validation errors for parcel identifiers and land attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandValidationError {
    NonPositiveParcelId,
    NonPositiveSize,
    EmptyOwnershipType,
}

impl fmt::Display for LandValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveParcelId => write!(f, "Parcel ID must be a positive number"),
            Self::NonPositiveSize => write!(f, "Size must be a positive number"),
            Self::EmptyOwnershipType => write!(f, "Ownership type is required"),
        }
    }
}

impl std::error::Error for LandValidationError {}

/// Numeric parcel identifier.
///
/// ## Invariants
/// - Always strictly positive.
///
/// # Examples
/// ```
/// use land_registry::domain::ParcelId;
///
/// assert_eq!(ParcelId::new(12345).unwrap().get(), 12345);
/// assert!(ParcelId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ParcelId(i64);

impl ParcelId {
    /// Validate a raw parcel number.
    pub fn new(raw: i64) -> Result<Self, LandValidationError> {
        if raw <= 0 {
            return Err(LandValidationError::NonPositiveParcelId);
        }
        Ok(Self(raw))
    }

    /// The parcel number as sent to the remote store.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ParcelId> for i64 {
    fn from(value: ParcelId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for ParcelId {
    type Error = LandValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Row identifier assigned to a land record by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandId(String);

impl LandId {
    /// Wrap a remote row identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for LandId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review status of a registered parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandStatus {
    Pending,
    #[serde(rename = "Under Review")]
    UnderReview,
    Approved,
}

impl LandStatus {
    /// Label used by the remote store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
        }
    }
}

impl fmt::Display for LandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered land parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Land {
    pub id: LandId,
    pub parcel_id: ParcelId,
    /// Area in square metres.
    pub size: f64,
    pub ownership_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporting_document_url: Option<String>,
    pub status: LandStatus,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Registration payload for a new parcel.
///
/// ## Invariants
/// - `size` is finite and positive.
/// - `ownership_type` is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLand {
    pub parcel_id: ParcelId,
    pub size: f64,
    pub ownership_type: String,
    pub supporting_document_url: String,
    pub status: LandStatus,
    pub owner_id: UserId,
}

impl NewLand {
    /// Build a `Pending` registration after the supporting document has been
    /// uploaded.
    pub fn pending(
        parcel_id: ParcelId,
        size: f64,
        ownership_type: &str,
        supporting_document_url: String,
        owner_id: UserId,
    ) -> Result<Self, LandValidationError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(LandValidationError::NonPositiveSize);
        }
        let ownership_type = ownership_type.trim();
        if ownership_type.is_empty() {
            return Err(LandValidationError::EmptyOwnershipType);
        }
        Ok(Self {
            parcel_id,
            size,
            ownership_type: ownership_type.to_owned(),
            supporting_document_url,
            status: LandStatus::Pending,
            owner_id,
        })
    }
}

//! Ownership transfer requests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::land::ParcelId;
use super::user::UserId;

/// Minimum number of characters in a recipient name.
pub const RECIPIENT_NAME_MIN: usize = 3;

/// Validation errors for transfer attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferValidationError {
    EmptyRecipientName,
    RecipientNameTooShort { min: usize },
}

impl fmt::Display for TransferValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRecipientName => write!(f, "Recipient name is required"),
            Self::RecipientNameTooShort { min } => {
                write!(f, "Recipient name must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for TransferValidationError {}

/// Name of the party receiving the parcel.
///
/// ## Invariants
/// - Trimmed, and at least [`RECIPIENT_NAME_MIN`] characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientName(String);

impl RecipientName {
    /// Validate and construct a recipient name.
    pub fn new(raw: &str) -> Result<Self, TransferValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TransferValidationError::EmptyRecipientName);
        }
        if trimmed.chars().count() < RECIPIENT_NAME_MIN {
            return Err(TransferValidationError::RecipientNameTooShort {
                min: RECIPIENT_NAME_MIN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipientName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<RecipientName> for String {
    fn from(value: RecipientName) -> Self {
        value.0
    }
}

/// Row identifier assigned to a transfer by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(String);

impl TransferId {
    /// Wrap a remote row identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for TransferId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Approval status of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferStatus {
    Pending,
    Approved,
    Rejected,
}

impl TransferStatus {
    /// Label used by the remote store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transfer record as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub parcel_id: ParcelId,
    pub recipient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_document_url: Option<String>,
    pub status: TransferStatus,
    /// Filled in server-side from the session that created the row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Creation payload for a transfer. Serialises to exactly
/// `{parcel_id, recipient_name, contract_document_url, status}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTransfer {
    pub parcel_id: ParcelId,
    pub recipient_name: String,
    pub contract_document_url: String,
    pub status: TransferStatus,
}

impl NewTransfer {
    /// Build a `Pending` transfer once the contract document is hosted.
    pub fn pending(
        parcel_id: ParcelId,
        recipient_name: RecipientName,
        contract_document_url: impl Into<String>,
    ) -> Self {
        Self {
            parcel_id,
            recipient_name: recipient_name.into(),
            contract_document_url: contract_document_url.into(),
            status: TransferStatus::Pending,
        }
    }
}

/// Partial update applied to an existing transfer. Unset fields are left
/// untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_document_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransferStatus>,
}

impl TransferUpdate {
    /// Update that only changes the status.
    pub fn status(status: TransferStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.recipient_name.is_none() && self.contract_document_url.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", TransferValidationError::EmptyRecipientName)]
    #[case("   ", TransferValidationError::EmptyRecipientName)]
    #[case("Jo", TransferValidationError::RecipientNameTooShort { min: RECIPIENT_NAME_MIN })]
    #[case(" Jo ", TransferValidationError::RecipientNameTooShort { min: RECIPIENT_NAME_MIN })]
    fn recipient_names_need_three_characters(
        #[case] raw: &str,
        #[case] expected: TransferValidationError,
    ) {
        assert_eq!(RecipientName::new(raw).expect_err("invalid"), expected);
    }

    #[test]
    fn new_transfer_serialises_only_creation_fields() {
        let transfer = NewTransfer::pending(
            ParcelId::new(12345).expect("parcel"),
            RecipientName::new("Jane Smith").expect("name"),
            "https://cloudinary.com/uploaded-contract.pdf",
        );

        assert_eq!(
            serde_json::to_value(&transfer).expect("serialise"),
            json!({
                "parcel_id": 12345,
                "recipient_name": "Jane Smith",
                "contract_document_url": "https://cloudinary.com/uploaded-contract.pdf",
                "status": "Pending"
            })
        );
    }

    #[test]
    fn status_update_omits_untouched_fields() {
        let update = TransferUpdate::status(TransferStatus::Approved);
        assert_eq!(
            serde_json::to_value(&update).expect("serialise"),
            json!({ "status": "Approved" })
        );
        assert!(TransferUpdate::default().is_empty());
    }

    #[test]
    fn decodes_rows_without_sender_column() {
        let row = json!({
            "id": "transfer-123",
            "parcel_id": 12345,
            "recipient_name": "Jane Smith",
            "status": "Rejected",
            "created_at": "2024-01-02T00:00:00Z"
        });
        let transfer: Transfer = serde_json::from_value(row).expect("row decodes");
        assert_eq!(transfer.status, TransferStatus::Rejected);
        assert!(transfer.sender_id.is_none());
        assert!(transfer.contract_document_url.is_none());
    }
}

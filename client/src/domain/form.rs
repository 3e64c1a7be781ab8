//! Field-level validation errors shared by the registry forms.

use std::collections::BTreeMap;
use std::fmt;

use super::document::DocumentFile;
use super::land::ParcelId;

/// Input fields of the registration and transfer forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    ParcelId,
    RecipientName,
    ContractDocument,
    Size,
    OwnershipType,
    SupportingDocument,
}

impl FormField {
    /// Form control identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParcelId => "parcel_id",
            Self::RecipientName => "recipient_name",
            Self::ContractDocument => "contract_document",
            Self::Size => "size",
            Self::OwnershipType => "ownership_type",
            Self::SupportingDocument => "supporting_document",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message per invalid field, ordered by field.
///
/// # Examples
/// ```
/// use land_registry::domain::{FieldErrors, FormField};
///
/// let mut errors = FieldErrors::default();
/// errors.insert(FormField::ContractDocument, "Contract document is required");
/// assert_eq!(errors.get(FormField::ContractDocument), Some("Contract document is required"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    /// Record a message for a field. The first message for a field wins.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message recorded for a field.
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over failing fields in field order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Parse the raw parcel field into a [`ParcelId`].
pub(crate) fn parse_parcel_id(raw: &str) -> Result<ParcelId, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Parcel ID is required".to_owned());
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| "Parcel ID must be a positive number".to_owned())
        .and_then(|value| ParcelId::new(value).map_err(|err| err.to_string()))
}

/// Require a staged document that passes the media type and size checks.
pub(crate) fn check_document<'a>(
    document: Option<&'a DocumentFile>,
    missing: &str,
) -> Result<&'a DocumentFile, String> {
    let document = document.ok_or_else(|| missing.to_owned())?;
    document.validate().map_err(|err| err.to_string())?;
    Ok(document)
}

//! Pure validation of the transfer form.

use crate::domain::form::{check_document, parse_parcel_id};
use crate::domain::{DocumentFile, FieldErrors, FormField, ParcelId, RecipientName};

/// Raw transfer form input as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    /// Parcel number, as typed or selected.
    pub parcel_id: String,
    pub recipient_name: String,
    /// Staged contract document, if one was attached.
    pub contract_document: Option<DocumentFile>,
}

/// Transfer input that passed every field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub parcel_id: ParcelId,
    pub recipient_name: RecipientName,
    pub contract_document: DocumentFile,
}

/// Validate the form against the parcels the user owns.
///
/// Every failing field is reported, not only the first.
///
/// # Examples
/// ```
/// use land_registry::domain::transfer_submission::{TransferForm, validate_transfer_form};
/// use land_registry::domain::{FormField, ParcelId};
///
/// let form = TransferForm {
///     parcel_id: "12345".into(),
///     recipient_name: "Jane Smith".into(),
///     contract_document: None,
/// };
/// let owned = [ParcelId::new(12345).unwrap()];
/// let errors = validate_transfer_form(&form, &owned).unwrap_err();
/// assert_eq!(errors.get(FormField::ContractDocument), Some("Contract document is required"));
/// ```
pub fn validate_transfer_form(
    form: &TransferForm,
    owned_parcels: &[ParcelId],
) -> Result<ValidatedTransfer, FieldErrors> {
    let mut errors = FieldErrors::default();

    let parcel_id = match parse_parcel_id(&form.parcel_id) {
        Ok(parcel) if owned_parcels.contains(&parcel) => Some(parcel),
        Ok(_) => {
            errors.insert(FormField::ParcelId, "Select a parcel you own");
            None
        }
        Err(message) => {
            errors.insert(FormField::ParcelId, message);
            None
        }
    };

    let recipient_name = RecipientName::new(&form.recipient_name)
        .map_err(|err| errors.insert(FormField::RecipientName, err.to_string()))
        .ok();

    let contract_document = check_document(
        form.contract_document.as_ref(),
        "Contract document is required",
    )
    .map_err(|message| errors.insert(FormField::ContractDocument, message))
    .ok();

    match (parcel_id, recipient_name, contract_document) {
        (Some(parcel_id), Some(recipient_name), Some(document)) if errors.is_empty() => {
            Ok(ValidatedTransfer {
                parcel_id,
                recipient_name,
                contract_document: document.clone(),
            })
        }
        _ => Err(errors),
    }
}

//! Transfer submission workflow.
//!
//! Phases follow [`SubmissionPhase`], with `Saving` standing for the transfer
//! insert. The transfer row is only created after the contract document
//! upload has succeeded, and each failure path maps to its own notification.

mod validation;


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{info, warn};

pub use validation::{TransferForm, ValidatedTransfer, validate_transfer_form};

use super::ports::{Notifier, OwnedLandsQuery, SessionQuery, TransferCommand};
use super::submission_phase::PhaseTracker;
use super::{DocumentFile, DocumentValidationError, FieldErrors, NewTransfer, Transfer};

pub use super::submission_phase::{AUTHENTICATION_ERROR_TITLE, SubmissionPhase};

/// Notification title for upload and creation failures.
pub const TRANSFER_FAILED_TITLE: &str = "Transfer failed";
/// Notification title for a created transfer.
pub const TRANSFER_INITIATED_TITLE: &str = "Transfer initiated";
/// Notification body for a created transfer.
pub const TRANSFER_INITIATED_BODY: &str = "Your transfer request has been submitted successfully";

/// Why a submission did not produce a transfer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// Another submission on the same workflow is still running.
    #[error("a transfer submission is already in progress")]
    Busy,
    /// No user is signed in.
    #[error("You must be logged in to initiate a transfer")]
    Authentication,
    /// One or more form fields were rejected.
    #[error("{0}")]
    Validation(FieldErrors),
    /// The contract document could not be hosted.
    #[error("{message}")]
    Upload { message: String },
    /// The transfer row could not be written.
    #[error("{message}")]
    TransferCreation { message: String },
}

/// Form state plus the orchestration of one transfer submission at a time.
pub struct TransferSubmission {
    session: Arc<dyn SessionQuery>,
    lands: Arc<dyn OwnedLandsQuery>,
    transfers: Arc<dyn TransferCommand>,
    notifier: Arc<dyn Notifier>,
    form: Mutex<TransferForm>,
    phases: PhaseTracker,
}

impl TransferSubmission {
    /// Build a workflow over the session, owned-parcel and transfer seams.
    pub fn new(
        session: Arc<dyn SessionQuery>,
        lands: Arc<dyn OwnedLandsQuery>,
        transfers: Arc<dyn TransferCommand>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            lands,
            transfers,
            notifier,
            form: Mutex::new(TransferForm::default()),
            phases: PhaseTracker::new(),
        }
    }

    fn form_mut(&self) -> MutexGuard<'_, TransferForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the form input.
    pub fn form(&self) -> TransferForm {
        self.form_mut().clone()
    }

    /// Set the parcel identifier as typed.
    pub fn set_parcel_id(&self, raw: impl Into<String>) {
        self.form_mut().parcel_id = raw.into();
    }

    /// Set the recipient name as typed.
    pub fn set_recipient_name(&self, raw: impl Into<String>) {
        self.form_mut().recipient_name = raw.into();
    }

    /// Stage a contract document and check it straight away. The file stays
    /// staged when the check fails so that `submit` reports the same message.
    pub fn attach_contract_document(
        &self,
        document: DocumentFile,
    ) -> Result<(), DocumentValidationError> {
        let checked = document.validate().map(|_| ());
        self.form_mut().contract_document = Some(document);
        checked
    }

    /// Drop the staged contract document.
    pub fn clear_contract_document(&self) {
        self.form_mut().contract_document = None;
    }

    /// Current phase.
    pub fn state(&self) -> SubmissionPhase {
        self.phases.state()
    }

    /// Watch phase changes.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionPhase> {
        self.phases.subscribe()
    }

    /// Whether form controls should be disabled.
    pub fn is_busy(&self) -> bool {
        self.phases.is_busy()
    }

    /// Validate the form, upload the contract document, and create the
    /// transfer. Rejected with [`SubmissionError::Busy`] while another
    /// submission is outstanding.
    pub async fn submit(&self) -> Result<Transfer, SubmissionError> {
        self.phases.run(SubmissionError::Busy, self.run()).await
    }

    async fn run(&self) -> Result<Transfer, SubmissionError> {
        let Some(user) = self.session.current_user() else {
            let err = SubmissionError::Authentication;
            self.notifier
                .error(AUTHENTICATION_ERROR_TITLE, &err.to_string());
            return Err(err);
        };

        self.phases.enter(SubmissionPhase::Validating);
        let owned = self.lands.owned_parcels(&user.id);
        let validated =
            validate_transfer_form(&self.form(), &owned).map_err(SubmissionError::Validation)?;

        self.phases.enter(SubmissionPhase::UploadingDocument);
        let url = match self
            .transfers
            .upload_contract_document(&validated.contract_document, &user.id)
            .await
        {
            Ok(url) => url,
            Err(err) => {
                warn!(user_id = %user.id, error = %err, "contract upload failed");
                return Err(self.fail(SubmissionError::Upload {
                    message: err.message().to_owned(),
                }));
            }
        };

        self.phases.enter(SubmissionPhase::Saving);
        let payload = NewTransfer::pending(validated.parcel_id, validated.recipient_name, url);
        let transfer = match self.transfers.create_transfer(payload).await {
            Ok(transfer) => transfer,
            Err(err) => {
                warn!(user_id = %user.id, error = %err, "transfer creation failed");
                return Err(self.fail(SubmissionError::TransferCreation {
                    message: err.message().to_owned(),
                }));
            }
        };

        *self.form_mut() = TransferForm::default();
        info!(transfer_id = %transfer.id, parcel_id = %transfer.parcel_id, "transfer initiated");
        self.notifier
            .success(TRANSFER_INITIATED_TITLE, TRANSFER_INITIATED_BODY);
        Ok(transfer)
    }

    fn fail(&self, err: SubmissionError) -> SubmissionError {
        self.notifier.error(TRANSFER_FAILED_TITLE, &err.to_string());
        err
    }
}

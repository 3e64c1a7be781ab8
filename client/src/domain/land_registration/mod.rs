//! Land registration workflow: validate the form, upload the supporting
//! document, then register the parcel. Phases follow [`SubmissionPhase`],
//! with `Saving` standing for the land insert.


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{info, warn};

use super::form::{check_document, parse_parcel_id};
use super::ports::{LandCommand, Notifier, SessionQuery};
use super::submission_phase::{AUTHENTICATION_ERROR_TITLE, PhaseTracker, SubmissionPhase};
use super::{
    DocumentFile, DocumentValidationError, FieldErrors, FormField, Land, LandStatus,
    LandValidationError, NewLand, ParcelId, UserId,
};

/// Notification title for upload and registration failures.
pub const REGISTRATION_FAILED_TITLE: &str = "Registration failed";
pub const LAND_REGISTERED_TITLE: &str = "Land registered";
pub const LAND_REGISTERED_BODY: &str = "Your land has been registered successfully";

/// Raw registration input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub parcel_id: String,
    /// Area in square metres, as typed.
    pub size: String,
    pub ownership_type: String,
    pub supporting_document: Option<DocumentFile>,
}

/// Registration input that passed every field check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRegistration {
    pub parcel_id: ParcelId,
    pub size: f64,
    pub ownership_type: String,
    pub supporting_document: DocumentFile,
}

impl ValidatedRegistration {
    fn into_new_land(self, supporting_document_url: String, owner: UserId) -> NewLand {
        NewLand {
            parcel_id: self.parcel_id,
            size: self.size,
            ownership_type: self.ownership_type,
            supporting_document_url,
            status: LandStatus::Pending,
            owner_id: owner,
        }
    }
}

fn parse_size(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Size is required".to_owned());
    }
    match trimmed.parse::<f64>() {
        Ok(size) if size.is_finite() && size > 0.0 => Ok(size),
        _ => Err(LandValidationError::NonPositiveSize.to_string()),
    }
}

/// Validate a registration form. Parcel ownership is not checked because
/// registration is what establishes it.
pub fn validate_registration_form(
    form: &RegistrationForm,
) -> Result<ValidatedRegistration, FieldErrors> {
    let mut errors = FieldErrors::default();
    let parcel_id = parse_parcel_id(&form.parcel_id)
        .map_err(|message| errors.insert(FormField::ParcelId, message))
        .ok();
    let size = parse_size(&form.size)
        .map_err(|message| errors.insert(FormField::Size, message))
        .ok();
    let ownership_type = form.ownership_type.trim();
    if ownership_type.is_empty() {
        errors.insert(
            FormField::OwnershipType,
            LandValidationError::EmptyOwnershipType.to_string(),
        );
    }
    let document = check_document(
        form.supporting_document.as_ref(),
        "Supporting document is required",
    )
    .map_err(|message| errors.insert(FormField::SupportingDocument, message))
    .ok();

    match (parcel_id, size, document) {
        (Some(parcel_id), Some(size), Some(document)) if errors.is_empty() => {
            Ok(ValidatedRegistration {
                parcel_id,
                size,
                ownership_type: ownership_type.to_owned(),
                supporting_document: document.clone(),
            })
        }
        _ => Err(errors),
    }
}

/// Why a registration did not produce a land row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Another registration on the same workflow is still running.
    #[error("a land registration is already in progress")]
    Busy,
    /// No user is signed in.
    #[error("You must be logged in to register land")]
    Authentication,
    /// One or more form fields were rejected.
    #[error("{0}")]
    Validation(FieldErrors),
    /// The supporting document could not be hosted.
    #[error("{message}")]
    Upload { message: String },
    /// The land row could not be written.
    #[error("{message}")]
    LandCreation { message: String },
}

/// Form state plus the orchestration of one land registration at a time.
pub struct LandRegistration {
    session: Arc<dyn SessionQuery>,
    lands: Arc<dyn LandCommand>,
    notifier: Arc<dyn Notifier>,
    form: Mutex<RegistrationForm>,
    phases: PhaseTracker,
}

impl LandRegistration {
    /// Build a workflow over the session and land seams.
    pub fn new(
        session: Arc<dyn SessionQuery>,
        lands: Arc<dyn LandCommand>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            lands,
            notifier,
            form: Mutex::new(RegistrationForm::default()),
            phases: PhaseTracker::new(),
        }
    }

    fn form_mut(&self) -> MutexGuard<'_, RegistrationForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the form input.
    pub fn form(&self) -> RegistrationForm {
        self.form_mut().clone()
    }

    /// Replace the text fields in one go.
    pub fn fill(
        &self,
        parcel_id: impl Into<String>,
        size: impl Into<String>,
        ownership_type: impl Into<String>,
    ) {
        let mut form = self.form_mut();
        form.parcel_id = parcel_id.into();
        form.size = size.into();
        form.ownership_type = ownership_type.into();
    }

    /// Stage the supporting document, reporting type and size problems
    /// immediately. The file stays staged either way.
    pub fn attach_supporting_document(
        &self,
        document: DocumentFile,
    ) -> Result<(), DocumentValidationError> {
        let checked = document.validate().map(|_| ());
        self.form_mut().supporting_document = Some(document);
        checked
    }

    /// Drop the staged supporting document.
    pub fn clear_supporting_document(&self) {
        self.form_mut().supporting_document = None;
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

    /// Run one registration.
    pub async fn submit(&self) -> Result<Land, RegistrationError> {
        self.phases.run(RegistrationError::Busy, self.run()).await
    }

    async fn run(&self) -> Result<Land, RegistrationError> {
        let Some(user) = self.session.current_user() else {
            let err = RegistrationError::Authentication;
            self.notifier.error(AUTHENTICATION_ERROR_TITLE, &err.to_string());
            return Err(err);
        };

        self.phases.enter(SubmissionPhase::Validating);
        let validated =
            validate_registration_form(&self.form()).map_err(RegistrationError::Validation)?;

        self.phases.enter(SubmissionPhase::UploadingDocument);
        let url = self
            .lands
            .upload_supporting_document(&validated.supporting_document, &user.id)
            .await
            .map_err(|err| {
                warn!(user_id = %user.id, error = %err, "supporting document upload failed");
                self.fail(RegistrationError::Upload {
                    message: err.message().to_owned(),
                })
            })?;

        self.phases.enter(SubmissionPhase::Saving);
        let land = self
            .lands
            .register_land(validated.into_new_land(url, user.id.clone()))
            .await
            .map_err(|err| {
                warn!(user_id = %user.id, error = %err, "land registration failed");
                self.fail(RegistrationError::LandCreation {
                    message: err.message().to_owned(),
                })
            })?;

        *self.form_mut() = RegistrationForm::default();
        info!(land_id = %land.id, parcel_id = %land.parcel_id, "land registered");
        self.notifier.success(LAND_REGISTERED_TITLE, LAND_REGISTERED_BODY);
        Ok(land)
    }

    fn fail(&self, err: RegistrationError) -> RegistrationError {
        self.notifier.error(REGISTRATION_FAILED_TITLE, &err.to_string());
        err
    }
}

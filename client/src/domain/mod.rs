//! Domain primitives, stores, and workflows.
//!
//! Purpose: keep the registry's rules independent of transports. Types here
//! validate their own invariants; stores and workflows only talk to the
//! outside world through the ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: normalised failure reported by stores.
//! - User, Land, Transfer and their payloads: the registry data model.
//! - AuthStore, LandStore, TransferStore: observable caches over the ports.
//! - TransferSubmission, LandRegistration: upload-then-create workflows.

pub mod auth;
pub mod auth_store;
pub mod document;
pub mod error;
pub mod form;
pub mod land;
pub mod land_registration;
pub mod land_store;
pub mod ports;
pub mod store_state;
pub mod submission_phase;
pub mod transfer;
pub mod transfer_store;
pub mod transfer_submission;
pub mod user;

pub use self::auth::{Credentials, CredentialsValidationError, PASSWORD_MIN, SignUpDetails};
pub use self::auth_store::AuthStore;
pub use self::document::{
    DEFAULT_UPLOAD_FOLDER, DocumentCategory, DocumentFile, DocumentMediaType,
    DocumentValidationError, MAX_DOCUMENT_BYTES,
};
pub use self::error::{Error, ErrorCode};
pub use self::form::{FieldErrors, FormField};
pub use self::land::{Land, LandId, LandStatus, LandValidationError, NewLand, ParcelId};
pub use self::land_registration::{LandRegistration, RegistrationError};
pub use self::land_store::LandStore;
pub use self::store_state::StoreState;
pub use self::transfer::{
    NewTransfer, RECIPIENT_NAME_MIN, RecipientName, Transfer, TransferId, TransferStatus,
    TransferUpdate, TransferValidationError,
};
pub use self::transfer_store::TransferStore;
pub use self::submission_phase::SubmissionPhase;
pub use self::transfer_submission::{SubmissionError, TransferSubmission};
pub use self::user::{Email, User, UserId, UserValidationError};

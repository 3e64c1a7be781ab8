//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`AuthProvider`, `LandRepository`, `TransferRepository`,
//! `DocumentUploader`, `Notifier`) are implemented by outbound adapters.
//! Driving ports (`SessionQuery`, `OwnedLandsQuery`, `LandCommand`,
//! `TransferCommand`) are implemented by the stores and consumed by the
//! workflows.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_provider;
mod document_uploader;
mod land_command;
mod land_repository;
mod notifier;
mod owned_lands_query;
mod session_query;
mod transfer_command;
mod transfer_repository;

#[cfg(test)]
pub use auth_provider::MockAuthProvider;
pub use auth_provider::{AuthProvider, AuthProviderError};
#[cfg(test)]
pub use document_uploader::MockDocumentUploader;
pub use document_uploader::{DocumentUploadError, DocumentUploader, upload_document};
pub use land_command::LandCommand;
#[cfg(test)]
pub use land_command::MockLandCommand;
#[cfg(test)]
pub use land_repository::MockLandRepository;
pub use land_repository::{LandRepository, LandRepositoryError};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::Notifier;
#[cfg(test)]
pub use owned_lands_query::MockOwnedLandsQuery;
pub use owned_lands_query::OwnedLandsQuery;
#[cfg(test)]
pub use session_query::MockSessionQuery;
pub use session_query::SessionQuery;
#[cfg(test)]
pub use transfer_command::MockTransferCommand;
pub use transfer_command::TransferCommand;
#[cfg(test)]
pub use transfer_repository::MockTransferRepository;
pub use transfer_repository::{TransferRepository, TransferRepositoryError};

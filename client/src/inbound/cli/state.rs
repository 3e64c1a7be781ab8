//! Shared CLI adapter state.
//!
//! Command handlers only see the stores and workflows built here, so they
//! depend on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthProvider, DocumentUploader, LandRepository, Notifier, TransferRepository,
};
use crate::domain::{AuthStore, LandRegistration, LandStore, TransferStore, TransferSubmission};

/// Parameter object bundling the driven ports the CLI needs.
#[derive(Clone)]
pub struct CliStatePorts {
    pub auth: Arc<dyn AuthProvider>,
    pub lands: Arc<dyn LandRepository>,
    pub transfers: Arc<dyn TransferRepository>,
    pub uploader: Arc<dyn DocumentUploader>,
    pub notifier: Arc<dyn Notifier>,
}

/// Stores and workflows for one CLI invocation.
pub struct CliState {
    pub auth: Arc<AuthStore>,
    pub lands: Arc<LandStore>,
    pub transfers: Arc<TransferStore>,
    pub transfer_submission: TransferSubmission,
    pub land_registration: LandRegistration,
}

impl From<CliStatePorts> for CliState {
    fn from(ports: CliStatePorts) -> Self {
        let auth = Arc::new(AuthStore::new(ports.auth));
        let lands = Arc::new(LandStore::new(ports.lands, Arc::clone(&ports.uploader)));
        let transfers = Arc::new(TransferStore::new(ports.transfers, ports.uploader));
        let transfer_submission = TransferSubmission::new(
            auth.clone(),
            lands.clone(),
            transfers.clone(),
            Arc::clone(&ports.notifier),
        );
        let land_registration = LandRegistration::new(auth.clone(), lands.clone(), ports.notifier);
        Self {
            auth,
            lands,
            transfers,
            transfer_submission,
            land_registration,
        }
    }
}

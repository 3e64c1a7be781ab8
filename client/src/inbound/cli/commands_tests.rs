//! Tests for CLI command handlers.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockAuthProvider, MockDocumentUploader, MockLandRepository, MockTransferRepository,
};
use crate::domain::{
    Email, LandId, LandStatus, ParcelId, TransferStatus, UserId, transfer_submission,
};
use crate::inbound::cli::args::StatusArg;
use crate::inbound::cli::state::CliStatePorts;
use crate::test_support::{Notice, RecordingNotifier, Scratch};

struct Harness {
    auth: MockAuthProvider,
    lands: MockLandRepository,
    transfers: MockTransferRepository,
    uploader: MockDocumentUploader,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn new() -> Self {
        Self {
            auth: MockAuthProvider::new(),
            lands: MockLandRepository::new(),
            transfers: MockTransferRepository::new(),
            uploader: MockDocumentUploader::new(),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    fn signed_in(mut self, user: &User) -> Self {
        let user = user.clone();
        self.auth
            .expect_current_user()
            .returning(move || Ok(Some(user.clone())));
        self
    }

    fn anonymous(mut self) -> Self {
        self.auth.expect_current_user().returning(|| Ok(None));
        self
    }

    fn into_state(self) -> (CliState, Arc<RecordingNotifier>) {
        let notifier = Arc::clone(&self.notifier);
        let state = CliState::from(CliStatePorts {
            auth: Arc::new(self.auth),
            lands: Arc::new(self.lands),
            transfers: Arc::new(self.transfers),
            uploader: Arc::new(self.uploader),
            notifier: self.notifier,
        });
        (state, notifier)
    }
}

async fn run(state: &CliState, command: Command) -> (Result<(), CliError>, String) {
    let mut out = Vec::new();
    let result = execute(state, command, &mut out).await;
    (result, String::from_utf8(out).expect("utf-8 output"))
}

#[fixture]
fn user() -> User {
    User {
        id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("user id"),
        email: Email::new("owner@example.com").expect("email"),
        full_name: Some("Ada Owner".to_owned()),
    }
}

fn land(owner: &UserId, parcel: i64) -> Land {
    Land {
        id: LandId::new(format!("land-{parcel}")),
        parcel_id: ParcelId::new(parcel).expect("parcel"),
        size: 1000.0,
        ownership_type: "Individual".to_owned(),
        supporting_document_url: Some("https://example.com/doc1.pdf".to_owned()),
        status: LandStatus::Pending,
        owner_id: owner.clone(),
        created_at: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp"),
    }
}

fn transfer(id: &str, status: TransferStatus) -> Transfer {
    Transfer {
        id: TransferId::new(id),
        parcel_id: ParcelId::new(12345).expect("parcel"),
        recipient_name: "Jane Smith".to_owned(),
        contract_document_url: Some("https://cloudinary.com/uploaded-contract.pdf".to_owned()),
        status,
        sender_id: None,
        created_at: Utc
            .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
            .single()
            .expect("timestamp"),
    }
}

#[rstest]
#[tokio::test]
async fn whoami_reports_an_anonymous_session() {
    let (state, _) = Harness::new().anonymous().into_state();

    let (result, out) = run(&state, Command::Whoami).await;

    result.expect("whoami");
    assert_eq!(out, "Not signed in\n");
}

#[rstest]
#[tokio::test]
async fn lands_list_requires_a_session() {
    let mut harness = Harness::new().anonymous();
    harness.lands.expect_list_by_owner().never();
    let (state, _) = harness.into_state();

    let (result, out) = run(&state, Command::Lands(LandsCommand::List)).await;

    assert!(matches!(result, Err(CliError::NotSignedIn)));
    assert!(out.is_empty());
}

#[rstest]
#[tokio::test]
async fn lands_list_prints_one_line_per_parcel(user: User) {
    let mut harness = Harness::new().signed_in(&user);
    let rows = vec![land(&user.id, 222), land(&user.id, 111)];
    harness
        .lands
        .expect_list_by_owner()
        .times(1)
        .return_once(move |_| Ok(rows));
    let (state, _) = harness.into_state();

    let (result, out) = run(&state, Command::Lands(LandsCommand::List)).await;

    result.expect("list lands");
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("land-222\tparcel=222\t"));
    assert!(lines[1].contains("status=Pending"));
}

#[rstest]
#[tokio::test]
async fn initiate_without_a_session_makes_no_remote_calls() {
    let scratch = Scratch::new().expect("scratch dir");
    let contract = scratch.write("contract.pdf", b"%PDF-1.7").expect("write");
    let mut harness = Harness::new().anonymous();
    harness.lands.expect_list_by_owner().never();
    harness.uploader.expect_upload().never();
    harness.transfers.expect_insert().never();
    let (state, notifier) = harness.into_state();

    let (result, _) = run(
        &state,
        Command::Transfers(TransfersCommand::Initiate(InitiateArgs {
            parcel_id: "12345".to_owned(),
            recipient_name: "Jane Smith".to_owned(),
            contract,
        })),
    )
    .await;

    let err = result.expect_err("anonymous submission");
    assert_eq!(err.to_string(), "You must be logged in to initiate a transfer");
    assert_eq!(
        notifier.notices(),
        vec![Notice::Error {
            title: transfer_submission::AUTHENTICATION_ERROR_TITLE.to_owned(),
            body: "You must be logged in to initiate a transfer".to_owned(),
        }]
    );
}

#[rstest]
#[tokio::test]
async fn initiate_uploads_then_creates_the_transfer(user: User) {
    let scratch = Scratch::new().expect("scratch dir");
    let contract = scratch.write("contract.pdf", b"%PDF-1.7").expect("write");
    let mut harness = Harness::new().signed_in(&user);
    let owned = vec![land(&user.id, 12345)];
    harness
        .lands
        .expect_list_by_owner()
        .times(1)
        .return_once(move |_| Ok(owned));
    harness
        .uploader
        .expect_upload()
        .withf(|file, folder| {
            file.file_name() == "contract.pdf"
                && folder == "land-management/contract-documents/3fa85f64-5717-4562-b3fc-2c963f66afa6"
        })
        .times(1)
        .return_once(|_, _| Ok("https://cloudinary.com/uploaded-contract.pdf".to_owned()));
    harness
        .transfers
        .expect_insert()
        .withf(|new| {
            new.contract_document_url == "https://cloudinary.com/uploaded-contract.pdf"
                && new.recipient_name == "Jane Smith"
        })
        .times(1)
        .return_once(|_| Ok(transfer("transfer-123", TransferStatus::Pending)));
    let (state, notifier) = harness.into_state();

    let (result, out) = run(
        &state,
        Command::Transfers(TransfersCommand::Initiate(InitiateArgs {
            parcel_id: "12345".to_owned(),
            recipient_name: "Jane Smith".to_owned(),
            contract,
        })),
    )
    .await;

    result.expect("initiate transfer");
    assert_eq!(
        out,
        "Transfer transfer-123 of parcel 12345 to Jane Smith is Pending\n"
    );
    assert_eq!(
        notifier.notices(),
        vec![Notice::Success {
            title: transfer_submission::TRANSFER_INITIATED_TITLE.to_owned(),
            body: transfer_submission::TRANSFER_INITIATED_BODY.to_owned(),
        }]
    );
}

#[rstest]
#[tokio::test]
async fn unreadable_documents_stop_before_any_call() {
    let scratch = Scratch::new().expect("scratch dir");
    let mut harness = Harness::new();
    harness.auth.expect_current_user().never();
    let (state, _) = harness.into_state();

    let (result, _) = run(
        &state,
        Command::Lands(LandsCommand::Register(RegisterArgs {
            parcel_id: "1".to_owned(),
            size: "10".to_owned(),
            ownership_type: "Individual".to_owned(),
            document: scratch.path().join("missing.pdf"),
        })),
    )
    .await;

    assert!(matches!(result, Err(CliError::Document { .. })));
}

#[rstest]
#[tokio::test]
async fn update_without_changes_is_rejected() {
    let mut harness = Harness::new();
    harness.transfers.expect_update().never();
    let (state, _) = harness.into_state();

    let (result, _) = run(
        &state,
        Command::Transfers(TransfersCommand::Update(UpdateArgs {
            id: "t-1".to_owned(),
            status: None,
            recipient_name: None,
        })),
    )
    .await;

    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[rstest]
#[tokio::test]
async fn update_sends_the_new_status(user: User) {
    let mut harness = Harness::new().signed_in(&user);
    harness
        .transfers
        .expect_update()
        .withf(|id, update| {
            id.as_ref() == "t-1"
                && update.status == Some(TransferStatus::Approved)
                && update.recipient_name.is_none()
        })
        .times(1)
        .return_once(|_, _| Ok(transfer("t-1", TransferStatus::Approved)));
    let (state, _) = harness.into_state();

    let (result, out) = run(
        &state,
        Command::Transfers(TransfersCommand::Update(UpdateArgs {
            id: "t-1".to_owned(),
            status: Some(StatusArg::Approved),
            recipient_name: None,
        })),
    )
    .await;

    result.expect("update transfer");
    assert!(out.starts_with("t-1\tparcel=12345\trecipient=Jane Smith\tstatus=Approved"));
}

#[rstest]
#[tokio::test]
async fn sign_in_rejections_surface_the_provider_message() {
    let mut harness = Harness::new();
    harness.auth.expect_sign_in().return_once(|_| {
        Err(crate::domain::ports::AuthProviderError::rejected(
            "Invalid login credentials",
        ))
    });
    let (state, _) = harness.into_state();

    let (result, _) = run(
        &state,
        Command::SignIn {
            email: "owner@example.com".to_owned(),
            password: "wrong-password".to_owned(),
        },
    )
    .await;

    assert_eq!(
        result.expect_err("rejected").to_string(),
        "Invalid login credentials"
    );
}

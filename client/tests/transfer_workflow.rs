//! End-to-end transfer initiation through the CLI state, with the Supabase
//! and Cloudinary adapters pointed at one loopback stub.

mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use land_registry::inbound::cli::{
    CliError, CliState, CliStatePorts, Command, InitiateArgs, TransfersCommand, execute,
};
use land_registry::outbound::cloudinary::{CloudinaryCredentials, CloudinaryUploader};
use land_registry::outbound::supabase::{
    SessionToken, SupabaseAuth, SupabaseClient, SupabaseLandRepository,
    SupabaseTransferRepository,
};
use land_registry::test_support::{FixtureClock, Notice, RecordingNotifier, Scratch};
use support::{Recorded, Stub, spawn_stub};

const OWNER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
const SECURE_URL: &str = "https://cloudinary.com/uploaded-contract.pdf";

fn registry(request: &Recorded, transfer_status: u16) -> (u16, Value) {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/auth/v1/user") => (200, json!({ "id": OWNER, "email": "owner@example.com" })),
        ("GET", "/rest/v1/lands") => (
            200,
            json!([{
                "id": "land-1",
                "parcel_id": 12345,
                "size": 1000.0,
                "ownership_type": "Individual",
                "status": "Approved",
                "owner_id": OWNER,
                "created_at": "2024-01-01T00:00:00Z"
            }]),
        ),
        ("POST", "/v1_1/demo/auto/upload") => (200, json!({ "secure_url": SECURE_URL })),
        ("POST", "/rest/v1/transfers") if transfer_status == 201 => (
            201,
            json!([{
                "id": "transfer-123",
                "parcel_id": 12345,
                "recipient_name": "Jane Smith",
                "contract_document_url": SECURE_URL,
                "status": "Pending",
                "created_at": "2024-01-02T00:00:00Z"
            }]),
        ),
        ("POST", "/rest/v1/transfers") => (transfer_status, json!({ "message": "Network timeout" })),
        _ => (404, json!({ "message": "unexpected request" })),
    }
}

fn wire(stub: &Stub, session: Arc<SessionToken>) -> (CliState, Arc<RecordingNotifier>) {
    let supabase = SupabaseClient::new(stub.base.clone(), "anon-key", session, Duration::from_secs(5))
        .expect("client");
    let now = Utc
        .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
        .single()
        .expect("timestamp");
    let uploader = CloudinaryUploader::new(
        stub.base.clone(),
        CloudinaryCredentials::from_parts(
            Some("demo".to_owned()),
            Some("123456".to_owned()),
            Some("test-secret".to_owned()),
        ),
        Duration::from_secs(5),
        Arc::new(FixtureClock::at(now)),
    )
    .expect("uploader");
    let notifier = Arc::new(RecordingNotifier::default());
    let state = CliState::from(CliStatePorts {
        auth: Arc::new(SupabaseAuth::new(supabase.clone())),
        lands: Arc::new(SupabaseLandRepository::new(supabase.clone())),
        transfers: Arc::new(SupabaseTransferRepository::new(supabase)),
        uploader: Arc::new(uploader),
        notifier: notifier.clone(),
    });
    (state, notifier)
}

fn initiate(contract: std::path::PathBuf) -> Command {
    Command::Transfers(TransfersCommand::Initiate(InitiateArgs {
        parcel_id: "12345".to_owned(),
        recipient_name: "Jane Smith".to_owned(),
        contract,
    }))
}

#[actix_web::test]
async fn initiating_uploads_then_creates_a_pending_transfer() {
    let stub = spawn_stub(|request| registry(request, 201)).await;
    let (state, notifier) = wire(&stub, Arc::new(SessionToken::with_token("jwt")));
    let scratch = Scratch::new().expect("scratch dir");
    let contract = scratch.write("contract.pdf", b"%PDF-1.7").expect("write");
    let mut out = Vec::new();

    execute(&state, initiate(contract), &mut out)
        .await
        .expect("transfer initiated");

    let paths: Vec<_> = stub
        .requests()
        .iter()
        .map(|request| format!("{} {}", request.method, request.path))
        .collect();
    assert_eq!(
        paths,
        vec![
            "GET /auth/v1/user",
            "GET /rest/v1/lands",
            "POST /v1_1/demo/auto/upload",
            "POST /rest/v1/transfers"
        ]
    );
    let created = stub
        .requests()
        .into_iter()
        .find(|request| request.path == "/rest/v1/transfers")
        .expect("create request");
    assert_eq!(
        created.json(),
        json!({
            "parcel_id": 12345,
            "recipient_name": "Jane Smith",
            "contract_document_url": SECURE_URL,
            "status": "Pending"
        })
    );
    assert_eq!(
        notifier.notices(),
        vec![Notice::Success {
            title: "Transfer initiated".to_owned(),
            body: "Your transfer request has been submitted successfully".to_owned(),
        }]
    );
    assert_eq!(state.transfers.transfers().len(), 1);
    stub.stop().await;
}

#[actix_web::test]
async fn creation_failures_keep_the_upload_and_notify() {
    let stub = spawn_stub(|request| registry(request, 503)).await;
    let (state, notifier) = wire(&stub, Arc::new(SessionToken::with_token("jwt")));
    let scratch = Scratch::new().expect("scratch dir");
    let contract = scratch.write("contract.pdf", b"%PDF-1.7").expect("write");
    let mut out = Vec::new();

    let err = execute(&state, initiate(contract), &mut out)
        .await
        .expect_err("creation fails");

    assert!(matches!(err, CliError::Submission(_)));
    assert_eq!(err.to_string(), "Network timeout");
    let uploads = stub
        .requests()
        .iter()
        .filter(|request| request.path == "/v1_1/demo/auto/upload")
        .count();
    assert_eq!(uploads, 1);
    assert_eq!(
        notifier.notices(),
        vec![Notice::Error {
            title: "Transfer failed".to_owned(),
            body: "Network timeout".to_owned(),
        }]
    );
    stub.stop().await;
}

#[actix_web::test]
async fn signed_out_users_trigger_no_remote_calls() {
    let stub = spawn_stub(|request| registry(request, 201)).await;
    let (state, notifier) = wire(&stub, Arc::new(SessionToken::default()));
    let scratch = Scratch::new().expect("scratch dir");
    let contract = scratch.write("contract.pdf", b"%PDF-1.7").expect("write");
    let mut out = Vec::new();

    let err = execute(&state, initiate(contract), &mut out)
        .await
        .expect_err("not signed in");

    assert_eq!(err.to_string(), "You must be logged in to initiate a transfer");
    assert!(stub.requests().is_empty());
    assert_eq!(
        notifier.notices(),
        vec![Notice::Error {
            title: "Authentication error".to_owned(),
            body: "You must be logged in to initiate a transfer".to_owned(),
        }]
    );
    stub.stop().await;
}

//! Command handlers.
//!
//! Each handler rehydrates the session, calls stores or workflows, and writes
//! a plain-text report. Failures are returned as [`CliError`] so the binary
//! can exit non-zero.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::args::{Command, InitiateArgs, LandsCommand, RegisterArgs, TransfersCommand, UpdateArgs};
use super::document::read_document;
use super::state::CliState;
use crate::domain::{
    Credentials, DocumentFile, Error, Land, RegistrationError, SignUpDetails, SubmissionError,
    Transfer, TransferId, TransferUpdate, User,
};

/// Why a command did not complete.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The command needs a session and none was restored.
    #[error("not signed in; run `land-registry sign-in` first")]
    NotSignedIn,
    /// Arguments parsed but failed domain validation.
    #[error("{0}")]
    InvalidInput(String),
    /// A document named on the command line could not be read.
    #[error("read document `{}`: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] Error),
    /// Transfer initiation failed.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    /// Land registration failed.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    /// The report could not be written.
    #[error("write output: {0}")]
    Output(#[from] io::Error),
}

/// Run one command against `state`, writing its report to `out`.
pub async fn execute<W>(state: &CliState, command: Command, out: &mut W) -> Result<(), CliError>
where
    W: Write,
{
    match command {
        Command::SignUp {
            email,
            password,
            full_name,
        } => sign_up(state, &email, &password, &full_name, out).await,
        Command::SignIn { email, password } => sign_in(state, &email, &password, out).await,
        Command::SignOut => {
            state.auth.sign_out().await?;
            writeln!(out, "Signed out")?;
            Ok(())
        }
        Command::Whoami => {
            match state.auth.get_current_user().await {
                Some(user) => write_user(out, &user)?,
                None => writeln!(out, "Not signed in")?,
            }
            Ok(())
        }
        Command::Lands(LandsCommand::List) => {
            let user = require_user(state).await?;
            let lands = state.lands.fetch_user_lands(&user.id).await?;
            write_lands(out, &lands)
        }
        Command::Lands(LandsCommand::Register(args)) => register_land(state, args, out).await,
        Command::Transfers(TransfersCommand::List) => {
            let user = require_user(state).await?;
            let transfers = state.transfers.fetch_user_transfers(&user.id).await?;
            write_transfers(out, &transfers)
        }
        Command::Transfers(TransfersCommand::Initiate(args)) => {
            initiate_transfer(state, args, out).await
        }
        Command::Transfers(TransfersCommand::Update(args)) => {
            update_transfer(state, args, out).await
        }
        Command::Transfers(TransfersCommand::Delete { id }) => {
            require_user(state).await?;
            state.transfers.delete_transfer(&TransferId::new(id.clone())).await?;
            writeln!(out, "Deleted transfer {id}")?;
            Ok(())
        }
    }
}

async fn require_user(state: &CliState) -> Result<User, CliError> {
    state
        .auth
        .get_current_user()
        .await
        .ok_or(CliError::NotSignedIn)
}

fn load_document(path: &Path) -> Result<DocumentFile, CliError> {
    read_document(path).map_err(|source| CliError::Document {
        path: path.to_path_buf(),
        source,
    })
}

async fn sign_up<W: Write>(
    state: &CliState,
    email: &str,
    password: &str,
    full_name: &str,
    out: &mut W,
) -> Result<(), CliError> {
    let details = SignUpDetails::try_from_parts(email, password, full_name)
        .map_err(|err| CliError::InvalidInput(err.to_string()))?;
    match state.auth.sign_up(&details).await? {
        Some(user) if state.auth.is_authenticated() => write_user(out, &user)?,
        _ => writeln!(out, "Account created; check your email to confirm it")?,
    }
    Ok(())
}

async fn sign_in<W: Write>(
    state: &CliState,
    email: &str,
    password: &str,
    out: &mut W,
) -> Result<(), CliError> {
    let credentials = Credentials::try_from_parts(email, password)
        .map_err(|err| CliError::InvalidInput(err.to_string()))?;
    let user = state.auth.sign_in(&credentials).await?;
    write_user(out, &user)?;
    Ok(())
}

async fn register_land<W: Write>(
    state: &CliState,
    args: RegisterArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let document = load_document(&args.document)?;
    state.auth.get_current_user().await;

    let registration = &state.land_registration;
    registration.fill(args.parcel_id, args.size, args.ownership_type);
    if let Err(err) = registration.attach_supporting_document(document) {
        debug!(error = %err, "supporting document staged with problems");
    }
    let land = registration.submit().await?;
    writeln!(
        out,
        "Registered parcel {} ({}) as {}",
        land.parcel_id, land.status, land.id
    )?;
    Ok(())
}

async fn initiate_transfer<W: Write>(
    state: &CliState,
    args: InitiateArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let document = load_document(&args.contract)?;
    if let Some(user) = state.auth.get_current_user().await {
        state.lands.fetch_user_lands(&user.id).await?;
    }

    let submission = &state.transfer_submission;
    submission.set_parcel_id(args.parcel_id);
    submission.set_recipient_name(args.recipient_name);
    if let Err(err) = submission.attach_contract_document(document) {
        debug!(error = %err, "contract document staged with problems");
    }
    let transfer = submission.submit().await?;
    writeln!(
        out,
        "Transfer {} of parcel {} to {} is {}",
        transfer.id, transfer.parcel_id, transfer.recipient_name, transfer.status
    )?;
    Ok(())
}

async fn update_transfer<W: Write>(
    state: &CliState,
    args: UpdateArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let update = TransferUpdate {
        recipient_name: args.recipient_name,
        status: args.status.map(Into::into),
        ..TransferUpdate::default()
    };
    if update.is_empty() {
        return Err(CliError::InvalidInput(
            "nothing to update; pass --status or --recipient-name".to_owned(),
        ));
    }
    require_user(state).await?;
    let transfer = state
        .transfers
        .update_transfer(&TransferId::new(args.id), &update)
        .await?;
    write_transfers(out, std::slice::from_ref(&transfer))
}

fn write_user<W: Write>(out: &mut W, user: &User) -> io::Result<()> {
    match &user.full_name {
        Some(name) => writeln!(out, "Signed in as {name} <{}> ({})", user.email, user.id),
        None => writeln!(out, "Signed in as {} ({})", user.email, user.id),
    }
}

fn write_lands<W: Write>(out: &mut W, lands: &[Land]) -> Result<(), CliError> {
    if lands.is_empty() {
        writeln!(out, "No land registered")?;
    }
    for land in lands {
        writeln!(
            out,
            "{}\tparcel={}\tsize={}\townership={}\tstatus={}\tdocument={}",
            land.id,
            land.parcel_id,
            land.size,
            land.ownership_type,
            land.status,
            land.supporting_document_url.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

fn write_transfers<W: Write>(out: &mut W, transfers: &[Transfer]) -> Result<(), CliError> {
    if transfers.is_empty() {
        writeln!(out, "No transfers")?;
    }
    for transfer in transfers {
        writeln!(
            out,
            "{}\tparcel={}\trecipient={}\tstatus={}\tcontract={}",
            transfer.id,
            transfer.parcel_id,
            transfer.recipient_name,
            transfer.status,
            transfer.contract_document_url.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

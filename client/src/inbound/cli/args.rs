//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::TransferStatus;

/// `land-registry` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "land-registry",
    about = "Register land parcels and manage ownership transfers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an account.
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long = "full-name", value_name = "name")]
        full_name: String,
    },
    /// Start a session and remember it for later commands.
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the remembered session.
    SignOut,
    /// Show the signed-in user.
    Whoami,
    /// Land parcels owned by the signed-in user.
    #[command(subcommand)]
    Lands(LandsCommand),
    /// Transfers initiated by the signed-in user.
    #[command(subcommand)]
    Transfers(TransfersCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum LandsCommand {
    /// List owned parcels, newest first.
    List,
    /// Register a parcel with a supporting document.
    Register(RegisterArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RegisterArgs {
    #[arg(long = "parcel-id", value_name = "id")]
    pub parcel_id: String,
    /// Area in square metres.
    #[arg(long)]
    pub size: String,
    #[arg(long = "ownership-type", value_name = "type")]
    pub ownership_type: String,
    /// PDF, JPEG or PNG file of at most 5MB.
    #[arg(long = "document", value_name = "path")]
    pub document: PathBuf,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TransfersCommand {
    /// List initiated transfers, newest first.
    List,
    /// Transfer an owned parcel to a recipient.
    Initiate(InitiateArgs),
    /// Change the status or recipient of a transfer.
    Update(UpdateArgs),
    /// Delete a transfer.
    Delete {
        /// Transfer identifier.
        id: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct InitiateArgs {
    #[arg(long = "parcel-id", value_name = "id")]
    pub parcel_id: String,
    #[arg(long = "recipient-name", value_name = "name")]
    pub recipient_name: String,
    /// Signed contract as a PDF, JPEG or PNG file of at most 5MB.
    #[arg(long = "contract", value_name = "path")]
    pub contract: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Transfer identifier.
    pub id: String,
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    #[arg(long = "recipient-name", value_name = "name")]
    pub recipient_name: Option<String>,
}

/// Transfer status as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for TransferStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => Self::Pending,
            StatusArg::Approved => Self::Approved,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument parsing.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn initiate_accepts_the_transfer_fields() {
        let cli = Cli::try_parse_from([
            "land-registry",
            "transfers",
            "initiate",
            "--parcel-id",
            "12345",
            "--recipient-name",
            "Jane Smith",
            "--contract",
            "contract.pdf",
        ])
        .expect("arguments should parse");

        let Command::Transfers(TransfersCommand::Initiate(args)) = cli.command else {
            panic!("expected transfers initiate");
        };
        assert_eq!(args.parcel_id, "12345");
        assert_eq!(args.recipient_name, "Jane Smith");
        assert_eq!(args.contract, PathBuf::from("contract.pdf"));
    }

    #[rstest]
    #[case("approved", TransferStatus::Approved)]
    #[case("rejected", TransferStatus::Rejected)]
    fn update_parses_status_values(#[case] raw: &str, #[case] expected: TransferStatus) {
        let cli = Cli::try_parse_from(["land-registry", "transfers", "update", "t-1", "--status", raw])
            .expect("arguments should parse");

        let Command::Transfers(TransfersCommand::Update(args)) = cli.command else {
            panic!("expected transfers update");
        };
        assert_eq!(args.status.map(TransferStatus::from), Some(expected));
        assert!(args.recipient_name.is_none());
    }

    #[rstest]
    fn register_requires_a_document() {
        let err = Cli::try_parse_from([
            "land-registry",
            "lands",
            "register",
            "--parcel-id",
            "1",
            "--size",
            "10",
            "--ownership-type",
            "Individual",
        ])
        .expect_err("document flag is required");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}

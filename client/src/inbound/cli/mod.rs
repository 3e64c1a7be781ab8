//! Command-line adapter.
//!
//! Parses arguments with `clap`, reads document files, and drives the domain
//! stores and workflows held in [`CliState`].

mod args;
mod commands;
mod document;
mod state;

pub use args::{
    Cli, Command, InitiateArgs, LandsCommand, RegisterArgs, StatusArg, TransfersCommand,
    UpdateArgs,
};
pub use commands::{CliError, execute};
pub use document::read_document;
pub use state::{CliState, CliStatePorts};

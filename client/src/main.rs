//! `land-registry` entry-point: loads configuration, restores the session,
//! and runs one command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod app;

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use app::{SessionFile, build_cli_state};
use land_registry::config::ClientSettings;
use land_registry::inbound::cli::{Cli, execute};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    if let Err(e) = color_eyre::install() {
        warn!(error = %e, "error report hook install failed");
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            error!(error = %report, "command failed");
            eprintln!("Error: {report:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    let config = ClientSettings::load_from_iter([OsString::from("land-registry")])
        .map_err(|error| eyre!("load configuration: {error}"))?
        .into_config()?;

    let session_file = SessionFile::new(config.session_file.clone());
    let session = Arc::new(session_file.load().wrap_err("read session file")?);
    let state = build_cli_state(&config, Arc::clone(&session))?;

    let mut stdout = io::stdout().lock();
    let outcome = execute(&state, cli.command, &mut stdout).await;

    session_file
        .store(&session)
        .wrap_err("write session file")?;
    Ok(outcome?)
}

//! Composition root for the `land-registry` binary.

mod session_file;
mod state_builders;

pub use session_file::SessionFile;
pub use state_builders::build_cli_state;

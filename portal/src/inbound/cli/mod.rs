//! Command-line adapter.
//!
//! [`Cli`] parses arguments, [`run`] executes one command against a
//! [`CliState`] and writes plain-text results. Handlers depend on ports only.

mod args;
mod commands;
mod render;
mod state;
mod watch;

use std::io;
use std::path::PathBuf;

pub use args::{
    ActorArgs, AuthCommand, Cli, Command, ContentCommand, CredentialArgs, IdentityArgs,
    ProfileCommand, RegistrationCommand, ResearchCommand, SubmitArgs,
};
pub use commands::run;
pub use state::CliState;
pub use watch::watch;

use crate::domain::Error;

/// Failure of a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A domain operation failed.
    #[error(transparent)]
    Domain(#[from] Error),
    /// An input file could not be read.
    #[error("read {path}: {source}", path = .path.display())]
    Input {
        /// File that was being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// Writing results or reading commands failed.
    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] io::Error),
}

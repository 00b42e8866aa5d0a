//! Legis CLI
//!
//! Library side of the `legis` binary: command definition, the `progress`
//! and `dashboard` commands, and their plain-text rendering.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod dashboard;
pub mod logging;
pub mod progress;
pub mod render;

pub use cli::{command, invocation, log_format, Invocation};
pub use logging::{init_logging, LogFormat};

/// Run a parsed invocation, returning what it prints
///
/// # Errors
/// Whatever the command reports
pub async fn run(invocation: &Invocation) -> anyhow::Result<String> {
    match invocation {
        Invocation::Progress(args) => progress::run(args),
        Invocation::Dashboard(args) => dashboard::run(args).await,
    }
}

use rustyline::error::ReadlineError;
use tally_config::ConfigError;
use tally_store::StoreError;
use thiserror::Error;

/// Failures that end the shell and surface as the process exit status.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("backend setup failed: {0}")]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("{0}")]
    Command(String),
}

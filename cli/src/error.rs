use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error("Base URL must start with http:// or https://, got {0}")]
    InvalidBaseUrl(String),
    #[error("Unknown command: {0} (type `help`)")]
    UnknownCommand(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Not a todo id: {0}")]
    InvalidId(String),
}

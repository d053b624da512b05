//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::dictionary::DictionaryError;

/// Anything that can go wrong while building or running a job.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

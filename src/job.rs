//! Executable jobs and their construction from definitions.

mod batch;
mod builders;
mod copy;
mod dictionary_builders;
mod factory;

use std::fmt;

pub use batch::BatchJob;
pub use builders::{
    BatchJobBuilder,
    CopyJobBuilder,
};
pub use copy::{
    CopyDictionaryJob,
    CopyPolicy,
    Filter,
};
pub use dictionary_builders::{
    CompoundDictionaryBuilder,
    DefaultDictionaryBuilder,
};
pub use factory::{
    DictionaryBuilder,
    JobBuilder,
    JobFactory,
    JobFactoryBuilder,
};

use crate::error::Error;

/// A runnable unit of work.
pub trait TranslationJob: fmt::Debug {
    /// Runs the job. `Some(dry_run)` overrides the job's own dry-run setting
    /// for this call only.
    ///
    /// # Errors
    /// Dictionary failures are propagated as they occur; changes made before
    /// the failure are kept.
    fn run(&mut self, dry_run: Option<bool>) -> Result<(), Error>;
}

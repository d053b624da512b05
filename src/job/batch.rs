//! Jobs that run other jobs in order.

use indexmap::IndexMap;
use tracing::Level;

use super::TranslationJob;
use crate::error::Error;
use crate::logging::SharedLogger;

/// Runs child jobs in order.
#[derive(Debug)]
pub struct BatchJob {
    /// Child jobs by name, in run order.
    jobs: IndexMap<String, Box<dyn TranslationJob>>,
    /// Receives "Executing job" messages.
    logger: SharedLogger,
}

impl BatchJob {
    #[must_use]
    pub fn new(logger: SharedLogger) -> Self {
        Self { jobs: IndexMap::new(), logger }
    }

    /// Adds `job` under `name`; a job already added under that name is
    /// replaced in place.
    pub fn add_job(&mut self, name: impl Into<String>, job: Box<dyn TranslationJob>) -> &mut Self {
        self.jobs.insert(name.into(), job);
        self
    }

    #[must_use]
    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl TranslationJob for BatchJob {
    /// Stops at the first failing child.
    fn run(&mut self, dry_run: Option<bool>) -> Result<(), Error> {
        for (name, job) in &mut self.jobs {
            self.logger.log(Level::INFO, "Executing job: {name}", &[("name", Some(name.as_str()))]);
            job.run(dry_run)?;
        }
        Ok(())
    }
}

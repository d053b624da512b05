//! Command line runner for configured synchronization jobs.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use i18n_sync::JobFactoryBuilder;
use i18n_sync::config::{
    ConfigurationLoader,
    DefinitionBuilderRegistry,
};
use i18n_sync::dictionary::{
    DictionaryProvider,
    MemoryDictionaryProvider,
    ProviderRegistry,
    WritableDictionaryProvider,
};
use i18n_sync::logging::TracingLogger;
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "i18n-sync", version, about = "Synchronize translation dictionaries", long_about = None)]
struct Cli {
    /// Configuration file (.json or .jsonc)
    #[arg(short, long)]
    config: PathBuf,

    /// Log what would change without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Print the configured job names and exit
    #[arg(long)]
    list: bool,

    /// Print the in-memory dictionaries as JSON after the run
    #[arg(long)]
    dump: bool,

    /// Debug output unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    /// Jobs to run, in order (all jobs when omitted)
    jobs: Vec<String>,
}

/// Entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the configuration and runs the requested jobs.
fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let builders = DefinitionBuilderRegistry::with_defaults();
    let configuration = ConfigurationLoader::new(&builders).load_path(&cli.config, None)?;

    let memory = Rc::new(MemoryDictionaryProvider::new());
    let readable: Rc<dyn DictionaryProvider> = Rc::<MemoryDictionaryProvider>::clone(&memory);
    let writable: Rc<dyn WritableDictionaryProvider> = Rc::<MemoryDictionaryProvider>::clone(&memory);
    let mut providers = ProviderRegistry::new();
    providers.register_readable("memory", readable).register_writable("memory", writable);
    let factory_builder = JobFactoryBuilder::new(providers).with_logger(Arc::new(TracingLogger));
    let factory = factory_builder.create(configuration);

    if cli.list {
        print_jobs(&factory.job_names());
        return Ok(());
    }

    let names = if cli.jobs.is_empty() { factory.job_names() } else { cli.jobs.clone() };
    let dry_run = cli.dry_run.then_some(true);
    for name in names {
        tracing::info!("Running job: {name}");
        factory.create_job_by_name(&name)?.run(dry_run)?;
    }

    if cli.dump {
        print_json(&serde_json::to_string_pretty(memory.as_ref())?);
    }
    Ok(())
}

/// Prints one job name per line.
#[allow(clippy::print_stdout)]
fn print_jobs(names: &[String]) {
    for name in names {
        println!("{name}");
    }
}

/// Prints the dictionary dump.
#[allow(clippy::print_stdout)]
fn print_json(json: &str) {
    println!("{json}");
}

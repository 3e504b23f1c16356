//! `numrange`: build a numeric range filter from a JSON query and print it.

use clap::Parser;
use numrange::{core::obs, prelude::*};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
    str::FromStr,
};
use thiserror::Error as ThisError;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

///
/// Args
///

#[derive(Debug, Parser)]
#[command(name = "numrange", version = numrange::VERSION)]
#[command(about = "Parse a numeric range filter against a field catalogue")]
struct Args {
    /// Field catalogue (TOML, `[[fields]]` entries).
    #[arg(long, env = "NUMRANGE_CATALOGUE")]
    catalogue: PathBuf,

    /// Parser configuration (TOML).
    #[arg(long, env = "NUMRANGE_CONFIG")]
    config: Option<PathBuf>,

    /// Query JSON; read from stdin when omitted.
    #[arg(long)]
    query: Option<String>,

    /// Treat the query as a `{ "<parser name>": { ... } }` document.
    #[arg(long)]
    dispatch: bool,

    /// Include parse counters in the output.
    #[arg(long)]
    metrics: bool,

    /// Log at debug level regardless of the configured level.
    #[arg(short, long)]
    verbose: bool,
}

///
/// CliError
///

#[derive(Debug, ThisError)]
enum CliError {
    #[error(transparent)]
    Numrange(#[from] numrange::Error),

    #[error("failed to read query from stdin: {0}")]
    Stdin(#[from] io::Error),

    #[error("invalid log level '{0}'")]
    LogLevel(String),

    #[error("failed to install log subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

///
/// Output
///

#[derive(Serialize)]
struct Output {
    filter: Filter,
    named_filters: BTreeMap<String, Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<obs::EventState>,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => ParserConfig::load(path).map_err(numrange::Error::from)?,
        None => ParserConfig::default(),
    };
    init_logging(&config, args.verbose)?;

    let resolver = CatalogueConfig::load(&args.catalogue)
        .and_then(CatalogueConfig::into_resolver)
        .map_err(numrange::Error::from)?;
    let cache = InMemoryFilterCache::new();
    let named = NamedFilters::new();
    let ctx = ParseContext::new(&resolver, &cache, &named).with_config(&config);

    let query = match args.query {
        Some(query) => query,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let filter = if args.dispatch {
        let registry = FilterParserRegistry::from_config(&config).map_err(numrange::Error::from)?;
        parse_filter_json(&registry, &ctx, &query)?
    } else {
        parse_json(&ctx, &query)?
    };

    let output = Output {
        filter,
        named_filters: named.drain(),
        metrics: if args.metrics {
            obs::metrics_report(None).counters
        } else {
            None
        },
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn init_logging(config: &ParserConfig, verbose: bool) -> Result<(), CliError> {
    let level = if verbose {
        Level::DEBUG
    } else {
        Level::from_str(&config.log_level)
            .map_err(|_| CliError::LogLevel(config.log_level.clone()))?
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

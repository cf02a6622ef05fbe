//! multipick CLI
//!
//! Interactive multi-select picker over a remote search API, plus a
//! one-shot search command for scripting.

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::HumanDuration;
use multipick::tui::app::ExitAction;
use multipick::{
    format_selection, highlight, logging, AppConfig, HttpProvider, OutputFormat, SearchProvider,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// multipick - search a remote API and pick several results
#[derive(Parser)]
#[command(name = "multipick")]
#[command(author = "multipick contributors")]
#[command(version)]
#[command(about = "Multi-select search picker for remote text-search APIs", long_about = None)]
struct Cli {
    /// Search endpoint; the query is sent as `?name=<query>`
    #[arg(long, global = true, env = "MULTIPICK_ENDPOINT", default_value = multipick::provider::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "MULTIPICK_TIMEOUT_MS", default_value = "10000")]
    timeout_ms: u64,

    /// Quiet period after a keystroke before searching (0 = search every keystroke)
    #[arg(long, global = true, env = "MULTIPICK_DEBOUNCE_MS", default_value = "300")]
    debounce_ms: u64,

    /// Log file (default: multipick.log next to the executable)
    #[arg(long, global = true, env = "MULTIPICK_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive picker (default)
    Pick {
        /// Query to start with
        #[arg(short, long, default_value = "")]
        query: String,

        /// Format of the printed selection
        #[arg(short, long, value_enum, default_value = "json")]
        output: Format,
    },

    /// Run one search and print the results
    Search {
        /// Search text (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Print raw JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Text => OutputFormat::Text,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let mut config = AppConfig {
        endpoint: cli.endpoint,
        timeout: Duration::from_millis(cli.timeout_ms),
        debounce: Duration::from_millis(cli.debounce_ms),
        log_file: cli.log_file,
        ..AppConfig::default()
    };

    let result = match cli.command {
        None => cmd_pick(config),
        Some(Commands::Pick { query, output }) => {
            config.initial_query = query;
            config.output = output.into();
            cmd_pick(config)
        }
        Some(Commands::Search { query, json }) => cmd_search(&config, &query, json),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Interactive picker; prints the confirmed selection on stdout
fn cmd_pick(config: AppConfig) -> multipick::Result<()> {
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    logging::init(&log_path)?;
    logging::separator("picker session");

    let provider = HttpProvider::new(&config.provider_config())?;
    tracing::info!("searching {}", provider.endpoint());

    match multipick::tui::run(&config, Arc::new(provider))? {
        ExitAction::Confirmed(picked) => {
            println!("{}", format_selection(&picked, config.output)?);
        }
        ExitAction::Cancelled => {
            tracing::info!("picker cancelled");
        }
    }

    Ok(())
}

/// One-shot search command
fn cmd_search(config: &AppConfig, query: &str, json: bool) -> multipick::Result<()> {
    logging::init_stderr()?;

    let provider = HttpProvider::new(&config.provider_config())?;
    let start = Instant::now();
    let results = provider.search(query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!(
        "{} Searching for '{}' at {}",
        style("→").cyan().bold(),
        style(query).yellow(),
        provider.endpoint()
    );
    println!();
    println!(
        "Found {} results in {}:",
        style(results.len()).green(),
        style(HumanDuration(start.elapsed())).cyan()
    );
    println!();

    for (i, entity) in results.iter().enumerate() {
        let name: String = highlight(&entity.name, query)
            .iter()
            .map(|segment| {
                if segment.is_match {
                    style(segment.text).bold().yellow().to_string()
                } else {
                    segment.text.to_string()
                }
            })
            .collect();
        println!(
            "  {} {} {}",
            style(format!("{:3}.", i + 1)).dim(),
            name,
            style(entity.episode_label()).dim()
        );
    }

    Ok(())
}

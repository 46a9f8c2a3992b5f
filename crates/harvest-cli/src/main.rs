//! harvest CLI entrypoint
//! Parses command-line arguments and dispatches to the configured parser
//! service.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use harvest_core::{create_parser, export, EventRecord, HarParserService, ParserConfig};

#[derive(Parser)]
#[command(name = "harvest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Extract event records from a HAR capture
    Parse {
        /// Path to the HAR file
        #[arg(long)]
        har: PathBuf,
        /// Emit per-entry diagnostics (requires RUST_LOG=debug or lower)
        #[arg(long)]
        debug: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Check that a file is structurally a HAR document
    Validate {
        /// Path to the HAR file
        #[arg(long)]
        har: PathBuf,
    },
    /// Describe the configured parser service
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = ParserConfig::load().await;
    let service = create_parser(&config).context("Failed to create parser service")?;

    match &cli.command {
        Commands::Parse { har, debug, format } => {
            let result = service.parse_har_file(har, *debug).await;
            if !result.success {
                bail!("{}", result.error_message);
            }
            match format {
                OutputFormat::Text => print_events_text(&result.events),
                OutputFormat::Json => println!("{}", export::events_to_json(&result.events)?),
                OutputFormat::Csv => print!("{}", export::events_to_csv(&result.events)),
            }
        }
        Commands::Validate { har } => {
            if service.validate_har_file(har).await {
                println!("{}: valid HAR file", har.display());
            } else {
                bail!("{}: not a valid HAR file", har.display());
            }
        }
        Commands::Info => {
            let info = service.service_info().await;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }
    Ok(())
}

/// One block per event: name, local time, place, quoted caption, link, id.
fn print_events_text(events: &[EventRecord]) {
    for event in events {
        println!(
            "{}\n{}\n{}\n\"{}\"\n{}\n{}\n",
            event.name, event.datetime, event.location, event.details, event.link, event.event_id
        );
    }
    println!("Extracted {} event(s).", events.len());
}

//! # email-scraper CLI
//!
//! Command-line interface for the email-scraper library.

use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use clap::Parser as ClapParser;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use email_scraper::cli::{Args, Command};
use email_scraper::config::FormatOptions;
use email_scraper::core::{Pipeline, PipelineResults};
use email_scraper::mbox::MboxReader;
use email_scraper::registry::Registry;
use email_scraper::{EmailRecord, Result, ScraperError};

const DEFAULT_PROCESSORS: [&str; 2] = ["statistics", "classifier"];

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(&args);

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

/// Logs go to stderr so stdout stays clean for piping. `RUST_LOG` wins over `-v`.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("email_scraper={}", args.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let registry = Registry::with_defaults();

    match args.command {
        Command::Read { mbox } => {
            let records = Pipeline::new(MboxReader::new()).load(&mbox)?;
            print_json(&records, b"  ")
        }

        Command::Stats => {
            let records = read_records()?;
            let output = registry.processor("statistics")?.process(&records)?;
            print_json(&output, b"  ")
        }

        Command::Classify => {
            let records = read_records()?;
            let output = registry.processor("classifier")?.process(&records)?;
            print_json(&output, b"    ")
        }

        Command::Format { format, unchecked } => {
            let results = read_results()?;
            let formatter = registry.formatter(&format)?;
            let text = formatter.format(&results, &FormatOptions::new().with_unchecked(unchecked))?;
            print_text(&text)
        }

        Command::ListProcessors => {
            println!("Available processors:");
            for (name, description) in registry.list_processors() {
                println!("  {name:<12} {description}");
            }
            Ok(())
        }

        Command::ListFormats => {
            println!("Available formats:");
            for (name, description) in registry.list_formatters() {
                println!("  {name:<12} {description}");
            }
            Ok(())
        }

        Command::Run {
            mbox,
            processors,
            format,
            unchecked,
            output,
        } => {
            let names: Vec<&str> = if processors.is_empty() {
                DEFAULT_PROCESSORS.to_vec()
            } else {
                processors.iter().map(String::as_str).collect()
            };
            // Resolve names up front so a typo fails before the mailbox is read.
            let selected = registry.processors(names)?;
            let formatter = registry.formatter(&format)?;
            let options = FormatOptions::new().with_unchecked(unchecked);

            let results = Pipeline::new(MboxReader::new()).run(&mbox, &selected)?;

            match output {
                Some(path) => {
                    formatter.save(&results, &path, &options)?;
                    report_saved(&path);
                    Ok(())
                }
                None => print_text(&formatter.format(&results, &options)?),
            }
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| ScraperError::invalid_input(format!("cannot read stdin: {e}")))?;
    debug!(bytes = input.len(), "read stdin");
    Ok(input)
}

/// Records as printed by `read`.
fn read_records() -> Result<Vec<EmailRecord>> {
    let input = read_stdin()?;
    serde_json::from_str(&input)
        .map_err(|e| ScraperError::invalid_input(format!("expected a JSON array of emails: {e}")))
}

/// Any JSON object, usually the output of `stats` or `classify`.
fn read_results() -> Result<PipelineResults> {
    let input = read_stdin()?;
    serde_json::from_str(&input)
        .map_err(|e| ScraperError::invalid_input(format!("expected a JSON object: {e}")))
}

fn print_json<T: Serialize>(value: &T, indent: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    io::stdout().lock().write_all(&buf)?;
    Ok(())
}

fn print_text(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn report_saved(path: &Path) {
    eprintln!("Results saved to {}", path.display());
}

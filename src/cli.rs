//! Command-line interface definition using clap.
//!
//! Commands can be piped together:
//!
//! ```text
//! email-scraper read inbox.mbox | email-scraper stats | email-scraper format -f csv -u
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Process and analyze email data in mbox format.
#[derive(Parser, Debug, Clone)]
#[command(name = "email-scraper")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    email-scraper read inbox.mbox > emails.json
    email-scraper read inbox.mbox | email-scraper classify
    email-scraper read inbox.mbox | email-scraper stats | email-scraper format -f yaml
    email-scraper run inbox.mbox -p statistics -f json -o report.json")]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Read emails from an mbox file and print them as a JSON array
    Read {
        /// Path to the mbox file
        mbox: PathBuf,
    },

    /// Compute statistics for emails piped in by `read`
    Stats,

    /// Classify emails piped in by `read`
    Classify,

    /// Format JSON data from stdin
    Format {
        /// Output format
        #[arg(short, long = "format", value_name = "FORMAT", default_value = "json")]
        format: String,

        /// Allow nested data in flat formats (CSV)
        #[arg(short, long)]
        unchecked: bool,
    },

    /// List available email processors
    ListProcessors,

    /// List available output formats
    ListFormats,

    /// Load an mbox file and run processors over it in one step
    Run {
        /// Path to the mbox file
        mbox: PathBuf,

        /// Processor to run (repeatable; default: all)
        #[arg(short, long = "processor", value_name = "NAME")]
        processors: Vec<String>,

        /// Output format
        #[arg(short, long = "format", value_name = "FORMAT", default_value = "json")]
        format: String,

        /// Allow nested data in flat formats (CSV)
        #[arg(short, long)]
        unchecked: bool,

        /// Save output to this file instead of printing it
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

impl Args {
    /// Log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

use std::io::BufRead;

use anyhow::{Context, bail};
use campground_scan::parse_input_date;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use notification_services::NotificationChannel;

/// Campsite checker CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "campsite-checker",
    version,
    about = "Check recreation.gov for campsite and timed-entry pass availability"
)]
pub struct Cli {
    /// Debug log level
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    /// Read park ID(s) from stdin, one per line, instead of the arguments
    #[arg(long, global = true)]
    pub stdin: bool,

    /// Announce availability through this channel (email, sms, say, log); repeatable
    #[arg(long = "notify", value_name = "CHANNEL", global = true)]
    pub notify: Vec<NotificationChannel>,

    /// Recipient override: an email address goes to the email channel, a phone number to SMS
    #[arg(long, global = true)]
    pub target: Option<String>,

    /// Record failed parks in the report and keep checking the rest
    #[arg(long, global = true)]
    pub keep_going: bool,

    /// What to check
    #[command(subcommand)]
    pub command: Command,
}

/// Check kinds
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Campgrounds with a site free for every night of a stay
    Campgrounds {
        /// First night, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        start_date: NaiveDate,
        /// Check-out day, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        end_date: NaiveDate,
        /// Park ID(s)
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        parks: Vec<u64>,
    },
    /// Timed-entry pass facilities on a single day
    Passes {
        /// Entry day, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        start_date: NaiveDate,
        /// Facility ID(s)
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        parks: Vec<u64>,
    },
}

impl Cli {
    /// Park IDs from the arguments, or from `input` under `--stdin`.
    pub fn park_ids(&self, input: impl BufRead) -> anyhow::Result<Vec<u64>> {
        let ids = if self.stdin {
            parse_park_ids(input)?
        } else {
            match &self.command {
                Command::Campgrounds { parks, .. } | Command::Passes { parks, .. } => {
                    parks.clone()
                }
            }
        };

        if ids.is_empty() {
            bail!("no park IDs given (pass them as arguments or use --stdin)");
        }
        Ok(ids)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_input_date(s).map_err(|e| e.to_string())
}

/// Reads one park ID per line. Blank lines are skipped.
pub fn parse_park_ids(input: impl BufRead) -> anyhow::Result<Vec<u64>> {
    let mut ids = Vec::new();
    for line in input.lines() {
        let line = line.context("failed to read park IDs from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let id: u64 = line
            .parse()
            .with_context(|| format!("not a park ID: '{}'", line))?;
        if id == 0 {
            bail!("not a park ID: '{}'", line);
        }
        ids.push(id);
    }
    Ok(ids)
}

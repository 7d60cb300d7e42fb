// ABOUTME: Command-line interface definitions using clap
// ABOUTME: Backup flags and their conversion into ExportOptions

use crate::api::DEFAULT_API_BASE;
use crate::config::{BoardFilters, ExportOptions, NamingMode, SizeLimit};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "trello-full-backup")]
#[command(about = "Backup everything from Trello", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Destination folder (default: timestamped folder in the current directory)
    #[arg(short = 'd', long = "destination-folder", value_name = "DEST")]
    pub destination: Option<PathBuf>,

    /// Backup closed boards
    #[arg(short = 'B', long)]
    pub closed_boards: bool,

    /// Backup archived lists
    #[arg(short = 'L', long)]
    pub archived_lists: bool,

    /// Backup archived cards
    #[arg(short = 'C', long)]
    pub archived_cards: bool,

    /// Backup organizations
    #[arg(short = 'o', long)]
    pub organizations: bool,

    /// Update an existing backup, skipping attachments already present
    #[arg(short = 'i', long)]
    pub incremental: bool,

    /// Name folders by permanent ids instead of position and name
    #[arg(short = 't', long)]
    pub tokenize: bool,

    /// Attachment size limit in bytes. Set to -1 to disable the limit
    #[arg(
        short = 'a',
        long,
        value_name = "BYTES",
        default_value = "100000000",
        allow_negative_numbers = true
    )]
    pub attachment_size: SizeLimit,

    /// Dry run (do not write to disk)
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose mode (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Trello API key (overrides TRELLO_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Trello token (overrides TRELLO_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Attachment connect timeout in seconds (transfers themselves are unbounded)
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub attachment_timeout: u64,

    /// Disable throttling (not recommended)
    #[arg(long)]
    pub no_throttle: bool,

    /// Throttle range in ms (min:max)
    #[arg(long, value_parser = parse_throttle_range)]
    pub throttle_ms: Option<(u64, u64)>,
}

fn parse_throttle_range(s: &str) -> Result<(u64, u64), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err("Expected format: min:max".into());
    }

    let min = parts[0].parse().map_err(|_| "Invalid min value")?;
    let max = parts[1].parse().map_err(|_| "Invalid max value")?;

    if min > max {
        return Err("min must be <= max".into());
    }

    Ok((min, max))
}

impl Cli {
    pub fn destination(&self) -> PathBuf {
        self.destination.clone().unwrap_or_else(|| {
            let now = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
            PathBuf::from(format!("{}_backup", now))
        })
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            naming: if self.tokenize {
                NamingMode::Stable
            } else {
                NamingMode::Positional
            },
            size_limit: self.attachment_size,
            filters: BoardFilters {
                archived_lists: self.archived_lists,
                archived_cards: self.archived_cards,
            },
            closed_boards: self.closed_boards,
            organizations: self.organizations,
            incremental: self.incremental,
            dry_run: self.dry_run,
            show_progress: self.verbose == 0 && !self.dry_run,
        }
    }
}

//! CLI command definitions.

pub mod categories;
pub mod events;

use chrono::NaiveTime;
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use eventdesk_core::storage::DateRange;

/// Back office for organizational events.
#[derive(Debug, Parser)]
#[command(name = "eventdesk")]
#[command(about = "Back office for events, meeting categories and event categories", long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, env = "EVENTDESK_FORMAT", default_value = "pretty")]
    pub format: OutputFormat,

    /// Run against a seeded in-memory store instead of the hosted store.
    #[arg(long, env = "EVENTDESK_IN_MEMORY")]
    pub in_memory: bool,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Event management.
    Events(events::EventsCommand),
    /// Meeting category (committee) management.
    Committees(categories::CategoriesCommand),
    /// Event category management.
    Categories(categories::CategoriesCommand),
    /// Per-category event counts for a month.
    Sidebar {
        /// Month to count (YYYY-MM). Defaults to the current month.
        #[arg(long, value_parser = parse_month)]
        month: Option<DateRange>,
        /// Only count events whose subject or location matches.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Set the meeting categories a participant belongs to.
    Memberships {
        /// Participant ID.
        participant_id: Uuid,
        /// Meeting category IDs. Omit to clear every membership.
        #[arg(long = "committee")]
        committees: Vec<Uuid>,
    },
}

/// Parses a `YYYY-MM` month.
pub fn parse_month(s: &str) -> Result<DateRange, String> {
    let (year, month) = s
        .trim()
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got {}", s))?;
    let year: i32 = year.parse().map_err(|_| format!("invalid year in {}", s))?;
    let month: u32 = month.parse().map_err(|_| format!("invalid month in {}", s))?;
    DateRange::month(year, month).ok_or_else(|| format!("invalid month: {}", s))
}

/// Parses an `HH:MM` or `HH:MM:SS` time.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    eventdesk_core::serde::parse_time(s).map_err(|e| format!("invalid time {}: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_month() {
        let range = parse_month("2024-02").unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        assert!(parse_month("2024").is_err());
        assert!(parse_month("2024-13").is_err());
    }

    #[test]
    fn test_parse_time_accepts_minutes() {
        assert_eq!(parse_time("9:30"), Ok(NaiveTime::from_hms_opt(9, 30, 0).unwrap()));
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_cli_parses_create() {
        let cli = Cli::try_parse_from([
            "eventdesk",
            "--in-memory",
            "events",
            "create",
            "--subject",
            "Assembly",
            "--date",
            "2024-01-01",
            "--until",
            "2024-01-03",
            "--start",
            "09:00",
            "--end",
            "10:00",
        ])
        .unwrap();

        assert!(cli.in_memory);
        assert!(matches!(
            cli.command,
            Commands::Events(events::EventsCommand {
                action: events::EventsAction::Create(_)
            })
        ));
    }
}

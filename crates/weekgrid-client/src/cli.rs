//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use weekgrid_providers::SourceOverrides;

/// weekgrid - The current week of your calendar, laid out on a grid
#[derive(Debug, Parser)]
#[command(name = "weekgrid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "WEEKGRID_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Calendar source flags. Each one overrides the matching `[source]` key.
#[derive(Debug, Default, Args)]
pub struct SourceArgs {
    /// URL of an iCalendar feed
    #[arg(long, env = "WEEKGRID_ICAL_URL", global = true)]
    pub ical_url: Option<String>,

    /// API key for the Google Calendar events API
    #[arg(long, env = "WEEKGRID_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Calendar to query with the API key
    #[arg(long, env = "WEEKGRID_CALENDAR_ID", global = true)]
    pub calendar_id: Option<String>,

    /// Maximum number of events requested from the API
    #[arg(long, env = "WEEKGRID_MAX_RESULTS", global = true)]
    pub max_results: Option<u32>,
}

impl SourceArgs {
    /// Converts the flags into per-request overrides.
    pub fn overrides(&self) -> SourceOverrides {
        let keep = |value: &Option<String>| value.clone().filter(|s| !s.trim().is_empty());
        SourceOverrides {
            ical_url: keep(&self.ical_url),
            api_key: keep(&self.api_key),
            calendar_id: keep(&self.calendar_id),
            max_results: self.max_results,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current week's events as JSON (the default)
    Week,

    /// Print the current week laid out on the grid as JSON
    Grid {
        /// Hour mapped to the first row
        #[arg(long)]
        origin_hour: Option<u32>,

        /// Hour where the visible grid ends
        #[arg(long)]
        end_hour: Option<u32>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration
    Dump,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn source_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "weekgrid",
            "--api-key",
            "k",
            "--calendar-id",
            "team@example.com",
            "--max-results",
            "10",
            "week",
        ])
        .unwrap();

        let overrides = cli.source.overrides();
        assert_eq!(overrides.api_key.as_deref(), Some("k"));
        assert_eq!(overrides.calendar_id.as_deref(), Some("team@example.com"));
        assert_eq!(overrides.max_results, Some(10));
        assert!(matches!(cli.command, Some(Command::Week)));
    }

    #[test]
    fn blank_flags_are_not_overrides() {
        let args = SourceArgs {
            ical_url: Some("  ".into()),
            ..SourceArgs::default()
        };
        assert_eq!(args.overrides().ical_url, None);
    }

    #[test]
    fn grid_hours_after_subcommand() {
        let cli = Cli::try_parse_from(["weekgrid", "grid", "--origin-hour", "8", "--end-hour", "18"])
            .unwrap();
        match cli.command {
            Some(Command::Grid {
                origin_hour,
                end_hour,
            }) => {
                assert_eq!(origin_hour, Some(8));
                assert_eq!(end_hour, Some(18));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn non_numeric_max_results_is_rejected() {
        assert!(Cli::try_parse_from(["weekgrid", "--max-results", "lots"]).is_err());
    }
}

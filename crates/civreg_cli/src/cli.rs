//! Command-line surface of the `civreg` binary.

use chrono::NaiveDate;
use civreg_core::RecordKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// civreg - birth and death registration records
#[derive(Debug, Parser)]
#[command(name = "civreg")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a record from a JSON file of form fields
    Register {
        #[arg(value_parser = parse_kind)]
        kind: RecordKind,
        fields: PathBuf,
    },

    /// List one collection, optionally filtered
    List {
        #[arg(value_parser = parse_kind)]
        kind: RecordKind,
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one record as JSON
    Show(RecordRef),

    /// Apply a JSON patch file to a record
    Edit {
        #[command(flatten)]
        record: RecordRef,
        patch: PathBuf,
    },

    /// Remove a record
    Remove(RecordRef),

    /// Find records of either kind by first name, last name or id
    Search {
        query: String,
        #[arg(short, long, default_value_t = civreg_core::DEFAULT_PROFILE_LIMIT)]
        limit: usize,
    },

    /// Show dashboard counters
    Stats {
        /// Restrict recent activity to one registration day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
    },

    /// Newest registrations of either kind
    Activity {
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
        #[arg(short, long, default_value_t = civreg_core::service::activity::DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },

    /// Registration notifications
    Notifications {
        #[arg(short, long, default_value_t = civreg_core::service::activity::DEFAULT_NOTIFICATION_LIMIT)]
        limit: usize,
    },

    /// Export a collection to CSV
    Export {
        #[arg(value_parser = parse_kind)]
        kind: RecordKind,
        #[arg(short, long)]
        search: Option<String>,
        /// Defaults to `export.output_dir` from configuration
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Print a certificate for one record
    Certificate(RecordRef),

    /// View or reset UI settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Args)]
pub struct RecordRef {
    #[arg(value_parser = parse_kind)]
    pub kind: RecordKind,
    pub id: String,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the settings in effect
    Show,
    /// Forget saved settings
    Reset,
}

fn parse_kind(value: &str) -> Result<RecordKind, String> {
    value.parse()
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, SettingsCommand};
    use civreg_core::RecordKind;
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_kind_case_insensitively() {
        let cli = Cli::parse_from(["civreg", "list", "Birth", "--search", "asha"]);
        match cli.command {
            Command::List { kind, search } => {
                assert_eq!(kind, RecordKind::Birth);
                assert_eq!(search.as_deref(), Some("asha"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["civreg", "show", "marriage", "1"]).is_err());
    }

    #[test]
    fn activity_defaults_to_dashboard_limit() {
        let cli = Cli::parse_from(["civreg", "activity", "--date", "2024-03-02"]);
        match cli.command {
            Command::Activity { date, limit } => {
                assert_eq!(limit, 5);
                assert_eq!(date.unwrap().to_string(), "2024-03-02");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn search_shows_five_hits_unless_told_otherwise() {
        let cli = Cli::parse_from(["civreg", "search", "nair"]);
        assert!(matches!(cli.command, Command::Search { limit: 5, .. }));

        let cli = Cli::parse_from(["civreg", "search", "nair", "--limit", "12"]);
        match cli.command {
            Command::Search { query, limit } => {
                assert_eq!(query, "nair");
                assert_eq!(limit, 12);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["civreg", "settings", "show", "--config", "/tmp/c.toml"]);
        assert!(matches!(cli.command, Command::Settings(SettingsCommand::Show)));
        assert_eq!(cli.config.unwrap().to_str(), Some("/tmp/c.toml"));
    }
}

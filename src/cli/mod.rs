//! Command-line surface
//!
//! Each subcommand drives one use case against the configured backend. `widget`
//! is the out-of-process reader: it only touches the shared slot.

mod commands;
mod render;

use std::path::PathBuf;

use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use qf_core::SubscriptionStatus;

pub use commands::run;

#[derive(Debug, Parser)]
#[command(name = "quotefeed")]
#[command(about = "Daily bilingual quotes: feed, likes and widget", long_about = None)]
pub struct Cli {
    /// Config file (default: <config_dir>/quotefeed/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the quote currently published to the widget slot
    Widget,
    /// Start a session and print the quote feed
    Feed {
        #[arg(short, long)]
        user: String,
        /// Move to this feed position after loading
        #[arg(short, long)]
        advance: Option<usize>,
    },
    /// Like a quote
    Like {
        quote: String,
        #[arg(short, long)]
        user: String,
    },
    /// Remove one or more likes
    Unlike {
        #[arg(required = true)]
        quotes: Vec<String>,
        #[arg(short, long)]
        user: String,
    },
    /// Show, or overwrite, the subscription state of a user
    Entitlement {
        #[arg(short, long)]
        user: String,
        /// Record a purchase or restore with this status
        #[arg(long)]
        set: Option<SubscriptionStatus>,
        /// Trial length in days when `--set trial`
        #[arg(long, default_value_t = 7)]
        trial_days: i64,
    },
    /// Update feed and notification preferences
    Preferences {
        #[arg(short, long)]
        user: String,
        /// Comma-separated category list
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
        /// Daily reminder time, HH:MM
        #[arg(long, value_parser = parse_time)]
        notify_at: Option<NaiveTime>,
        #[arg(long)]
        notifications: Option<bool>,
    },
    /// Run the onboarding flow non-interactively and save the result
    Onboard {
        #[arg(short, long)]
        user: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        /// Comma-separated category list; empty uses the defaults
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
        #[arg(long, value_parser = parse_time)]
        notify_at: Option<NaiveTime>,
        /// Use the long sequence with name, goals and category steps
        #[arg(long)]
        extended: bool,
    },
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|e| format!("expected HH:MM, got {value:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_feed_with_advance() {
        let cli = Cli::try_parse_from(["quotefeed", "feed", "--user", "u1", "--advance", "10"]).unwrap();
        match cli.command {
            Commands::Feed { user, advance } => {
                assert_eq!(user, "u1");
                assert_eq!(advance, Some(10));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_entitlement_status() {
        let cli =
            Cli::try_parse_from(["quotefeed", "entitlement", "-u", "u1", "--set", "yearly"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Entitlement {
                set: Some(SubscriptionStatus::Yearly),
                trial_days: 7,
                ..
            }
        ));

        assert!(Cli::try_parse_from(["quotefeed", "entitlement", "-u", "u1", "--set", "gold"]).is_err());
    }

    #[test]
    fn test_parse_preferences_lists_and_time() {
        let cli = Cli::try_parse_from([
            "quotefeed",
            "preferences",
            "-u",
            "u1",
            "--categories",
            "love,wisdom",
            "--notify-at",
            "21:30",
        ])
        .unwrap();
        match cli.command {
            Commands::Preferences {
                categories,
                notify_at,
                notifications,
                ..
            } => {
                assert_eq!(categories, Some(vec!["love".to_string(), "wisdom".to_string()]));
                assert_eq!(notify_at, NaiveTime::from_hms_opt(21, 30, 0));
                assert_eq!(notifications, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unlike_requires_a_quote() {
        assert!(Cli::try_parse_from(["quotefeed", "unlike", "-u", "u1"]).is_err());
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(parse_time("9am").is_err());
        assert_eq!(parse_time("07:05:30"), Ok(NaiveTime::from_hms_opt(7, 5, 30).unwrap()));
    }
}

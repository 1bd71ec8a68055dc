//! Command-line interfaces for the three binaries.
//!
//! Every option has a default or an environment fallback, so each binary
//! runs with no arguments.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Options shared by the report generators.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Pipeline configuration file (YAML); built-in defaults when absent
    #[arg(short, long, env = "WATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// awful_aj model configuration; defaults to config.yaml in the awful_aj config dir
    #[arg(long, env = "WATCH_LLM_CONFIG")]
    pub llm_config: Option<PathBuf>,

    /// GNews API key
    #[arg(long, env = "GNEWS_API_KEY", hide_env_values = true)]
    pub gnews_api_key: String,
}

/// Generate every missing daily brief up to yesterday.
#[derive(Parser, Debug)]
#[command(name = "venezuela_daily", version, about)]
pub struct DailyCli {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Generate every missing Weekly Watch report up to the last completed week.
#[derive(Parser, Debug)]
#[command(name = "venezuela_weekly", version, about)]
pub struct WeeklyCli {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Browse generated reports and reasoning.
#[derive(Parser, Debug)]
#[command(name = "venezuela_watch", version, about)]
pub struct WatchCli {
    /// Pipeline configuration file (YAML)
    #[arg(short, long, env = "WATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<WatchCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    /// List daily and weekly reports, newest first
    List,
    /// Print a daily report (latest by default)
    Daily {
        /// Report date, YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print a weekly report (latest by default)
    Weekly {
        /// Monday the week starts on, YYYY-MM-DD
        #[arg(long)]
        week: Option<NaiveDate>,
    },
    /// Print the newest reasoning entries per scenario
    Reasoning {
        #[arg(short = 'n', long, default_value_t = 3)]
        per_scenario: usize,
    },
    /// Print the assembled background for discussing current dynamics
    Context,
}

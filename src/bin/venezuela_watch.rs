//! Report viewer: prints stored reports, recent scenario reasoning, or the
//! assembled discussion context to stdout.

use clap::Parser;
use std::error::Error;
use venezuela_watch::cli::{WatchCli, WatchCommand};
use venezuela_watch::config::{WatchConfig, load_config};
use venezuela_watch::outputs::reasoning_log::recent_reasoning;
use venezuela_watch::period::{DailyPeriod, WeeklyPeriod};
use venezuela_watch::utils::init_tracing;
use venezuela_watch::viewer::{brainstorm_context, list_all, select_report};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    init_tracing("warn");

    let args = WatchCli::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command.unwrap_or(WatchCommand::List) {
        WatchCommand::List => print_list(&config).await?,
        WatchCommand::Daily { date } => {
            match select_report(&config.paths.daily_dir, date.map(DailyPeriod)).await? {
                Some(report) => println!("### Daily Report – {}\n\n{}", report.period, report.text),
                None => println!("No daily reports available yet."),
            }
        }
        WatchCommand::Weekly { week } => {
            let wanted = week.map(WeeklyPeriod::starting);
            match select_report(&config.paths.weekly_dir, wanted).await? {
                Some(report) => println!("### Weekly Report – {}\n\n{}", report.period, report.text),
                None => println!("No weekly reports available yet."),
            }
        }
        WatchCommand::Reasoning { per_scenario } => {
            println!("{}", recent_reasoning(&config.paths.reasoning_log, per_scenario).await?);
        }
        WatchCommand::Context => println!("{}", brainstorm_context(&config).await?),
    }
    Ok(())
}

async fn print_list(config: &WatchConfig) -> Result<(), Box<dyn Error>> {
    let (daily, weekly) = list_all(config).await?;
    println!("Daily reports ({}):", daily.len());
    for p in &daily {
        println!("  {p}");
    }
    println!("Weekly reports ({}):", weekly.len());
    for p in &weekly {
        println!("  {p}");
    }
    Ok(())
}

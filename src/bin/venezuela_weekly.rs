//! Weekly Watch generator. Backfills every completed week that has no
//! report yet, in order, and appends the structured reasoning to the log.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use venezuela_watch::api::{AskFnWrapper, RetryAsk, load_chat_template, load_llm_config};
use venezuela_watch::cli::WeeklyCli;
use venezuela_watch::config::load_config;
use venezuela_watch::pipeline::weekly::WeeklyPipeline;
use venezuela_watch::search::GNewsClient;
use venezuela_watch::utils::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    init_tracing("info");

    let start_time = std::time::Instant::now();
    info!("venezuela_weekly starting up");

    let args = WeeklyCli::parse();
    debug!(config = ?args.run.config, llm_config = ?args.run.llm_config, "Parsed CLI arguments");

    let config = load_config(args.run.config.as_deref()).inspect_err(|e| {
        error!(error = %e, "Failed to load pipeline configuration");
    })?;
    let source = GNewsClient::new(&config, args.run.gnews_api_key.clone())?;

    let llm_config = load_llm_config(args.run.llm_config.as_deref())?;
    let reasoning_template = load_chat_template(&config.templates.reasoning).await?;
    let narrative_template = load_chat_template(&config.templates.narrative).await?;
    let reasoner = RetryAsk::with_defaults(AskFnWrapper {
        config: &llm_config,
        template: &reasoning_template,
    });
    let narrator = RetryAsk::with_defaults(AskFnWrapper {
        config: &llm_config,
        template: &narrative_template,
    });

    let outcome = WeeklyPipeline::new(&config, &source, &reasoner, &narrator)
        .run(Utc::now())
        .await
        .inspect_err(|e| error!(error = %e, "Weekly run failed"))?;
    outcome.log_summary("weekly");

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

//! Daily brief generator. Safe to run on any schedule: it only produces
//! what is missing and exits cleanly when up to date.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use venezuela_watch::api::{AskFnWrapper, RetryAsk, load_chat_template, load_llm_config};
use venezuela_watch::cli::DailyCli;
use venezuela_watch::config::load_config;
use venezuela_watch::pipeline::daily::DailyPipeline;
use venezuela_watch::search::GNewsClient;
use venezuela_watch::utils::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    init_tracing("info");

    let start_time = std::time::Instant::now();
    info!("venezuela_daily starting up");

    let args = DailyCli::parse();
    debug!(config = ?args.run.config, llm_config = ?args.run.llm_config, "Parsed CLI arguments");

    let config = load_config(args.run.config.as_deref()).inspect_err(|e| {
        error!(error = %e, "Failed to load pipeline configuration");
    })?;
    let source = GNewsClient::new(&config, args.run.gnews_api_key.clone())?;

    let llm_config = load_llm_config(args.run.llm_config.as_deref())?;
    let template = load_chat_template(&config.templates.daily).await?;
    let asker = RetryAsk::with_defaults(AskFnWrapper {
        config: &llm_config,
        template: &template,
    });

    let outcome = DailyPipeline::new(&config, &source, &asker)
        .run(Utc::now())
        .await
        .inspect_err(|e| error!(error = %e, "Daily run failed"))?;
    outcome.log_summary("daily");

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

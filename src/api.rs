//! Model calls behind the daily brief, scenario reasoning and weekly narrative.
//!
//! - [`AskAsync`]: sends a prompt, returns the model's text
//! - [`AskFnWrapper`]: binds an `awful_aj` config and chat template
//! - [`RetryAsk`]: retries any [`AskAsync`] with backoff
//!
//! Defaults: 5 retries, 1 s doubling to a 30 s cap, plus 0-250 ms jitter.

use awful_aj::api::ask;
use awful_aj::{config, config::AwfulJadeConfig, config_dir, template, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Trait for async LLM interaction.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send text to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

impl<T: AskAsync> AskAsync for &T {
    type Response = T::Response;

    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        (**self).ask(text).await
    }
}

/// Retries a model call with capped, jittered exponential backoff. The last
/// error is returned once the retries are spent.
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// # Arguments
    ///
    /// * `inner` - the call to retry
    /// * `max_retries` - retries after the first attempt; `0` disables retrying
    /// * `base_delay` - wait before the first retry, doubled for each later one
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Five retries starting at one second.
    pub fn with_defaults(inner: T) -> Self {
        Self::new(inner, 5, StdDuration::from_secs(1))
    }

    /// Wait before retry number `retry` (1-based), without jitter:
    /// `min(base_delay * 2^(retry - 1), max_delay)`.
    fn backoff(&self, retry: usize) -> StdDuration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1) as u32).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all, fields(prompt_chars = text.len()))]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let started = Instant::now();
        let mut retry = 0usize;

        loop {
            let err = match self.inner.ask(text).await {
                Ok(resp) => {
                    if retry > 0 {
                        info!(
                            retries = retry,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Model call recovered"
                        );
                    }
                    return Ok(resp);
                }
                Err(e) => e,
            };

            retry += 1;
            if retry > self.max_retries {
                error!(
                    retries = self.max_retries,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "Model call failed; giving up"
                );
                return Err(err);
            }

            let jitter = StdDuration::from_millis(rng().random_range(0..=250));
            let delay = self.backoff(retry) + jitter;
            warn!(
                retry,
                max = self.max_retries,
                ?delay,
                error = %err,
                "Model call failed; retrying"
            );
            sleep(delay).await;
        }
    }
}

/// Wrapper around `awful_aj::api::ask` that implements [`AskAsync`].
#[derive(Debug)]
pub struct AskFnWrapper<'a> {
    /// Model endpoint, key and sampling settings.
    pub config: &'a AwfulJadeConfig,
    /// System prompt and framing for one task (daily brief, reasoning, narrative).
    pub template: &'a ChatTemplate,
}

impl<'a> AskAsync for AskFnWrapper<'a> {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(self.config, text.to_string(), self.template, None, None).await;
        let dt = t0.elapsed();

        match &res {
            Ok(_) => info!(elapsed_ms = dt.as_millis() as u64, "API call succeeded"),
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "API call failed"),
        }
        res
    }
}

/// Load the model configuration, defaulting to `config.yaml` in the
/// `awful_aj` config directory.
#[instrument(level = "info", skip_all)]
pub fn load_llm_config(path: Option<&Path>) -> Result<AwfulJadeConfig, Box<dyn Error>> {
    let conf_file = match path {
        Some(p) => p.to_path_buf(),
        None => config_dir()?.join("config.yaml"),
    };
    let config_path = conf_file.to_str().ok_or("Not a valid config filename")?;
    let config = config::load_config(config_path).map_err(|e| e.to_string())?;
    info!(config_path, "Loaded model configuration");
    Ok(config)
}

/// Load a named `awful_aj` chat template.
#[instrument(level = "info")]
pub async fn load_chat_template(name: &str) -> Result<ChatTemplate, Box<dyn Error>> {
    let template = template::load_template(name).await?;
    info!(name, "Loaded template");
    Ok(template)
}

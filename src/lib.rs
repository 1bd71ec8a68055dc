//! # Venezuela Watch
//!
//! A scheduled news pipeline that fetches articles about Venezuela from a
//! search API over rolling local-time windows, curates them by keyword
//! relevance, and has a language model write a daily brief and a weekly
//! scenario-tracking report.
//!
//! ## Binaries
//!
//! ```sh
//! venezuela_daily    # every missing daily brief up to yesterday
//! venezuela_weekly   # every missing weekly report up to the last full week
//! venezuela_watch    # list and print reports, reasoning and context
//! ```
//!
//! ## Architecture
//!
//! For each pending period, oldest first:
//! 1. **Gap scan**: compare stored report filenames with the target period ([`gaps`])
//! 2. **Window**: local midnight to local midnight, as UTC timestamps ([`window`])
//! 3. **Fetch**: one request per language per day ([`search`])
//! 4. **Curate**: anchor/keyword filter, frequency score, stable sort ([`curate`])
//! 5. **Context**: ordered fragments under a character cap ([`context`])
//! 6. **Summarize & persist**: model call, report file, reasoning log ([`pipeline`])
//!
//! An empty curated set ends the run early; remaining periods are picked up
//! by the next invocation.

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod curate;
pub mod error;
pub mod gaps;
pub mod models;
pub mod outputs;
pub mod period;
pub mod pipeline;
pub mod search;
pub mod summarize;
pub mod utils;
pub mod viewer;
pub mod window;

pub use error::{Result, WatchError};

//! Everything the pipeline writes to disk.
//!
//! # Submodules
//!
//! - [`markdown`]: report artifacts, one file per period
//! - [`json`]: raw and curated article dumps, plus the weekly raw cache
//! - [`reasoning_log`]: the append-only JSONL log of scenario assessments
//!
//! # Output Structure
//!
//! ```text
//! outputs/
//! ├── daily/venezuela_2025-11-11.md
//! └── weekly/venezuela_week_2025-11-03_to_2025-11-09.md
//! data/
//! ├── raw/news_2025-11-11.json
//! ├── raw/news_week_2025-11-03_to_2025-11-09.json
//! ├── curated/venezuela_2025-11-11.json
//! ├── context/venezuela_scenarios.json
//! ├── context/venezuela_context.md
//! └── logs/scenarios_log.jsonl
//! ```

pub mod json;
pub mod markdown;
pub mod reasoning_log;

//! # glowwatch
//!
//! A Prometheus exporter for the Glowroot APM.
//!
//! glowwatch polls a Glowroot central server for its agent rollups, their
//! child agents, and each agent's error and slow-transaction summaries, and
//! republishes the counts as gauges on a `/metrics` endpoint.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   HTTP/JSON   ┌───────────┐  set   ┌───────────────┐  scrape
//! │  Glowroot  │◀──────────────│ collector │───────▶│ SnapshotStore │◀──────── Prometheus
//! │  central   │               │  (loop)   │        │  (gauges)     │  /metrics
//! └────────────┘               └───────────┘        └───────────────┘
//! ```
//!
//! - **[`collector`]**: the polling loop. One failed query only skips the
//!   part of the rollup tree below it.
//! - **[`metrics`]**: the exported gauge families
//! - **[`config`]**: YAML settings with environment overrides
//! - **[`clock`]**: time source, swappable in tests
//!
//! The HTTP client lives in `glowwatch-adapters` and the gauge store plus
//! exposition server in `glowwatch-store`.
//!
//! ## Usage
//!
//! ```bash
//! glowwatch --config config.yaml
//! ```
//!
//! ### As a library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use glowwatch::collector;
//! use glowwatch_store::SnapshotStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SnapshotStore::new());
//! collector::run(
//!     "http://glowroot.internal:4000",
//!     Duration::from_secs(300),
//!     Duration::from_secs(30),
//!     store,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod collector;
pub mod config;
pub mod metrics;

pub use clock::{Clock, SystemClock};
pub use collector::{Collector, CycleReport};
pub use config::{ServerSettings, Settings};

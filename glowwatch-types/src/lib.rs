//! # glowwatch-types
//!
//! Core types shared by the glowwatch crates.
//!
//! There are two halves:
//!
//! - **Remote model**: what the Glowroot HTTP API returns. A [`Group`] is a
//!   top-level agent rollup, a [`Member`] is a child agent inside it, and each
//!   member has an [`ErrorSummary`] and a [`TransactionSummary`] for a given
//!   [`TimeWindow`].
//! - **Exported schema**: what glowwatch republishes. Every exported gauge
//!   belongs to a [`MetricFamily`] and is emitted as a [`MetricPoint`].
//!
//! ## Features
//!
//! - `serde`: derive `Deserialize` for the remote model so it can be decoded
//!   straight from API responses.
//!
//! ## Example
//!
//! ```rust
//! use glowwatch_types::{MetricFamily, MetricPoint, TimeWindow};
//! use std::time::Duration;
//!
//! static GROUP_INFO: MetricFamily = MetricFamily::new(
//!     "group_info",
//!     "Information about Glowroot agent rollups",
//!     &["group_id", "group_display_name"],
//! );
//!
//! let window = TimeWindow::ending_at(1_700_000_300_000, Duration::from_secs(300));
//! assert_eq!(window.from_ms, 1_700_000_000_000);
//!
//! let point = MetricPoint::new(&GROUP_INFO, vec!["g1".into(), "G1".into()], 1.0);
//! assert_eq!(point.name(), "group_info");
//! ```

mod metrics;
mod model;
mod window;

pub use metrics::*;
pub use model::*;
pub use window::*;

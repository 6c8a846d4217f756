//! # glowwatch-store
//!
//! Latest-value gauge storage for glowwatch.
//!
//! The [`SnapshotStore`] holds one value per `(metric name, label values)`
//! key. The collector writes into it while scrapes read from it, so every
//! operation is safe to call from any thread or async task.
//!
//! ## Quick Start
//!
//! ```rust
//! use glowwatch_store::{MetricFamily, SnapshotStore};
//!
//! static MEMBER_OF_GROUP: MetricFamily = MetricFamily::new(
//!     "member_of_group",
//!     "Information about Glowroot agent IDs",
//!     &["group_id", "member_id"],
//! );
//!
//! let store = SnapshotStore::new();
//! store.set(&MEMBER_OF_GROUP, &["shop", "shop::web-1"], 1.0);
//!
//! for point in store.collect_all() {
//!     println!("{} {:?} = {}", point.name(), point.label_values(), point.value());
//! }
//! ```
//!
//! ## Features
//!
//! - `prometheus`: text exposition and an HTTP server for `/metrics`

mod store;

#[cfg(feature = "prometheus")]
pub mod prometheus;

pub use store::{FamilySnapshot, SnapshotStore};

// Re-export types for convenience
pub use glowwatch_types::{MetricFamily, MetricPoint};

//! # glowwatch-adapters
//!
//! Adapter for collecting monitoring data from a Glowroot central server.
//!
//! The [`glowroot`] module provides a typed async client for the JSON API the
//! Glowroot UI itself uses, plus the [`GlowrootApi`] trait the collector is
//! written against so tests can substitute their own data.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glowwatch_adapters::{GlowrootApi, GlowrootClient, TimeWindow};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GlowrootClient::builder()
//!         .endpoint("http://localhost:4000")
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let groups = client
//!         .groups(TimeWindow::ending_now(Duration::from_secs(300)))
//!         .await?;
//!
//!     println!("Found {} agent rollups", groups.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod glowroot;

pub use error::ClientError;
pub use glowroot::{GlowrootApi, GlowrootClient, GlowrootClientBuilder};

// Re-export types for convenience
pub use glowwatch_types::{ErrorSummary, Group, Member, TimeWindow, TransactionSummary};

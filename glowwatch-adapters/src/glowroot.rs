//! Glowroot adapter using the central server's HTTP API.
//!
//! Glowroot's UI talks to a JSON API under `/backend`. This adapter queries
//! the four endpoints glowwatch needs:
//!
//! - **Top-level agent rollups** ([`Group`]s)
//! - **Child agents** of a rollup ([`Member`]s)
//! - **Error summaries** per agent, sorted by error count
//! - **Transaction summaries** per agent, sorted by total time
//!
//! Every query is bounded by a [`TimeWindow`] and by the client's request
//! timeout.
//!
//! ## Example
//!
//! ```rust,no_run
//! use glowwatch_adapters::glowroot::{GlowrootApi, GlowrootClient};
//! use glowwatch_adapters::TimeWindow;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GlowrootClient::builder()
//!         .endpoint("http://localhost:4000")
//!         .build()?;
//!
//!     let window = TimeWindow::ending_now(Duration::from_secs(5 * 60));
//!     for group in client.groups(window).await? {
//!         println!("Rollup: {} ({})", group.display_name, group.id);
//!         for member in client.members(&group.id, window).await? {
//!             let errors = client.error_summary(&member.id, window).await?;
//!             println!("  {}: {} errors", member.id, errors.overall.error_count);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use glowwatch_types::{ErrorSummary, Group, Member, TimeWindow, TransactionSummary};

use crate::ClientError;

const TOP_LEVEL_ROLLUPS_PATH: &str = "/backend/top-level-agent-rollups";
const CHILD_AGENTS_PATH: &str = "/backend/child-agent-rollups";
const ERROR_SUMMARIES_PATH: &str = "/backend/error/summaries";
const TRANSACTION_SUMMARIES_PATH: &str = "/backend/transaction/summaries";

/// Only web transactions are summarised.
const TRANSACTION_TYPE: &str = "Web";
const ERROR_SUMMARY_LIMIT: &str = "1000";
const TRANSACTION_SUMMARY_LIMIT: &str = "10";

/// The queries glowwatch issues against a Glowroot server.
///
/// [`GlowrootClient`] is the HTTP implementation; the collector only depends
/// on this trait.
#[async_trait]
pub trait GlowrootApi: Send + Sync {
    /// List the top-level agent rollups active in `window`.
    async fn groups(&self, window: TimeWindow) -> Result<Vec<Group>, ClientError>;

    /// List the child agents of the rollup `group_id`.
    async fn members(&self, group_id: &str, window: TimeWindow)
        -> Result<Vec<Member>, ClientError>;

    /// Error counts for the agent `member_id`, sorted by error count.
    async fn error_summary(
        &self,
        member_id: &str,
        window: TimeWindow,
    ) -> Result<ErrorSummary, ClientError>;

    /// Slowest transactions for the agent `member_id`, sorted by total time.
    async fn transaction_summary(
        &self,
        member_id: &str,
        window: TimeWindow,
    ) -> Result<TransactionSummary, ClientError>;
}

/// HTTP client for a Glowroot central server.
#[derive(Debug, Clone)]
pub struct GlowrootClient {
    client: Client,
    endpoint: String,
}

impl GlowrootClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> GlowrootClientBuilder {
        GlowrootClientBuilder::default()
    }

    /// The base URL every API path is appended to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!("{}{}", self.endpoint, path))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Auth(
                "Glowroot requires a login for this endpoint".to_string(),
            ));
        }

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[async_trait]
impl GlowrootApi for GlowrootClient {
    async fn groups(&self, window: TimeWindow) -> Result<Vec<Group>, ClientError> {
        let from = window.from_ms.to_string();
        let to = window.to_ms.to_string();
        let url = self.url(
            TOP_LEVEL_ROLLUPS_PATH,
            &[("from", from.as_str()), ("to", to.as_str())],
        )?;
        self.get_json(url).await
    }

    async fn members(
        &self,
        group_id: &str,
        window: TimeWindow,
    ) -> Result<Vec<Member>, ClientError> {
        let from = window.from_ms.to_string();
        let to = window.to_ms.to_string();
        let url = self.url(
            CHILD_AGENTS_PATH,
            &[
                ("top-level-id", group_id),
                ("from", from.as_str()),
                ("to", to.as_str()),
            ],
        )?;
        self.get_json(url).await
    }

    async fn error_summary(
        &self,
        member_id: &str,
        window: TimeWindow,
    ) -> Result<ErrorSummary, ClientError> {
        let from = window.from_ms.to_string();
        let to = window.to_ms.to_string();
        let url = self.url(
            ERROR_SUMMARIES_PATH,
            &[
                ("agent-rollup-id", member_id),
                ("transaction-type", TRANSACTION_TYPE),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("sort-order", "error-count"),
                ("limit", ERROR_SUMMARY_LIMIT),
            ],
        )?;
        self.get_json(url).await
    }

    async fn transaction_summary(
        &self,
        member_id: &str,
        window: TimeWindow,
    ) -> Result<TransactionSummary, ClientError> {
        let from = window.from_ms.to_string();
        let to = window.to_ms.to_string();
        let url = self.url(
            TRANSACTION_SUMMARIES_PATH,
            &[
                ("agent-rollup-id", member_id),
                ("transaction-type", TRANSACTION_TYPE),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("sort-order", "total-time"),
                ("limit", TRANSACTION_SUMMARY_LIMIT),
            ],
        )?;
        self.get_json(url).await
    }
}

#[async_trait]
impl<T: GlowrootApi + ?Sized> GlowrootApi for Arc<T> {
    async fn groups(&self, window: TimeWindow) -> Result<Vec<Group>, ClientError> {
        (**self).groups(window).await
    }

    async fn members(
        &self,
        group_id: &str,
        window: TimeWindow,
    ) -> Result<Vec<Member>, ClientError> {
        (**self).members(group_id, window).await
    }

    async fn error_summary(
        &self,
        member_id: &str,
        window: TimeWindow,
    ) -> Result<ErrorSummary, ClientError> {
        (**self).error_summary(member_id, window).await
    }

    async fn transaction_summary(
        &self,
        member_id: &str,
        window: TimeWindow,
    ) -> Result<TransactionSummary, ClientError> {
        (**self).transaction_summary(member_id, window).await
    }
}

/// Builder for GlowrootClient.
#[derive(Debug, Default)]
pub struct GlowrootClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl GlowrootClientBuilder {
    /// Set the server base URL (e.g., "http://localhost:4000").
    ///
    /// A path prefix is kept, so a server mounted under `/glowroot` works.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client, validating the endpoint.
    pub fn build(self) -> Result<GlowrootClient, ClientError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:4000".to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = Url::parse(&endpoint).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(GlowrootClient { client, endpoint })
    }
}

//! Prometheus exposition format support.
//!
//! This module renders a [`SnapshotStore`] in the Prometheus text-based
//! exposition format (version 0.0.4) and serves it over HTTP, so it can be
//! scraped by Prometheus or compatible monitoring systems.
//!
//! Every family is exported as a gauge; the store only holds latest values.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glowwatch_store::SnapshotStore;
//! use glowwatch_store::prometheus::{PrometheusConfig, PrometheusExporter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = PrometheusConfig::builder()
//!         .listen_addr("0.0.0.0:9101")
//!         .namespace("glowroot")
//!         .build();
//!
//!     let store = Arc::new(SnapshotStore::new());
//!     let exporter = PrometheusExporter::new(config, store.clone());
//!
//!     // Metrics available at http://localhost:9101/metrics
//!     exporter.start_server().await.unwrap().unwrap();
//! }
//! ```

use std::convert::Infallible;
use std::fmt::Write as _;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::SnapshotStore;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Errors that stop the metrics server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The configured listen address does not parse.
    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Binding or accepting failed.
    #[error("metrics server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for Prometheus metrics endpoint.
#[derive(Debug, Clone)]
pub struct PrometheusConfig {
    /// Address to listen on (e.g., "0.0.0.0:9101")
    pub listen_addr: String,
    /// Path for metrics endpoint (e.g., "/metrics")
    pub metrics_path: String,
    /// Optional namespace prefix for all metrics
    pub namespace: Option<String>,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9101".to_string(),
            metrics_path: "/metrics".to_string(),
            namespace: None,
        }
    }
}

impl PrometheusConfig {
    /// Create a new builder for PrometheusConfig.
    pub fn builder() -> PrometheusConfigBuilder {
        PrometheusConfigBuilder::default()
    }
}

/// Builder for PrometheusConfig.
#[derive(Debug, Default)]
pub struct PrometheusConfigBuilder {
    listen_addr: Option<String>,
    metrics_path: Option<String>,
    namespace: Option<String>,
}

impl PrometheusConfigBuilder {
    /// Set the listen address.
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = Some(addr.into());
        self
    }

    /// Set the metrics path.
    pub fn metrics_path(mut self, path: impl Into<String>) -> Self {
        self.metrics_path = Some(path.into());
        self
    }

    /// Set the namespace prefix for all metrics.
    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }

    /// Build the PrometheusConfig.
    pub fn build(self) -> PrometheusConfig {
        let defaults = PrometheusConfig::default();
        PrometheusConfig {
            listen_addr: self.listen_addr.unwrap_or(defaults.listen_addr),
            metrics_path: self.metrics_path.unwrap_or(defaults.metrics_path),
            namespace: self.namespace,
        }
    }
}

/// Prometheus exporter that serves a [`SnapshotStore`] over HTTP.
///
/// The exporter never writes to the store; every scrape renders whatever the
/// store holds at that moment.
#[derive(Debug, Clone)]
pub struct PrometheusExporter {
    config: PrometheusConfig,
    store: Arc<SnapshotStore>,
}

impl PrometheusExporter {
    /// Create a new Prometheus exporter reading from `store`.
    pub fn new(config: PrometheusConfig, store: Arc<SnapshotStore>) -> Self {
        Self { config, store }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PrometheusConfig {
        &self.config
    }

    /// Get the current metrics in Prometheus exposition format.
    pub fn render(&self) -> String {
        format_prometheus(&self.store, self.config.namespace.as_deref())
    }

    /// Start the HTTP server to serve Prometheus metrics.
    ///
    /// This spawns a background task that listens for HTTP requests and serves
    /// metrics at the configured path. The task only finishes if binding or
    /// accepting fails.
    pub fn start_server(&self) -> tokio::task::JoinHandle<Result<(), ServeError>> {
        let exporter = self.clone();
        tokio::spawn(async move { exporter.serve().await })
    }

    /// Bind the configured listen address.
    pub async fn bind(&self) -> Result<TcpListener, ServeError> {
        let addr: SocketAddr =
            self.config
                .listen_addr
                .parse()
                .map_err(|source| ServeError::InvalidAddress {
                    addr: self.config.listen_addr.clone(),
                    source,
                })?;
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, path = %self.config.metrics_path, "serving Prometheus metrics");
        Ok(listener)
    }

    /// Bind the configured address and serve until an I/O error occurs.
    pub async fn serve(&self) -> Result<(), ServeError> {
        let listener = self.bind().await?;
        self.serve_listener(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_listener(&self, listener: TcpListener) -> Result<(), ServeError> {
        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let exporter = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    let exporter = exporter.clone();
                    async move { exporter.handle_request(req) }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!(%peer, error = %e, "metrics connection error");
                }
            });
        }
    }

    fn handle_request(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let path = req.uri().path();

        let response = if path == self.config.metrics_path {
            text_response(StatusCode::OK, TEXT_FORMAT, self.render())
        } else if path == "/health" || path == "/healthz" {
            text_response(StatusCode::OK, "text/plain", "OK".to_string())
        } else {
            text_response(StatusCode::NOT_FOUND, "text/plain", "Not Found".to_string())
        };

        Ok(response)
    }
}

fn text_response(
    status: StatusCode,
    content_type: &'static str,
    body: String,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Format the store contents as Prometheus exposition format.
///
/// Families come out in name order with `# HELP` and `# TYPE` headers, even
/// when they have no points yet.
pub fn format_prometheus(store: &SnapshotStore, namespace: Option<&str>) -> String {
    let mut output = String::new();
    let prefix = namespace.map(|n| format!("{}_", n)).unwrap_or_default();

    for snapshot in store.collect_families() {
        let name = format!("{}{}", prefix, snapshot.family.name());
        let _ = writeln!(
            output,
            "# HELP {} {}",
            name,
            escape_help(snapshot.family.help())
        );
        let _ = writeln!(output, "# TYPE {} gauge", name);

        for point in &snapshot.points {
            let labels = point
                .labels()
                .map(|(label, value)| format!("{}=\"{}\"", label, escape_label_value(value)))
                .collect::<Vec<_>>()
                .join(",");

            if labels.is_empty() {
                let _ = writeln!(output, "{} {}", name, format_value(point.value()));
            } else {
                let _ = writeln!(
                    output,
                    "{}{{{}}} {}",
                    name,
                    labels,
                    format_value(point.value())
                );
            }
        }
    }

    output
}

/// Escape a label value for Prometheus format.
/// Backslash, double-quote, and newline must be escaped.
fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// HELP text escapes backslash and newline only.
fn escape_help(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

//! The polling loop that turns Glowroot query results into gauges.
//!
//! Each cycle walks the rollup tree top-down: groups, then the members of
//! each group, then the error and transaction summaries of each member.
//! A failed query only prunes the subtree below it. Gauges that could not
//! be refreshed keep their previous value, and nothing is ever removed.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use glowwatch_adapters::{ClientError, GlowrootApi, GlowrootClient};
use glowwatch_store::{MetricFamily, SnapshotStore};
use glowwatch_types::{Group, Member, TimeWindow};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::metrics::{self, ERROR_TOTAL_COUNT, GROUP_INFO, MEMBER_OF_GROUP};
use crate::metrics::{SLOW_TRACE_TOTAL_COUNT, SLOW_TRACE_TRANSACTION_COUNT};
use crate::metrics::{TRANSACTION_ERROR_COUNT, TRANSACTION_TOTAL_COUNT};

/// Which query a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Groups,
    Members,
    ErrorSummary,
    TransactionSummary,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Groups => "groups",
            Stage::Members => "members",
            Stage::ErrorSummary => "error_summary",
            Stage::TransactionSummary => "transaction_summary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single cycle managed to do.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// The query window every call in the cycle used.
    pub window: TimeWindow,
    pub groups: usize,
    pub members: usize,
    pub failed_fetches: usize,
    /// Number of gauge writes, including overwrites with an equal value.
    pub points_written: usize,
    /// The group listing failed, so nothing was written.
    pub aborted: bool,
}

impl CycleReport {
    fn new(window: TimeWindow) -> Self {
        Self {
            window,
            groups: 0,
            members: 0,
            failed_fetches: 0,
            points_written: 0,
            aborted: false,
        }
    }
}

/// Periodically queries Glowroot and writes the results into a
/// [`SnapshotStore`].
pub struct Collector<A, C = SystemClock> {
    api: A,
    store: Arc<SnapshotStore>,
    clock: C,
    time_interval: Duration,
    poll_interval: Duration,
}

impl<A: GlowrootApi> Collector<A, SystemClock> {
    /// Create a collector that looks back `time_interval` on every query and
    /// waits `poll_interval` between cycles.
    ///
    /// Registers every exported family with the store.
    pub fn new(
        api: A,
        store: Arc<SnapshotStore>,
        time_interval: Duration,
        poll_interval: Duration,
    ) -> Self {
        metrics::register_all(&store);
        Self {
            api,
            store,
            clock: SystemClock,
            time_interval,
            poll_interval,
        }
    }
}

impl<A: GlowrootApi, C: Clock> Collector<A, C> {
    /// Replace the clock used for query windows and inter-cycle sleeps.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Collector<A, C2> {
        Collector {
            api: self.api,
            store: self.store,
            clock,
            time_interval: self.time_interval,
            poll_interval: self.poll_interval,
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Run cycles forever, sleeping `poll_interval` after each one.
    pub async fn run(&self) -> Infallible {
        info!(
            time_interval = ?self.time_interval,
            poll_interval = ?self.poll_interval,
            "Starting Glowroot collector"
        );

        loop {
            let report = self.run_cycle().await;
            debug!(
                groups = report.groups,
                members = report.members,
                failed_fetches = report.failed_fetches,
                points_written = report.points_written,
                aborted = report.aborted,
                "Collection cycle finished"
            );
            self.clock.sleep(self.poll_interval).await;
        }
    }

    /// Run a single collection cycle.
    ///
    /// Every query in the cycle uses the same window, ending at the moment
    /// the cycle started.
    pub async fn run_cycle(&self) -> CycleReport {
        let window = TimeWindow::ending_at(self.clock.epoch_millis(), self.time_interval);
        let mut report = CycleReport::new(window);

        let groups = match self.api.groups(window).await {
            Ok(groups) => groups,
            Err(e) => {
                warn!(stage = %Stage::Groups, error = %e, "Failed to list agent rollups");
                report.failed_fetches += 1;
                report.aborted = true;
                return report;
            }
        };

        for group in &groups {
            self.collect_group(group, window, &mut report).await;
        }

        report
    }

    async fn collect_group(&self, group: &Group, window: TimeWindow, report: &mut CycleReport) {
        report.groups += 1;
        let group_id = group.id.as_str();
        self.write(
            report,
            &GROUP_INFO,
            &[group_id, group.display_name.as_str()],
            1.0,
        );

        let members = match self.api.members(group_id, window).await {
            Ok(members) => members,
            Err(e) => {
                warn!(stage = %Stage::Members, group_id, error = %e, "Failed to list agents");
                report.failed_fetches += 1;
                return;
            }
        };

        for member in &members {
            self.collect_member(group_id, member, window, report).await;
        }
    }

    async fn collect_member(
        &self,
        group_id: &str,
        member: &Member,
        window: TimeWindow,
        report: &mut CycleReport,
    ) {
        report.members += 1;
        let member_id = member.id.as_str();
        self.write(report, &MEMBER_OF_GROUP, &[group_id, member_id], 1.0);

        // Without error counts the slow-trace query is skipped too.
        let errors = match self.api.error_summary(member_id, window).await {
            Ok(errors) => errors,
            Err(e) => {
                warn!(
                    stage = %Stage::ErrorSummary,
                    group_id,
                    member_id,
                    error = %e,
                    "Failed to fetch error summary"
                );
                report.failed_fetches += 1;
                return;
            }
        };

        self.write(
            report,
            &ERROR_TOTAL_COUNT,
            &[group_id, member_id],
            errors.overall.error_count as f64,
        );
        self.write(
            report,
            &TRANSACTION_TOTAL_COUNT,
            &[group_id, member_id],
            errors.overall.transaction_count as f64,
        );
        for transaction in &errors.transactions {
            self.write(
                report,
                &TRANSACTION_ERROR_COUNT,
                &[group_id, member_id, transaction.transaction_name.as_str()],
                transaction.error_count as f64,
            );
        }

        let traces = match self.api.transaction_summary(member_id, window).await {
            Ok(traces) => traces,
            Err(e) => {
                warn!(
                    stage = %Stage::TransactionSummary,
                    group_id,
                    member_id,
                    error = %e,
                    "Failed to fetch transaction summary"
                );
                report.failed_fetches += 1;
                return;
            }
        };

        self.write(
            report,
            &SLOW_TRACE_TOTAL_COUNT,
            &[group_id, member_id],
            traces.overall.transaction_count as f64,
        );
        for transaction in &traces.transactions {
            self.write(
                report,
                &SLOW_TRACE_TRANSACTION_COUNT,
                &[group_id, member_id, transaction.transaction_name.as_str()],
                transaction.transaction_count as f64,
            );
        }
    }

    fn write(
        &self,
        report: &mut CycleReport,
        family: &'static MetricFamily,
        label_values: &[&str],
        value: f64,
    ) {
        self.store.set(family, label_values, value);
        report.points_written += 1;
    }
}

/// Poll the Glowroot server at `base_url` forever.
///
/// Returns only if the client cannot be built from `base_url`.
pub async fn run(
    base_url: &str,
    time_interval: Duration,
    poll_interval: Duration,
    store: Arc<SnapshotStore>,
) -> Result<Infallible, ClientError> {
    let client = GlowrootClient::builder().endpoint(base_url).build()?;
    let collector = Collector::new(client, store, time_interval, poll_interval);
    Ok(collector.run().await)
}

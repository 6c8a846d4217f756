//! The gauge families glowwatch exports.
//!
//! All families are latest-value gauges. Names are exported under the
//! [`NAMESPACE`] prefix, e.g. `glowroot_group_info`.

use glowwatch_store::{MetricFamily, SnapshotStore};

/// Prefix applied to every family at exposition time.
pub const NAMESPACE: &str = "glowroot";

/// One series per agent rollup; the value is always 1.
pub static GROUP_INFO: MetricFamily = MetricFamily::new(
    "group_info",
    "Information about Glowroot agent rollups",
    &["group_id", "group_display_name"],
);

/// One series per (rollup, child agent) pair; the value is always 1.
pub static MEMBER_OF_GROUP: MetricFamily = MetricFamily::new(
    "member_of_group",
    "Information about Glowroot agent IDs",
    &["group_id", "member_id"],
);

pub static ERROR_TOTAL_COUNT: MetricFamily = MetricFamily::new(
    "error_total_count",
    "Total error count from overall statistics",
    &["group_id", "member_id"],
);

pub static TRANSACTION_TOTAL_COUNT: MetricFamily = MetricFamily::new(
    "transaction_total_count",
    "Total transaction count from overall statistics",
    &["group_id", "member_id"],
);

pub static TRANSACTION_ERROR_COUNT: MetricFamily = MetricFamily::new(
    "transaction_error_count",
    "Error count per individual transaction",
    &["group_id", "member_id", "transaction_name"],
);

pub static SLOW_TRACE_TOTAL_COUNT: MetricFamily = MetricFamily::new(
    "slow_trace_total_count",
    "Total transaction count from slow trace overall statistics",
    &["group_id", "member_id"],
);

pub static SLOW_TRACE_TRANSACTION_COUNT: MetricFamily = MetricFamily::new(
    "slow_trace_transaction_count",
    "Transaction count per slow trace",
    &["group_id", "member_id", "transaction_name"],
);

/// Every exported family.
pub static ALL: [&MetricFamily; 7] = [
    &GROUP_INFO,
    &MEMBER_OF_GROUP,
    &ERROR_TOTAL_COUNT,
    &TRANSACTION_TOTAL_COUNT,
    &TRANSACTION_ERROR_COUNT,
    &SLOW_TRACE_TOTAL_COUNT,
    &SLOW_TRACE_TRANSACTION_COUNT,
];

/// Register every family so scrapes list them before the first cycle ends.
pub fn register_all(store: &SnapshotStore) {
    for family in ALL {
        store.register(family);
    }
}

//! The Glowroot API model - groups, members and their per-window summaries.
//!
//! Decoding is lenient in the same places the Glowroot UI is: missing counters
//! read as zero and a missing or `null` list reads as empty. Anything else that
//! does not match (wrong types, a missing `id`) is rejected by the decoder.

/// A top-level agent rollup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Group {
    /// Stable identifier, used as the `group_id` label.
    pub id: String,

    /// Human-readable name.
    #[cfg_attr(feature = "serde", serde(rename = "display", default))]
    pub display_name: String,
}

impl Group {
    /// Create a group.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// A child agent belonging to exactly one [`Group`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Member {
    /// Stable identifier, used as the `member_id` label.
    pub id: String,

    /// Human-readable name.
    #[cfg_attr(feature = "serde", serde(rename = "display", default))]
    pub display_name: String,
}

impl Member {
    /// Create a member.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Error counts for one member over a time window.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ErrorSummary {
    /// Totals across every transaction.
    pub overall: ErrorOverall,

    /// Per-transaction breakdown, in the order the API returned it.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "null_as_empty"))]
    pub transactions: Vec<TransactionErrors>,
}

/// Totals section of an [`ErrorSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ErrorOverall {
    pub error_count: u64,
    pub transaction_count: u64,
}

/// One entry of an [`ErrorSummary`] breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TransactionErrors {
    pub transaction_name: String,
    pub error_count: u64,
    pub transaction_count: u64,
}

/// Timing aggregates for one member over a time window.
///
/// The API truncates `transactions` to the slowest few entries by total time.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransactionSummary {
    /// Totals across every transaction.
    pub overall: TransactionOverall,

    /// Slowest transactions, in the order the API returned them.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "null_as_empty"))]
    pub transactions: Vec<TransactionTiming>,
}

/// Totals section of a [`TransactionSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TransactionOverall {
    pub total_duration_nanos: f64,
    pub transaction_count: u64,
}

/// One entry of a [`TransactionSummary`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TransactionTiming {
    pub transaction_name: String,
    pub total_duration_nanos: f64,
    pub transaction_count: u64,
}

#[cfg(feature = "serde")]
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;

    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn decodes_groups_ignoring_children() {
        let json = r#"[
            {"id": "g1", "display": "Shop", "children": [{"id": "x", "display": "X", "children": []}]},
            {"id": "g2", "display": "Billing", "children": []}
        ]"#;

        let groups: Vec<Group> = serde_json::from_str(json).unwrap();
        assert_eq!(
            groups,
            vec![Group::new("g1", "Shop"), Group::new("g2", "Billing")]
        );
    }

    #[test]
    fn member_without_display_gets_empty_name() {
        let member: Member = serde_json::from_str(r#"{"id": "m1"}"#).unwrap();
        assert_eq!(member, Member::new("m1", ""));
    }

    #[test]
    fn member_without_id_is_rejected() {
        assert!(serde_json::from_str::<Member>(r#"{"display": "M1"}"#).is_err());
    }

    #[test]
    fn decodes_error_summary_preserving_order() {
        let json = r#"{
            "overall": {"errorCount": 3, "transactionCount": 10},
            "transactions": [
                {"transactionName": "GET /z", "errorCount": 1, "transactionCount": 2},
                {"transactionName": "GET /a", "errorCount": 2, "transactionCount": 5}
            ]
        }"#;

        let summary: ErrorSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.overall.error_count, 3);
        assert_eq!(summary.overall.transaction_count, 10);
        let names: Vec<_> = summary
            .transactions
            .iter()
            .map(|t| t.transaction_name.as_str())
            .collect();
        assert_eq!(names, ["GET /z", "GET /a"]);
    }

    #[test]
    fn null_transactions_decode_as_empty() {
        let json = r#"{"overall": {"errorCount": 0, "transactionCount": 4}, "transactions": null}"#;
        let summary: ErrorSummary = serde_json::from_str(json).unwrap();
        assert!(summary.transactions.is_empty());
        assert_eq!(summary.overall.transaction_count, 4);
    }

    #[test]
    fn missing_sections_default_to_zero() {
        let summary: TransactionSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary, TransactionSummary::default());
    }

    #[test]
    fn decodes_fractional_durations() {
        let json = r#"{
            "overall": {"totalDurationNanos": 1000.5, "transactionCount": 10},
            "transactions": [{"transactionName": "GET /x", "totalDurationNanos": 700, "transactionCount": 5}]
        }"#;

        let summary: TransactionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.overall.total_duration_nanos, 1000.5);
        assert_eq!(summary.transactions[0].total_duration_nanos, 700.0);
        assert_eq!(summary.transactions[0].transaction_count, 5);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        assert!(serde_json::from_str::<ErrorSummary>(r#"{"overall": "nope"}"#).is_err());
        assert!(serde_json::from_str::<Vec<Group>>(r#"{"id": "g1"}"#).is_err());
    }
}

//! The exported metric schema.

use std::fmt;

/// Static description of one exported gauge family.
///
/// A family fixes the metric name, its help text and the ordered label names.
/// Every [`MetricPoint`] of the family carries one value per label name, in
/// the same order.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MetricFamily {
    name: &'static str,
    help: &'static str,
    labels: &'static [&'static str],
}

impl MetricFamily {
    /// Describe a family.
    pub const fn new(
        name: &'static str,
        help: &'static str,
        labels: &'static [&'static str],
    ) -> Self {
        Self { name, help, labels }
    }

    /// Metric name, without any exposition namespace.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// One-line description used for `# HELP`.
    pub const fn help(&self) -> &'static str {
        self.help
    }

    /// Ordered label names.
    pub const fn labels(&self) -> &'static [&'static str] {
        self.labels
    }
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One exported gauge value: a family, the label values and the value.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    family: &'static MetricFamily,
    label_values: Vec<String>,
    value: f64,
}

impl MetricPoint {
    /// Create a point.
    pub fn new(family: &'static MetricFamily, label_values: Vec<String>, value: f64) -> Self {
        debug_assert_eq!(
            family.labels().len(),
            label_values.len(),
            "label arity mismatch for {}",
            family.name()
        );
        Self {
            family,
            label_values,
            value,
        }
    }

    /// The family this point belongs to.
    pub fn family(&self) -> &'static MetricFamily {
        self.family
    }

    /// Metric name, shorthand for `self.family().name()`.
    pub fn name(&self) -> &'static str {
        self.family.name()
    }

    /// Label values, ordered like `self.family().labels()`.
    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }

    /// `(label name, label value)` pairs in family order.
    pub fn labels(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.family
            .labels()
            .iter()
            .copied()
            .zip(self.label_values.iter().map(String::as_str))
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static MEMBER_OF_GROUP: MetricFamily = MetricFamily::new(
        "member_of_group",
        "Information about Glowroot agent IDs",
        &["group_id", "member_id"],
    );

    #[test]
    fn labels_pair_names_with_values() {
        let point = MetricPoint::new(&MEMBER_OF_GROUP, vec!["g1".into(), "m1".into()], 1.0);

        let labels: Vec<_> = point.labels().collect();
        assert_eq!(labels, [("group_id", "g1"), ("member_id", "m1")]);
        assert_eq!(point.name(), "member_of_group");
        assert_eq!(point.value(), 1.0);
    }

    #[test]
    fn family_displays_as_its_name() {
        assert_eq!(MEMBER_OF_GROUP.to_string(), "member_of_group");
    }
}

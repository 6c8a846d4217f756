//! The latest-value gauge table.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glowwatch_types::{MetricFamily, MetricPoint};
use parking_lot::RwLock;

/// A gauge value stored as the bit pattern of an `f64`, so a reader always
/// sees a whole value.
#[derive(Debug)]
struct GaugeCell(AtomicU64);

impl GaugeCell {
    fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// Thread-safe points of one metric family, keyed by label values.
#[derive(Debug)]
struct FamilyState {
    family: &'static MetricFamily,
    points: RwLock<BTreeMap<Vec<String>, Arc<GaugeCell>>>,
}

impl FamilyState {
    fn new(family: &'static MetricFamily) -> Self {
        Self {
            family,
            points: RwLock::new(BTreeMap::new()),
        }
    }

    fn set(&self, label_values: Vec<String>, value: f64) {
        // Fast path: the point already exists
        {
            let points = self.points.read();
            if let Some(cell) = points.get(&label_values) {
                cell.set(value);
                return;
            }
        }

        // Slow path: insert, unless another writer got there first
        let mut points = self.points.write();
        points
            .entry(label_values)
            .and_modify(|cell| cell.set(value))
            .or_insert_with(|| Arc::new(GaugeCell::new(value)));
    }

    fn snapshot(&self) -> FamilySnapshot {
        let points = self
            .points
            .read()
            .iter()
            .map(|(labels, cell)| MetricPoint::new(self.family, labels.clone(), cell.get()))
            .collect();

        FamilySnapshot {
            family: self.family,
            points,
        }
    }
}

/// Every point of one family at the moment it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySnapshot {
    pub family: &'static MetricFamily,
    /// Points ordered by label values.
    pub points: Vec<MetricPoint>,
}

/// Concurrency-safe table of named, labeled gauges.
///
/// Each `(metric name, label values)` key holds exactly one value; writing the
/// same key again replaces it. Nothing is ever removed, so a key that stops
/// being written keeps its last value until the process exits.
///
/// Writers and readers may run concurrently. A reader never observes a
/// half-written value, and reads lock one family at a time so an export never
/// holds up writers for longer than it takes to copy that family.
///
/// # Example
///
/// ```rust
/// use glowwatch_store::{MetricFamily, SnapshotStore};
///
/// static ERRORS: MetricFamily =
///     MetricFamily::new("error_total_count", "Total error count", &["group_id", "member_id"]);
///
/// let store = SnapshotStore::new();
/// store.set(&ERRORS, &["g1", "m1"], 3.0);
/// store.set(&ERRORS, &["g1", "m1"], 4.0);
///
/// assert_eq!(store.get("error_total_count", &["g1", "m1"]), Some(4.0));
/// assert_eq!(store.collect_all().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SnapshotStore {
    families: RwLock<BTreeMap<&'static str, Arc<FamilyState>>>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a family so it is exported even before its first point.
    ///
    /// Registering the same family again is a no-op.
    pub fn register(&self, family: &'static MetricFamily) {
        self.family_state(family);
    }

    /// Upsert the point `(family, label_values)`.
    ///
    /// `label_values` must line up with `family.labels()`.
    pub fn set(&self, family: &'static MetricFamily, label_values: &[&str], value: f64) {
        debug_assert_eq!(
            family.labels().len(),
            label_values.len(),
            "label arity mismatch for {}",
            family.name()
        );

        let key = label_values.iter().map(|v| v.to_string()).collect();
        self.family_state(family).set(key, value);
    }

    /// Current value of a point, if it has ever been written.
    pub fn get(&self, name: &str, label_values: &[&str]) -> Option<f64> {
        let state = self.families.read().get(name).cloned()?;
        let key: Vec<String> = label_values.iter().map(|v| v.to_string()).collect();
        let points = state.points.read();
        points.get(&key).map(|cell| cell.get())
    }

    /// Total number of points across all families.
    pub fn len(&self) -> usize {
        self.family_states()
            .iter()
            .map(|state| state.points.read().len())
            .sum()
    }

    /// Whether no point has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered families in name order.
    pub fn families(&self) -> Vec<&'static MetricFamily> {
        self.families
            .read()
            .values()
            .map(|state| state.family)
            .collect()
    }

    /// Snapshot family by family, in name order.
    ///
    /// Each family is copied under its own short read lock when the iterator
    /// reaches it. Families registered after this call are not included.
    pub fn collect_families(&self) -> impl Iterator<Item = FamilySnapshot> {
        self.family_states()
            .into_iter()
            .map(|state| state.snapshot())
    }

    /// Every current point, grouped by family in name order.
    ///
    /// The iterator is lazy and finite; call again for a fresh view.
    pub fn collect_all(&self) -> impl Iterator<Item = MetricPoint> {
        self.collect_families()
            .flat_map(|snapshot| snapshot.points.into_iter())
    }

    fn family_states(&self) -> Vec<Arc<FamilyState>> {
        self.families.read().values().cloned().collect()
    }

    fn family_state(&self, family: &'static MetricFamily) -> Arc<FamilyState> {
        // Fast path
        {
            let families = self.families.read();
            if let Some(state) = families.get(family.name()) {
                debug_assert_eq!(state.family, family, "conflicting descriptors");
                return state.clone();
            }
        }

        // Slow path
        let mut families = self.families.write();
        families
            .entry(family.name())
            .or_insert_with(|| Arc::new(FamilyState::new(family)))
            .clone()
    }
}

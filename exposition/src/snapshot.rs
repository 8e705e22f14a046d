use std::sync::{Arc, Weak};

use crate::metric::Metric;

/// A point-in-time listing of metrics, filled by a [`Collector`](crate::Collector).
///
/// A snapshot never keeps a metric alive: it holds non-owning references, so a metric that is
/// unregistered and dropped after the snapshot was taken simply stops showing up when the
/// snapshot is walked.
#[derive(Default)]
pub struct Snapshot {
    entries: Vec<(String, Weak<dyn Metric>)>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a non-owning reference to `metric` under `name`.
    pub fn push(&mut self, name: String, metric: Weak<dyn Metric>) {
        self.entries.push((name, metric));
    }

    /// Number of entries, including any whose metric has since been dropped.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether or not this snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Names of every entry, in collection order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates the metrics that are still alive, in collection order.
    ///
    /// Entries whose metric has been dropped are skipped.
    pub fn iter(&self) -> impl Iterator<Item = Arc<dyn Metric>> + '_ {
        self.entries.iter().filter_map(|(_, metric)| metric.upgrade())
    }
}

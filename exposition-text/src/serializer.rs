use exposition::{Collector, Sample, SampleWriter, Snapshot};
use tracing::trace;

use crate::formatting::{write_help_line, write_metric_line, write_type_line};

/// Turns a [`Snapshot`] into its wire representation.
pub trait Serializer {
    /// Serializes every live metric in `snapshot`.
    fn serialize(&self, snapshot: &Snapshot) -> String;
}

/// Serializes snapshots in the Prometheus text exposition format.
///
/// For every metric, a `# HELP` line, a `# TYPE` line, and one line per sample are written.
/// Metrics are written in snapshot order, unless [`sorted`](TextSerializer::sorted) is enabled,
/// and metrics that have been dropped since the snapshot was taken are skipped.
#[derive(Clone, Debug, Default)]
pub struct TextSerializer {
    sorted: bool,
}

impl TextSerializer {
    /// Creates a new [`TextSerializer`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether metrics are written sorted by name rather than in snapshot order.
    ///
    /// Defaults to `false`.
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Collects a fresh snapshot from `collector` and serializes it.
    pub fn render(&self, collector: &dyn Collector) -> String {
        let mut snapshot = Snapshot::new();
        collector.collect(&mut snapshot);
        self.serialize(&snapshot)
    }
}

impl Serializer for TextSerializer {
    fn serialize(&self, snapshot: &Snapshot) -> String {
        let mut metrics = snapshot.iter().collect::<Vec<_>>();
        if self.sorted {
            metrics.sort_by(|a, b| a.name().cmp(b.name()));
        }
        trace!(live = metrics.len(), collected = snapshot.len(), "serializing snapshot");

        let mut output = String::new();
        for metric in metrics {
            write_help_line(&mut output, metric.name(), metric.description());
            write_type_line(&mut output, metric.name(), metric.kind());
            metric.write_samples(&mut LineWriter { buffer: &mut output });
        }

        output
    }
}

struct LineWriter<'a> {
    buffer: &'a mut String,
}

impl SampleWriter for LineWriter<'_> {
    fn write_sample(&mut self, sample: Sample<'_>) {
        write_metric_line(self.buffer, sample.name, sample.labels, sample.extra, sample.value);
    }
}

#[cfg(test)]
mod tests {
    use super::{Serializer, TextSerializer};
    use exposition::{
        Buckets, Collector, CounterMetric, GaugeFamily, GaugeMetric, HistogramMetric, Registry,
        Snapshot,
    };
    use std::sync::Arc;

    #[test]
    fn test_gauge_round_trip() {
        let registry = Registry::new();
        let gauge = GaugeMetric::with_options("my_gauge", "Test gauge", 42.0).unwrap();
        assert!(registry.register(Arc::new(gauge)));

        let mut snapshot = Snapshot::new();
        registry.collect(&mut snapshot);
        let output = TextSerializer::new().serialize(&snapshot);

        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines, vec!["# HELP my_gauge Test gauge", "# TYPE my_gauge gauge", "my_gauge 42"]);
    }

    #[test]
    fn test_escaped_label_value() {
        let registry = Registry::new();
        let family = Arc::new(GaugeFamily::new("quoted", "Quotes", ["l"]).unwrap());
        family.labels([("l", "a\"b")]).unwrap().set(1.0);
        registry.register(family);

        let output = TextSerializer::new().render(&registry);
        assert!(output.contains("quoted{l=\"a\\\"b\"} 1\n"), "output was: {}", output);
    }

    #[test]
    fn test_histogram_buckets() {
        let registry = Registry::new();
        let buckets = Buckets::new(&[0.5, 1.0]).unwrap();
        let histogram = Arc::new(HistogramMetric::with_options("latency", "Latency", buckets).unwrap());
        histogram.observe(0.7);
        histogram.observe(3.0);
        registry.register(Arc::clone(&histogram));

        let output = TextSerializer::new().render(&registry);
        assert_eq!(
            output,
            "# HELP latency Latency\n\
             # TYPE latency histogram\n\
             latency{le=\"0.5\"} 0\n\
             latency{le=\"1\"} 1\n\
             latency{le=\"+Inf\"} 2\n"
        );
    }

    #[test]
    fn test_sorted_output() {
        let registry = Registry::new();
        registry.register(Arc::new(CounterMetric::new("zeta", "z").unwrap()));
        registry.register(Arc::new(CounterMetric::new("alpha", "a").unwrap()));

        let unsorted = TextSerializer::new().render(&registry);
        assert!(unsorted.find("zeta").unwrap() < unsorted.find("alpha").unwrap());

        let sorted = TextSerializer::new().sorted(true).render(&registry);
        assert!(sorted.find("alpha").unwrap() < sorted.find("zeta").unwrap());
    }

    #[test]
    fn test_dropped_metrics_are_skipped() {
        let registry = Registry::new();
        registry.register(Arc::new(CounterMetric::new("gone", "").unwrap()));
        registry.register(Arc::new(CounterMetric::new("here", "").unwrap()));

        let mut snapshot = Snapshot::new();
        registry.collect(&mut snapshot);
        registry.unregister("gone");

        let output = TextSerializer::new().serialize(&snapshot);
        assert_eq!(output, "# HELP here \n# TYPE here counter\nhere 0\n");
    }

    #[test]
    fn test_empty_snapshot() {
        let output = TextSerializer::new().serialize(&Snapshot::new());
        assert!(output.is_empty());
    }
}

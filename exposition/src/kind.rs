use std::fmt;

/// Metric kind.
///
/// Defines the kind, or type, of a metric, following the metric types of the Prometheus data
/// model:
/// - counters
/// - gauges
/// - histograms
/// - summaries (reserved: no summary instrument exists, but the kind can still be described)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MetricKind {
    /// Counter type.
    Counter,
    /// Gauge type.
    Gauge,
    /// Histogram type.
    Histogram,
    /// Summary type.
    Summary,
}

impl MetricKind {
    /// Gets the type string of this kind as it appears in a `# TYPE` line.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
            MetricKind::Summary => "summary",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use crate::atomics::AtomicF64;
use crate::kind::MetricKind;
use crate::label::LabelSet;
use crate::metric::{Instrument, Sample, SampleWriter};

/// A counter.
///
/// Counters only go up.  Deltas that are zero, negative, or NaN are ignored rather than rejected,
/// so callers can pass computed deltas without checking their sign first.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicF64,
}

impl Counter {
    /// Creates a new `Counter` starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter by one.
    pub fn increment(&self) {
        self.value.add(1.0);
    }

    /// Increments the counter by `value`, if `value` is positive.
    pub fn add(&self, value: f64) {
        if value > 0.0 {
            self.value.add(value);
        }
    }

    /// Gets the current value of the counter.
    pub fn value(&self) -> f64 {
        self.value.load()
    }
}

impl Instrument for Counter {
    const KIND: MetricKind = MetricKind::Counter;

    type Options = ();

    fn from_options(_: &()) -> Self {
        Counter::new()
    }

    fn write_samples(&self, name: &str, labels: &LabelSet, out: &mut dyn SampleWriter) {
        out.write_sample(Sample { name, labels, extra: None, value: self.value() });
    }
}

use crate::atomics::AtomicF64;
use crate::kind::MetricKind;
use crate::label::LabelSet;
use crate::metric::{Instrument, Sample, SampleWriter};

/// A gauge.
///
/// Gauges go up and down arbitrarily.  [`add`](Gauge::add) and [`sub`](Gauge::sub) only apply
/// positive amounts: `sub(-1.0)` leaves the gauge untouched instead of increasing it.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicF64,
}

impl Gauge {
    /// Creates a new `Gauge` starting at `initial`.
    pub fn new(initial: f64) -> Self {
        Gauge { value: AtomicF64::new(initial) }
    }

    /// Sets the gauge to `value`.
    pub fn set(&self, value: f64) {
        self.value.store(value);
    }

    /// Increments the gauge by one.
    pub fn increment(&self) {
        self.value.add(1.0);
    }

    /// Decrements the gauge by one.
    pub fn decrement(&self) {
        self.value.sub(1.0);
    }

    /// Increments the gauge by `value`, if `value` is positive.
    pub fn add(&self, value: f64) {
        if value > 0.0 {
            self.value.add(value);
        }
    }

    /// Decrements the gauge by `value`, if `value` is positive.
    pub fn sub(&self, value: f64) {
        if value > 0.0 {
            self.value.sub(value);
        }
    }

    /// Gets the current value of the gauge.
    pub fn value(&self) -> f64 {
        self.value.load()
    }
}

impl Instrument for Gauge {
    const KIND: MetricKind = MetricKind::Gauge;

    type Options = f64;

    fn from_options(initial: &f64) -> Self {
        Gauge::new(*initial)
    }

    fn write_samples(&self, name: &str, labels: &LabelSet, out: &mut dyn SampleWriter) {
        out.write_sample(Sample { name, labels, extra: None, value: self.value() });
    }
}

#[cfg(test)]
mod tests {
    use super::Gauge;

    #[test]
    fn test_gauge_operations() {
        let gauge = Gauge::new(42.0);
        assert_eq!(gauge.value(), 42.0);

        gauge.increment();
        assert_eq!(gauge.value(), 43.0);

        gauge.decrement();
        gauge.decrement();
        assert_eq!(gauge.value(), 41.0);

        gauge.set(-7.5);
        assert_eq!(gauge.value(), -7.5);

        gauge.add(10.0);
        gauge.sub(0.5);
        assert_eq!(gauge.value(), 2.0);
    }

    #[test]
    fn test_sub_ignores_non_positive_amounts() {
        let gauge = Gauge::default();
        gauge.sub(0.0);
        gauge.sub(-4.0);
        assert_eq!(gauge.value(), 0.0);

        gauge.sub(4.0);
        assert_eq!(gauge.value(), -4.0);
    }

    #[test]
    fn test_add_ignores_non_positive_amounts() {
        let gauge = Gauge::new(1.0);
        gauge.add(-1.0);
        gauge.add(0.0);
        assert_eq!(gauge.value(), 1.0);
    }
}

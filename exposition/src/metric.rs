use std::any::Any;
use std::borrow::Cow;
use std::ops::Deref;

use crate::error::Result;
use crate::kind::MetricKind;
use crate::label::LabelSet;
use crate::naming::validate_metric_name;

/// The identity of a metric: its name, description, and kind.
///
/// The name is validated once, when the descriptor is created, and never changes afterwards.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Descriptor {
    name: Cow<'static, str>,
    description: Cow<'static, str>,
    kind: MetricKind,
}

impl Descriptor {
    /// Creates a new `Descriptor`.
    ///
    /// Returns [`Error::InvalidMetricName`](crate::Error::InvalidMetricName) if `name` does not
    /// match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    pub fn new<N, D>(name: N, description: D, kind: MetricKind) -> Result<Self>
    where
        N: Into<Cow<'static, str>>,
        D: Into<Cow<'static, str>>,
    {
        let name = name.into();
        validate_metric_name(&name)?;

        Ok(Descriptor { name, description: description.into(), kind })
    }

    /// Name of the metric.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Free-form description of the metric.
    pub fn description(&self) -> &str {
        self.description.as_ref()
    }

    /// Kind of the metric.
    pub fn kind(&self) -> MetricKind {
        self.kind
    }
}

/// A single rendered value of a metric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample<'a> {
    /// Name of the metric the sample belongs to.
    pub name: &'a str,
    /// Labels identifying the series.
    pub labels: &'a LabelSet,
    /// A label contributed by the metric kind itself, such as the `le` bound of a histogram bucket.
    pub extra: Option<(&'static str, f64)>,
    /// The value.
    pub value: f64,
}

/// Receives the samples of a metric as it is serialized.
pub trait SampleWriter {
    /// Writes a single sample.
    fn write_sample(&mut self, sample: Sample<'_>);
}

/// Collects samples as `(labels, extra label, value)` tuples, in the order they are written.
///
/// Useful for inspecting a metric's samples without going through a text serializer.
impl SampleWriter for Vec<(LabelSet, Option<(&'static str, f64)>, f64)> {
    fn write_sample(&mut self, sample: Sample<'_>) {
        self.push((sample.labels.clone(), sample.extra, sample.value));
    }
}

/// A registrable metric.
///
/// Bare metrics ([`Unlabeled`]) and families ([`Family`](crate::Family)) both implement this trait,
/// which is all a registry or serializer needs to know about them.
pub trait Metric: Any + Send + Sync {
    /// Gets the identity of this metric.
    fn descriptor(&self) -> &Descriptor;

    /// Writes every current sample of this metric to `out`.
    fn write_samples(&self, out: &mut dyn SampleWriter);

    /// Name of this metric.
    fn name(&self) -> &str {
        self.descriptor().name()
    }

    /// Description of this metric.
    fn description(&self) -> &str {
        self.descriptor().description()
    }

    /// Kind of this metric.
    fn kind(&self) -> MetricKind {
        self.descriptor().kind()
    }
}

/// A value-holder for one series: a counter, gauge, or histogram.
pub trait Instrument: Send + Sync + 'static {
    /// The metric kind this instrument is exposed as.
    const KIND: MetricKind;

    /// Construction arguments, such as the initial value of a gauge.
    type Options: Clone + Send + Sync + 'static;

    /// Creates a new instrument from the given options.
    fn from_options(options: &Self::Options) -> Self;

    /// Writes the samples of this instrument, identified by `name` and `labels`, to `out`.
    fn write_samples(&self, name: &str, labels: &LabelSet, out: &mut dyn SampleWriter);
}

/// A metric with no labels: a descriptor and a single instrument.
///
/// Dereferences to the instrument, so a bare gauge is updated exactly like a gauge obtained from a
/// family.
#[derive(Debug)]
pub struct Unlabeled<I> {
    descriptor: Descriptor,
    instrument: I,
}

impl<I> Unlabeled<I>
where
    I: Instrument,
    I::Options: Default,
{
    /// Creates a new bare metric with default options.
    pub fn new<N, D>(name: N, description: D) -> Result<Self>
    where
        N: Into<Cow<'static, str>>,
        D: Into<Cow<'static, str>>,
    {
        Self::with_options(name, description, I::Options::default())
    }
}

impl<I> Unlabeled<I>
where
    I: Instrument,
{
    /// Creates a new bare metric with the given options.
    pub fn with_options<N, D>(name: N, description: D, options: I::Options) -> Result<Self>
    where
        N: Into<Cow<'static, str>>,
        D: Into<Cow<'static, str>>,
    {
        let descriptor = Descriptor::new(name, description, I::KIND)?;
        Ok(Unlabeled { descriptor, instrument: I::from_options(&options) })
    }
}

impl<I> Deref for Unlabeled<I> {
    type Target = I;

    fn deref(&self) -> &I {
        &self.instrument
    }
}

impl<I> Metric for Unlabeled<I>
where
    I: Instrument,
{
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn write_samples(&self, out: &mut dyn SampleWriter) {
        self.instrument.write_samples(self.descriptor.name(), &LabelSet::empty(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::{Descriptor, Metric};
    use crate::{Error, GaugeMetric, LabelSet, MetricKind};

    #[test]
    fn test_descriptor_validates_name() {
        let descriptor = Descriptor::new("my_gauge", "Test gauge", MetricKind::Gauge)
            .expect("valid name should be accepted");
        assert_eq!(descriptor.name(), "my_gauge");
        assert_eq!(descriptor.description(), "Test gauge");
        assert_eq!(descriptor.kind(), MetricKind::Gauge);

        let result = Descriptor::new("my gauge", "Test gauge", MetricKind::Gauge);
        assert_eq!(result, Err(Error::InvalidMetricName("my gauge".to_string())));
    }

    #[test]
    fn test_unlabeled_writes_one_sample() {
        let gauge = GaugeMetric::with_options("my_gauge", "Test gauge", 42.0)
            .expect("valid name should be accepted");
        gauge.increment();

        let mut samples = Vec::new();
        gauge.write_samples(&mut samples);
        assert_eq!(samples, vec![(LabelSet::empty(), None, 43.0)]);
        assert_eq!(gauge.kind(), MetricKind::Gauge);
    }
}

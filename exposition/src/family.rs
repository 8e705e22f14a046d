use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::counter::Counter;
use crate::error::{Error, LabelMismatch, Result};
use crate::gauge::Gauge;
use crate::histogram::Histogram;
use crate::kind::MetricKind;
use crate::label::LabelSet;
use crate::metric::{Descriptor, Instrument, Metric, SampleWriter};
use crate::naming::validate_label_name;

/// A family of counters, one per label set.
pub type CounterFamily = Family<Counter>;

/// A family of gauges, one per label set.
pub type GaugeFamily = Family<Gauge>;

/// A family of histograms, one per label set.
pub type HistogramFamily = Family<Histogram>;

/// Label names histogram families cannot use, since histograms add them to every bucket sample.
const HISTOGRAM_RESERVED_LABELS: &[&str] = &["le"];

/// A named metric with a fixed label schema, holding one instrument per distinct label set.
///
/// Instruments are created lazily by [`labels`](Family::labels) the first time a label set is seen
/// and live as long as the family does: nothing is ever evicted.
pub struct Family<I: Instrument> {
    descriptor: Descriptor,
    label_names: Vec<Cow<'static, str>>,
    options: I::Options,
    members: Mutex<BTreeMap<LabelSet, Arc<I>>>,
}

impl<I> Family<I>
where
    I: Instrument,
    I::Options: Default,
{
    /// Creates a new `Family` whose members are built with default options.
    ///
    /// Returns an error if the metric name or any of the label names is invalid.
    pub fn new<N, D, L, S>(name: N, description: D, label_names: L) -> Result<Self>
    where
        N: Into<Cow<'static, str>>,
        D: Into<Cow<'static, str>>,
        L: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self::with_options(name, description, label_names, I::Options::default())
    }
}

impl<I> Family<I>
where
    I: Instrument,
{
    /// Creates a new `Family` whose members are built with `options` unless
    /// [`labels_with`](Family::labels_with) says otherwise.
    ///
    /// Returns an error if the metric name or any of the label names is invalid.
    pub fn with_options<N, D, L, S>(
        name: N,
        description: D,
        label_names: L,
        options: I::Options,
    ) -> Result<Self>
    where
        N: Into<Cow<'static, str>>,
        D: Into<Cow<'static, str>>,
        L: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let descriptor = Descriptor::new(name, description, I::KIND)?;

        let mut label_names = label_names.into_iter().map(Into::into).collect::<Vec<_>>();
        for label_name in &label_names {
            validate_label_name(label_name)?;
            if I::KIND == MetricKind::Histogram
                && HISTOGRAM_RESERVED_LABELS.iter().any(|reserved| *reserved == *label_name)
            {
                return Err(Error::ReservedLabelName(label_name.to_string()));
            }
        }
        label_names.sort();
        label_names.dedup();

        Ok(Family { descriptor, label_names, options, members: Mutex::new(BTreeMap::new()) })
    }

    /// Gets the instrument for `labels`, creating it with the family's options if needed.
    ///
    /// See [`labels_with`](Family::labels_with).
    pub fn labels<L>(&self, labels: L) -> Result<Arc<I>>
    where
        L: Into<LabelSet>,
    {
        self.get_or_create(labels.into(), &self.options)
    }

    /// Gets the instrument for `labels`, creating it with `options` if needed.
    ///
    /// The labels must name every label of the schema exactly once, otherwise
    /// [`Error::InvalidLabelCombination`] is returned and the family is left untouched.
    ///
    /// If an instrument already exists for `labels`, it is returned as-is and `options` is
    /// ignored.  Concurrent callers asking for the same new label set all receive the same
    /// instrument.
    pub fn labels_with<L>(&self, labels: L, options: I::Options) -> Result<Arc<I>>
    where
        L: Into<LabelSet>,
    {
        self.get_or_create(labels.into(), &options)
    }

    fn get_or_create(&self, labels: LabelSet, options: &I::Options) -> Result<Arc<I>> {
        self.check_labels(&labels)?;

        let mut members = self.members.lock();
        if let Some(member) = members.get(&labels) {
            return Ok(Arc::clone(member));
        }

        trace!(metric = self.descriptor.name(), labels = ?labels, "creating series");
        let member = Arc::new(I::from_options(options));
        members.insert(labels, Arc::clone(&member));
        Ok(member)
    }

    fn check_labels(&self, labels: &LabelSet) -> Result<()> {
        let mismatch = |reason| Error::InvalidLabelCombination {
            metric: self.descriptor.name().to_string(),
            reason,
        };

        if labels.len() != self.label_names.len() {
            return Err(mismatch(LabelMismatch::Cardinality {
                expected: self.label_names.len(),
                actual: labels.len(),
            }));
        }

        if let Some(unknown) = labels.iter().find(|label| {
            self.label_names.binary_search_by(|name| (**name).cmp(label.name())).is_err()
        }) {
            return Err(mismatch(LabelMismatch::UnknownName(unknown.name().to_string())));
        }

        if let Some(repeated) = labels.repeated_name() {
            return Err(mismatch(LabelMismatch::DuplicateName(repeated.to_string())));
        }

        Ok(())
    }

    /// Gets the label names of the schema, sorted.
    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.label_names.iter().map(|name| &**name)
    }

    /// Number of label sets with an instrument.
    pub fn len(&self) -> usize {
        self.members.lock().len()
    }

    /// Whether or not no label set has an instrument yet.
    pub fn is_empty(&self) -> bool {
        self.members.lock().is_empty()
    }

    /// Gets a point-in-time copy of every member, in canonical label set order.
    pub fn members(&self) -> Vec<(LabelSet, Arc<I>)> {
        self.members
            .lock()
            .iter()
            .map(|(labels, member)| (labels.clone(), Arc::clone(member)))
            .collect()
    }
}

impl<I> Metric for Family<I>
where
    I: Instrument,
{
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn write_samples(&self, out: &mut dyn SampleWriter) {
        // Copy the members out first so no instrument is serialized while holding the lock.
        for (labels, member) in self.members() {
            member.write_samples(self.descriptor.name(), &labels, out);
        }
    }
}

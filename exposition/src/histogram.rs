//! Bucketed histograms.
use std::sync::Arc;

use crate::atomics::AtomicF64;
use crate::error::{Error, Result};
use crate::kind::MetricKind;
use crate::label::LabelSet;
use crate::metric::{Instrument, Sample, SampleWriter};

/// Upper bounds of the default bucket ladder, excluding the implicit `+Inf` bound.
pub const DEFAULT_BUCKETS: [f64; 11] =
    [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// An ascending ladder of bucket upper bounds.
///
/// The ladder always ends with `+Inf`, whether or not it was given explicitly, so every
/// observation lands in at least one bucket.  Cloning is cheap: the bounds are shared.
#[derive(Clone, Debug, PartialEq)]
pub struct Buckets {
    bounds: Arc<[f64]>,
}

impl Buckets {
    /// Creates a bucket ladder from the given upper bounds.
    ///
    /// Bounds may be given in any order; they are sorted and duplicates are merged.  Returns
    /// [`Error::InvalidBuckets`] if any bound is NaN.
    pub fn new(bounds: &[f64]) -> Result<Self> {
        if bounds.iter().any(|bound| bound.is_nan()) {
            return Err(Error::InvalidBuckets("bucket bounds cannot be NaN".to_string()));
        }

        let mut bounds = bounds.to_vec();
        bounds.sort_by(f64::total_cmp);
        bounds.dedup();
        if bounds.last() != Some(&f64::INFINITY) {
            bounds.push(f64::INFINITY);
        }

        Ok(Buckets { bounds: bounds.into() })
    }

    /// Creates `count` buckets, each `width` wide, where the lowest bucket has an upper bound of
    /// `start`.
    pub fn linear(start: f64, width: f64, count: usize) -> Result<Self> {
        if count < 1 {
            return Err(Error::InvalidBuckets("linear buckets need a positive count".to_string()));
        }
        if !(width > 0.0) {
            return Err(Error::InvalidBuckets("linear buckets need a positive width".to_string()));
        }

        let bounds = (0..count).map(|i| start + width * i as f64).collect::<Vec<_>>();
        Self::new(&bounds)
    }

    /// Creates `count` buckets, where the lowest bucket has an upper bound of `start` and each
    /// following upper bound is `factor` times the previous one.
    pub fn exponential(start: f64, factor: f64, count: usize) -> Result<Self> {
        if count < 1 {
            return Err(Error::InvalidBuckets(
                "exponential buckets need a positive count".to_string(),
            ));
        }
        if !(start > 0.0) {
            return Err(Error::InvalidBuckets(
                "exponential buckets need a positive start value".to_string(),
            ));
        }
        if !(factor > 1.0) {
            return Err(Error::InvalidBuckets(
                "exponential buckets need a factor greater than 1".to_string(),
            ));
        }

        let mut bounds = Vec::with_capacity(count);
        let mut current = start;
        for _ in 0..count {
            bounds.push(current);
            current *= factor;
        }
        Self::new(&bounds)
    }

    /// Gets the upper bounds, in ascending order, ending with `+Inf`.
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Number of buckets, including the `+Inf` bucket.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Always `false`: a ladder holds at least the `+Inf` bucket.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl Default for Buckets {
    fn default() -> Self {
        let mut bounds = DEFAULT_BUCKETS.to_vec();
        bounds.push(f64::INFINITY);
        Buckets { bounds: bounds.into() }
    }
}

/// A bucketed histogram.
///
/// This histogram tracks the number of observations that fall at or below each bucket's upper
/// bound, plus the running sum of all observations.  Bucket counts are cumulative: the count of a
/// bucket is never lower than the count of any bucket with a smaller bound.
#[derive(Debug)]
pub struct Histogram {
    buckets: Buckets,
    counts: Vec<AtomicF64>,
    sum: AtomicF64,
}

impl Histogram {
    /// Creates a new `Histogram` using the given bucket ladder.
    pub fn new(buckets: Buckets) -> Self {
        let counts = buckets.bounds().iter().map(|_| AtomicF64::new(0.0)).collect();
        Histogram { buckets, counts, sum: AtomicF64::new(0.0) }
    }

    /// Records a single observation.
    ///
    /// Every bucket whose upper bound is greater than or equal to `value` is incremented.
    ///
    /// Buckets are incremented from the highest bound down while readers scan upward, so a
    /// concurrent reader never sees a lower bucket ahead of a higher one.
    pub fn observe(&self, value: f64) {
        self.sum.add(value);

        for (bound, count) in self.buckets.bounds().iter().zip(self.counts.iter()).rev() {
            if value <= *bound {
                count.add(1.0);
            }
        }
    }

    /// Gets the sum of all observations.
    pub fn sum(&self) -> f64 {
        self.sum.load()
    }

    /// Gets the number of observations, which is the count of the `+Inf` bucket.
    pub fn count(&self) -> f64 {
        self.counts.last().map(AtomicF64::load).unwrap_or(0.0)
    }

    /// Gets the buckets.
    ///
    /// Buckets are tuples, where the first element is the bucket's upper bound, and the second
    /// element is the cumulative count of observations in that bucket.
    pub fn buckets(&self) -> Vec<(f64, f64)> {
        self.buckets.bounds().iter().copied().zip(self.counts.iter().map(AtomicF64::load)).collect()
    }

    /// Gets the bucket ladder this histogram was created with.
    pub fn bucket_ladder(&self) -> &Buckets {
        &self.buckets
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Histogram::new(Buckets::default())
    }
}

impl Instrument for Histogram {
    const KIND: MetricKind = MetricKind::Histogram;

    type Options = Buckets;

    fn from_options(buckets: &Buckets) -> Self {
        Histogram::new(buckets.clone())
    }

    fn write_samples(&self, name: &str, labels: &LabelSet, out: &mut dyn SampleWriter) {
        for (bound, count) in self.buckets.bounds().iter().zip(self.counts.iter()) {
            out.write_sample(Sample { name, labels, extra: Some(("le", *bound)), value: count.load() });
        }
    }
}

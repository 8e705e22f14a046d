//! In-process metrics instrumentation.
//!
//! `exposition` provides lock-free counters, gauges, and histograms, families that hand out one
//! instrument per distinct label set, and a registry that can be snapshotted for serialization.
//!
//! # Overview
//!
//! ## Metric kinds
//!
//! ### Counters
//! A [`Counter`] is a cumulative value that only goes up.  Adding a zero, negative, or NaN amount
//! is silently ignored.
//!
//! ### Gauges
//! A [`Gauge`] is a value that goes up and down arbitrarily: it can be set, incremented, and
//! decremented.
//!
//! ### Histograms
//! A [`Histogram`] counts observations into a fixed ladder of cumulative [`Buckets`], and keeps
//! the sum of everything observed.
//!
//! All three store their values in [`AtomicF64`], so updates from any number of threads never
//! block and are never lost.
//!
//! ## Bare metrics and families
//! A metric without labels is an [`Unlabeled`] instrument: [`CounterMetric`], [`GaugeMetric`], or
//! [`HistogramMetric`].  A metric with labels is a [`Family`], which fixes the label names up
//! front and creates an instrument the first time each combination of label values is used.
//!
//! ## Registration and collection
//! Metrics are registered by name in a [`Registry`].  A registry is a [`Collector`]: collecting
//! fills a [`Snapshot`] with non-owning references to every registered metric, which a serializer
//! then walks without ever touching the registry's lock.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use exposition::{Collector, GaugeFamily, Registry, Snapshot};
//!
//! let registry = Registry::new();
//! let temperature = Arc::new(
//!     GaugeFamily::new("room_temperature_celsius", "Room temperature.", ["room"]).unwrap(),
//! );
//! assert!(registry.register(Arc::clone(&temperature)));
//!
//! temperature.labels([("room", "kitchen")]).unwrap().set(21.5);
//!
//! let mut snapshot = Snapshot::new();
//! registry.collect(&mut snapshot);
//! assert_eq!(snapshot.len(), 1);
//! ```
#![deny(missing_docs)]

pub mod atomics;
pub use self::atomics::AtomicF64;

mod counter;
pub use self::counter::Counter;

mod error;
pub use self::error::{Error, LabelMismatch, Result};

mod family;
pub use self::family::{CounterFamily, Family, GaugeFamily, HistogramFamily};

mod gauge;
pub use self::gauge::Gauge;

mod histogram;
pub use self::histogram::{Buckets, Histogram, DEFAULT_BUCKETS};

mod kind;
pub use self::kind::MetricKind;

mod label;
pub use self::label::{Label, LabelName, LabelSet};

mod metric;
pub use self::metric::{Descriptor, Instrument, Metric, Sample, SampleWriter, Unlabeled};

mod naming;
pub use self::naming::{validate_label_name, validate_metric_name};

mod registry;
pub use self::registry::{Collector, Registry};

mod snapshot;
pub use self::snapshot::Snapshot;

/// A counter without labels.
pub type CounterMetric = Unlabeled<Counter>;

/// A gauge without labels.
pub type GaugeMetric = Unlabeled<Gauge>;

/// A histogram without labels.
pub type HistogramMetric = Unlabeled<Histogram>;

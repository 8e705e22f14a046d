//! Renders metrics in the Prometheus text exposition format.
//!
//! ```rust
//! use std::sync::Arc;
//! use exposition::{GaugeMetric, Registry};
//! use exposition_text::TextSerializer;
//!
//! let registry = Registry::new();
//! let gauge = Arc::new(GaugeMetric::with_options("my_gauge", "Test gauge", 42.0).unwrap());
//! registry.register(gauge);
//!
//! let output = TextSerializer::new().render(&registry);
//! assert_eq!(output, "# HELP my_gauge Test gauge\n# TYPE my_gauge gauge\nmy_gauge 42\n");
//! ```
#![deny(missing_docs)]
pub mod formatting;

mod serializer;
pub use self::serializer::{Serializer, TextSerializer};

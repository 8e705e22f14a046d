use thiserror::Error as ThisError;

/// Errors that can occur while constructing metrics or resolving labeled series.
///
/// Every error is raised before any state is touched: a failed construction produces nothing, and
/// a failed [`labels`](crate::Family::labels) call leaves the family unchanged.
#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum Error {
    /// The metric name does not match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    #[error("invalid metric name {0:?}: must match [a-zA-Z_:][a-zA-Z0-9_:]*")]
    InvalidMetricName(String),

    /// A label name does not match `[a-zA-Z_][a-zA-Z0-9_]*`.
    #[error("invalid label name {0:?}: must match [a-zA-Z_][a-zA-Z0-9_]*")]
    InvalidLabelName(String),

    /// A label name is reserved for a label the metric kind adds on its own.
    #[error("label name {0:?} is reserved for this metric kind")]
    ReservedLabelName(String),

    /// The labels given to a family do not match its label schema.
    #[error("invalid label combination for {metric}: {reason}")]
    InvalidLabelCombination {
        /// Name of the family the labels were given to.
        metric: String,
        /// What was wrong with the given labels.
        reason: LabelMismatch,
    },

    /// A histogram bucket ladder could not be built.
    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),
}

/// The ways a label set can fail to match a family's schema.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum LabelMismatch {
    /// The number of labels differs from the number of schema label names.
    #[error("expected {expected} labels, got {actual}")]
    Cardinality {
        /// Number of label names in the schema.
        expected: usize,
        /// Number of labels given.
        actual: usize,
    },

    /// A label name is not part of the schema.
    #[error("unknown label name {0:?}")]
    UnknownName(String),

    /// A label name appears more than once.
    #[error("label name {0:?} given more than once")]
    DuplicateName(String),
}

/// Result type for fallible metric operations.
pub type Result<T> = std::result::Result<T, Error>;

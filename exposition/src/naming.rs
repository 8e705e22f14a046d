//! Name validation under the Prometheus [data model].
//!
//! [data model]: https://prometheus.io/docs/concepts/data_model/#metric-names-and-labels

use crate::error::{Error, Result};

/// Checks that `name` is a valid metric name, matching `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn validate_metric_name(name: &str) -> Result<()> {
    if is_valid(name, valid_metric_name_start_character, valid_metric_name_character) {
        Ok(())
    } else {
        Err(Error::InvalidMetricName(name.to_string()))
    }
}

/// Checks that `name` is a valid label name, matching `[a-zA-Z_][a-zA-Z0-9_]*`.
pub fn validate_label_name(name: &str) -> Result<()> {
    if is_valid(name, valid_label_name_start_character, valid_label_name_character) {
        Ok(())
    } else {
        Err(Error::InvalidLabelName(name.to_string()))
    }
}

fn is_valid(name: &str, start: fn(char) -> bool, rest: fn(char) -> bool) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if start(c) => chars.all(rest),
        _ => false,
    }
}

#[inline]
fn valid_metric_name_start_character(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':'
}

#[inline]
fn valid_metric_name_character(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ':'
}

#[inline]
fn valid_label_name_start_character(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn valid_label_name_character(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

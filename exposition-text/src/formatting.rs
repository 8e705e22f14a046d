//! Helpers for rendering metrics in the Prometheus exposition format.
use std::fmt::Write;

use exposition::{Label, LabelSet, MetricKind};

/// Writes a help (description) line in the Prometheus [exposition format].
///
/// The description is written as-is.
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn write_help_line(buffer: &mut String, name: &str, desc: &str) {
    buffer.push_str("# HELP ");
    buffer.push_str(name);
    buffer.push(' ');
    buffer.push_str(desc);
    buffer.push('\n');
}

/// Writes a metric type line in the Prometheus [exposition format].
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn write_type_line(buffer: &mut String, name: &str, kind: MetricKind) {
    buffer.push_str("# TYPE ");
    buffer.push_str(name);
    buffer.push(' ');
    buffer.push_str(kind.as_str());
    buffer.push('\n');
}

/// Writes a metric in the Prometheus [exposition format].
///
/// `additional_label` carries a kind-specific label, such as `le` for histogram buckets, and is
/// written after the series labels.  The label block is omitted entirely when there are no
/// series labels and no additional label.
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn write_metric_line(
    buffer: &mut String,
    name: &str,
    labels: &LabelSet,
    additional_label: Option<(&str, f64)>,
    value: f64,
) {
    buffer.push_str(name);

    if !labels.is_empty() || additional_label.is_some() {
        buffer.push('{');

        let mut first = true;
        for label in labels {
            if first {
                first = false;
            } else {
                buffer.push(',');
            }
            write_label(buffer, label);
        }

        if let Some((name, value)) = additional_label {
            if !first {
                buffer.push(',');
            }
            buffer.push_str(name);
            buffer.push_str("=\"");
            write_value(buffer, value);
            buffer.push('"');
        }

        buffer.push('}');
    }

    buffer.push(' ');
    write_value(buffer, value);
    buffer.push('\n');
}

fn write_label(buffer: &mut String, label: &Label) {
    buffer.push_str(label.name());
    buffer.push_str("=\"");
    buffer.push_str(&escape_label_value(label.value()));
    buffer.push('"');
}

/// Writes a sample value or bucket bound.
///
/// Finite values use the shortest representation that round-trips, so `42.0` is written as `42`
/// and `0.005` as `0.005`.  Infinities and NaN use the spellings Prometheus parses: `+Inf`, `-Inf`
/// and `NaN`.
pub fn write_value(buffer: &mut String, value: f64) {
    if value.is_nan() {
        buffer.push_str("NaN");
    } else if value == f64::INFINITY {
        buffer.push_str("+Inf");
    } else if value == f64::NEG_INFINITY {
        buffer.push_str("-Inf");
    } else {
        // Writing to a `String` cannot fail.
        let _ = write!(buffer, "{}", value);
    }
}

/// Escapes a label value for the Prometheus [exposition format].
///
/// Only double quotes are escaped, as `\"`.  Everything else, including backslashes and line
/// feeds, is passed through.
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' {
            escaped.push_str("\\\"");
        } else {
            escaped.push(c);
        }
    }
    escaped
}

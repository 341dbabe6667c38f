//! Prometheus text exposition helpers (format version 0.0.4).

use std::fmt::{self, Display, Write};

/// Content type served alongside rendered output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Escape a label value.
pub(crate) fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape HELP text. Quotes are legal here, only backslash and newline are not.
pub(crate) fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Float in exposition notation: `+Inf`, `-Inf`, `NaN`, otherwise shortest decimal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PromFloat(pub f64);

impl Display for PromFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            f.write_str("NaN")
        } else if v == f64::INFINITY {
            f.write_str("+Inf")
        } else if v == f64::NEG_INFINITY {
            f.write_str("-Inf")
        } else {
            write!(f, "{v}")
        }
    }
}

pub(crate) fn write_preamble(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(help));
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

/// Write one sample line. `extra` is appended after the instrument's own labels
/// (used for the histogram `le` label).
pub(crate) fn write_sample(
    out: &mut String,
    name: &str,
    suffix: &str,
    label_names: &[String],
    label_values: &[String],
    extra: Option<(&str, &str)>,
    value: impl Display,
) {
    let mut pairs: Vec<String> = label_names
        .iter()
        .zip(label_values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect();
    if let Some((k, v)) = extra {
        pairs.push(format!("{}=\"{}\"", k, escape_label(v)));
    }

    if pairs.is_empty() {
        let _ = writeln!(out, "{}{} {}", name, suffix, value);
    } else {
        let _ = writeln!(out, "{}{}{{{}}} {}", name, suffix, pairs.join(","), value);
    }
}

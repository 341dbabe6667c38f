//! Process-wide metric registry.
//!
//! Instruments are registered once at startup and live for the rest of the
//! process. Each registration returns a typed handle; the registry keeps a
//! type-erased view of the same state for rendering. Families render sorted by
//! name and series sorted by label values, so output structure is stable
//! between scrapes.

mod counter;
mod gauge;
mod histogram;
pub mod text;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::{MetricsError, Result};

pub use counter::CounterVec;
pub use gauge::Gauge;
pub use histogram::{HistogramSnapshot, HistogramVec};

/// Default latency buckets in seconds (same as the Prometheus client default).
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Type-erased instrument as seen by the renderer.
pub(crate) trait Family: Send + Sync {
    /// Append HELP/TYPE preamble and all series lines.
    fn render(&self, out: &mut String);
}

#[derive(Default)]
pub struct Registry {
    families: RwLock<BTreeMap<String, Arc<dyn Family>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_counter<const N: usize>(
        &self,
        name: &str,
        help: &str,
        label_names: [&str; N],
    ) -> Result<CounterVec<N>> {
        validate_name(name)?;
        let label_names = validate_labels(name, label_names, false)?;

        let counter = CounterVec::new(name, help, label_names);
        self.insert(name, counter.family())?;
        tracing::debug!(metric = %name, kind = "counter", labels = N, "metric registered");
        Ok(counter)
    }

    /// `buckets` must be strictly increasing; the `+Inf` bucket is implicit.
    pub fn register_histogram<const N: usize>(
        &self,
        name: &str,
        help: &str,
        buckets: &[f64],
        label_names: [&str; N],
    ) -> Result<HistogramVec<N>> {
        validate_name(name)?;
        let label_names = validate_labels(name, label_names, true)?;
        let bounds = validate_buckets(name, buckets)?;

        let histogram = HistogramVec::new(name, help, bounds, label_names);
        self.insert(name, histogram.family())?;
        tracing::debug!(metric = %name, kind = "histogram", labels = N, "metric registered");
        Ok(histogram)
    }

    pub fn register_gauge(&self, name: &str, help: &str) -> Result<Gauge> {
        validate_name(name)?;

        let gauge = Gauge::new(name, help);
        self.insert(name, gauge.family())?;
        tracing::debug!(metric = %name, kind = "gauge", "metric registered");
        Ok(gauge)
    }

    /// Render every registered instrument in the text exposition format.
    pub fn render(&self) -> String {
        // Families are only ever inserted whole, so a poisoned table is still consistent.
        let families = match self.families.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut out = String::with_capacity(families.len() * 256);
        for family in families.values() {
            family.render(&mut out);
        }
        out
    }

    /// Registered instrument names, sorted.
    pub fn names(&self) -> Vec<String> {
        match self.families.read() {
            Ok(g) => g.keys().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().keys().cloned().collect(),
        }
    }

    fn insert(&self, name: &str, family: Arc<dyn Family>) -> Result<()> {
        let mut families = self
            .families
            .write()
            .map_err(|_| MetricsError::Internal("registry lock poisoned".into()))?;

        if families.contains_key(name) {
            return Err(MetricsError::AlreadyRegistered(name.to_owned()));
        }
        families.insert(name.to_owned(), family);
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':') {
        Ok(())
    } else {
        Err(MetricsError::InvalidName(name.to_owned()))
    }
}

fn validate_labels<const N: usize>(
    metric: &str,
    label_names: [&str; N],
    histogram: bool,
) -> Result<[String; N]> {
    for (i, label) in label_names.iter().enumerate() {
        let mut chars = label.chars();
        let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        let valid = head_ok
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !label.starts_with("__")
            && !(histogram && *label == "le")
            && !label_names[..i].contains(label);

        if !valid {
            return Err(MetricsError::InvalidLabel {
                metric: metric.to_owned(),
                label: (*label).to_owned(),
            });
        }
    }
    Ok(label_names.map(str::to_owned))
}

fn validate_buckets(metric: &str, buckets: &[f64]) -> Result<Vec<f64>> {
    let invalid = |reason: &str| MetricsError::InvalidBuckets {
        metric: metric.to_owned(),
        reason: reason.to_owned(),
    };

    let mut bounds = buckets.to_vec();
    if bounds.last() == Some(&f64::INFINITY) {
        bounds.pop();
    }
    if bounds.iter().any(|b| !b.is_finite()) {
        return Err(invalid("bounds must be finite"));
    }
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("bounds must be strictly increasing"));
    }
    Ok(bounds)
}

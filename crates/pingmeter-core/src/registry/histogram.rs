use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use super::text::{write_preamble, write_sample, PromFloat};
use super::Family;

/// Per-series state. Kept behind one mutex so buckets, sum and count move together
/// and a concurrent render never sees a half-applied observation.
#[derive(Debug, Clone)]
struct SeriesState {
    // Cumulative: index i counts observations <= bounds[i].
    buckets: Vec<u64>,
    sum: f64,
    count: u64,
}

impl SeriesState {
    fn new(n: usize) -> Self {
        Self {
            buckets: vec![0; n],
            sum: 0.0,
            count: 0,
        }
    }
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// `(upper_bound, cumulative_count)`, ending with the `+Inf` bucket.
    pub buckets: Vec<(f64, u64)>,
    pub sum: f64,
    pub count: u64,
}

struct HistogramCore<const N: usize> {
    name: String,
    help: String,
    label_names: [String; N],
    bounds: Vec<f64>,
    map: DashMap<[String; N], Mutex<SeriesState>>,
}

impl<const N: usize> HistogramCore<N> {
    fn record(&self, series: &Mutex<SeriesState>, value: f64) {
        // Poisoned mutex means a logic bug elsewhere; drop the sample instead of panicking.
        let Ok(mut s) = series.lock() else {
            tracing::warn!(metric = %self.name, "histogram series lock poisoned, observation dropped");
            return;
        };

        for (i, &b) in self.bounds.iter().enumerate() {
            if value <= b {
                s.buckets[i] += 1;
            }
        }
        s.sum += value;
        s.count += 1;
    }

    fn snapshot_of(&self, series: &Mutex<SeriesState>) -> Option<HistogramSnapshot> {
        let s = series.lock().ok()?.clone();
        let mut buckets: Vec<(f64, u64)> = self
            .bounds
            .iter()
            .copied()
            .zip(s.buckets.iter().copied())
            .collect();
        buckets.push((f64::INFINITY, s.count));
        Some(HistogramSnapshot {
            buckets,
            sum: s.sum,
            count: s.count,
        })
    }
}

/// Bucketed distribution partitioned by `N` labels.
#[derive(Clone)]
pub struct HistogramVec<const N: usize> {
    inner: Arc<HistogramCore<N>>,
}

impl<const N: usize> HistogramVec<N> {
    pub(crate) fn new(name: &str, help: &str, bounds: Vec<f64>, label_names: [String; N]) -> Self {
        Self {
            inner: Arc::new(HistogramCore {
                name: name.to_owned(),
                help: help.to_owned(),
                label_names,
                bounds,
                map: DashMap::new(),
            }),
        }
    }

    pub(crate) fn family(&self) -> Arc<dyn Family> {
        self.inner.clone()
    }

    /// Record one observation. Bucket bounds are inclusive upper bounds.
    pub fn observe(&self, labels: [&str; N], value: f64) {
        let key = labels.map(str::to_owned);
        if let Some(series) = self.inner.map.get(&key) {
            self.inner.record(series.value(), value);
            return;
        }
        let bucket_count = self.inner.bounds.len();
        let series = self
            .inner
            .map
            .entry(key)
            .or_insert_with(|| Mutex::new(SeriesState::new(bucket_count)));
        self.inner.record(series.value(), value);
    }

    /// Copy of one series, `None` if it was never observed.
    pub fn snapshot(&self, labels: [&str; N]) -> Option<HistogramSnapshot> {
        let key = labels.map(str::to_owned);
        let series = self.inner.map.get(&key)?;
        self.inner.snapshot_of(series.value())
    }

    /// Configured upper bounds, without the implicit `+Inf`.
    pub fn bounds(&self) -> &[f64] {
        &self.inner.bounds
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }
}

impl<const N: usize> Family for HistogramCore<N> {
    fn render(&self, out: &mut String) {
        write_preamble(out, &self.name, &self.help, "histogram");

        let mut rows: Vec<([String; N], HistogramSnapshot)> = self
            .map
            .iter()
            .filter_map(|r| Some((r.key().clone(), self.snapshot_of(r.value())?)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (values, snap) in &rows {
            for (le, count) in &snap.buckets {
                let le = PromFloat(*le).to_string();
                write_sample(
                    out,
                    &self.name,
                    "_bucket",
                    &self.label_names,
                    values,
                    Some(("le", le.as_str())),
                    count,
                );
            }
            write_sample(out, &self.name, "_sum", &self.label_names, values, None, PromFloat(snap.sum));
            write_sample(out, &self.name, "_count", &self.label_names, values, None, snap.count);
        }
    }
}

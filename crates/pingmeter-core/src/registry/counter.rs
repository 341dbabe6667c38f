use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::text::{write_preamble, write_sample};
use super::Family;

struct CounterCore<const N: usize> {
    name: String,
    help: String,
    label_names: [String; N],
    map: DashMap<[String; N], AtomicU64>,
}

/// Monotonic counter partitioned by `N` labels.
///
/// The label count is part of the type, so passing the wrong number of label
/// values does not compile. Handles are cheap to clone and share state.
#[derive(Clone)]
pub struct CounterVec<const N: usize> {
    inner: Arc<CounterCore<N>>,
}

impl<const N: usize> CounterVec<N> {
    pub(crate) fn new(name: &str, help: &str, label_names: [String; N]) -> Self {
        Self {
            inner: Arc::new(CounterCore {
                name: name.to_owned(),
                help: help.to_owned(),
                label_names,
                map: DashMap::new(),
            }),
        }
    }

    pub(crate) fn family(&self) -> Arc<dyn Family> {
        self.inner.clone()
    }

    /// Increment by 1.
    pub fn increment(&self, labels: [&str; N]) {
        self.increment_by(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn increment_by(&self, labels: [&str; N], v: u64) {
        let key = labels.map(str::to_owned);
        if let Some(counter) = self.inner.map.get(&key) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let counter = self.inner.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series, `None` if it was never touched.
    pub fn get(&self, labels: [&str; N]) -> Option<u64> {
        let key = labels.map(str::to_owned);
        self.inner.map.get(&key).map(|c| c.load(Ordering::Relaxed))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }
}

impl<const N: usize> Family for CounterCore<N> {
    fn render(&self, out: &mut String) {
        write_preamble(out, &self.name, &self.help, "counter");

        let mut rows: Vec<([String; N], u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (values, v) in &rows {
            write_sample(out, &self.name, "", &self.label_names, values, None, v);
        }
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::text::{write_preamble, write_sample, PromFloat};
use super::Family;

struct GaugeCore {
    name: String,
    help: String,
    // f64 bit pattern
    bits: AtomicU64,
}

/// Single unlabeled value; every `set` clobbers the previous one.
#[derive(Clone)]
pub struct Gauge {
    inner: Arc<GaugeCore>,
}

impl Gauge {
    pub(crate) fn new(name: &str, help: &str) -> Self {
        Self {
            inner: Arc::new(GaugeCore {
                name: name.to_owned(),
                help: help.to_owned(),
                bits: AtomicU64::new(0f64.to_bits()),
            }),
        }
    }

    pub(crate) fn family(&self) -> Arc<dyn Family> {
        self.inner.clone()
    }

    pub fn set(&self, v: f64) {
        self.inner.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.inner.bits.load(Ordering::Relaxed))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }
}

impl Family for GaugeCore {
    fn render(&self, out: &mut String) {
        write_preamble(out, &self.name, &self.help, "gauge");
        let v = f64::from_bits(self.bits.load(Ordering::Relaxed));
        write_sample(out, &self.name, "", &[], &[], None, PromFloat(v));
    }
}

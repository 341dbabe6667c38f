//! pingmeter core: the metric registry, its instruments, and the text
//! exposition renderer.
//!
//! This crate carries no runtime or HTTP dependencies so the registry can be
//! driven from any execution model and tested with plain threads.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Instrument updates never fail at runtime: label arity is checked by the type
//! system and lock poisoning degrades to a dropped sample.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod registry;

/// Shared result type.
pub use error::{MetricsError, Result};
pub use registry::{
    text::CONTENT_TYPE, CounterVec, Gauge, HistogramSnapshot, HistogramVec, Registry,
    DEFAULT_BUCKETS,
};

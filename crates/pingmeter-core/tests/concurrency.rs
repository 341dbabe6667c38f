#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use pingmeter_core::Registry;

/// Value of the first sample line starting with `prefix`.
fn sample(out: &str, prefix: &str) -> Option<f64> {
    out.lines()
        .find(|l| l.starts_with(prefix))
        .and_then(|l| l.rsplit(' ').next())
        .and_then(|v| v.parse().ok())
}

#[test]
fn concurrent_increments_lose_nothing() {
    let reg = Registry::new();
    let c = reg.register_counter("hits_total", "h", ["path"]).unwrap();

    thread::scope(|s| {
        for _ in 0..8 {
            let c = c.clone();
            s.spawn(move || {
                for _ in 0..10_000 {
                    c.increment(["/"]);
                }
            });
        }
    });

    assert_eq!(c.get(["/"]), Some(80_000));
}

#[test]
fn concurrent_observations_keep_series_consistent() {
    let reg = Registry::new();
    let h = reg.register_histogram("work_seconds", "w", &[1.0], ["kind"]).unwrap();

    thread::scope(|s| {
        for _ in 0..4 {
            let h = h.clone();
            s.spawn(move || {
                for i in 0..2_500 {
                    h.observe(["io"], if i % 2 == 0 { 0.5 } else { 2.0 });
                }
            });
        }
    });

    let snap = h.snapshot(["io"]).unwrap();
    assert_eq!(snap.count, 10_000);
    assert_eq!(snap.buckets, vec![(1.0, 5_000), (f64::INFINITY, 10_000)]);
    assert!((snap.sum - 12_500.0).abs() < 1e-6);
}

#[test]
fn scrape_during_burst_never_goes_backwards() {
    let reg = Registry::new();
    let c = reg.register_counter("burst_total", "b", ["status"]).unwrap();
    let h = reg.register_histogram("burst_seconds", "b", &[0.1], ["status"]).unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let scraper = s.spawn(|| {
            let mut last_counter = 0.0;
            let mut last_count = 0.0;
            let mut scrapes = 0u32;
            while !done.load(Ordering::Acquire) || scrapes == 0 {
                let out = reg.render();
                if let Some(v) = sample(&out, "burst_total{status=\"200\"}") {
                    assert!(v >= last_counter, "counter went from {last_counter} to {v}");
                    last_counter = v;
                }
                if let Some(v) = sample(&out, "burst_seconds_count{status=\"200\"}") {
                    assert!(v >= last_count, "count went from {last_count} to {v}");
                    // +Inf bucket and count come from the same locked snapshot.
                    let inf = sample(&out, "burst_seconds_bucket{status=\"200\",le=\"+Inf\"}").unwrap();
                    assert_eq!(inf, v);
                    last_count = v;
                }
                scrapes += 1;
            }
        });

        let writers: Vec<_> = (0..10)
            .map(|_| {
                let (c, h) = (c.clone(), h.clone());
                s.spawn(move || {
                    for _ in 0..100 {
                        c.increment(["200"]);
                        h.observe(["200"], 0.05);
                    }
                })
            })
            .collect();
        for w in writers {
            w.join().unwrap();
        }
        done.store(true, Ordering::Release);
        scraper.join().unwrap();
    });

    assert_eq!(c.get(["200"]), Some(1000));
    let out = reg.render();
    assert_eq!(sample(&out, "burst_total{status=\"200\"}"), Some(1000.0));
}

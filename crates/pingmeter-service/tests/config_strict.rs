#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use pingmeter_core::{error::ErrorClass, MetricsError, DEFAULT_BUCKETS};
use pingmeter_service::{app_state::AppState, config, router, ServiceMetrics};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
exposition:
  port: 9100
  pth: "/metrics" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, MetricsError::Config(_)));
    assert_eq!(err.class(), ErrorClass::Startup);
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.exposition.port, 9090);
    assert_eq!(cfg.exposition.path, "/metrics");
    assert_eq!(cfg.sampler.interval(), Duration::from_secs(10));
    assert_eq!(cfg.histogram.buckets, DEFAULT_BUCKETS.to_vec());
}

#[test]
fn ok_full_config() {
    let ok = r#"
version: 1
exposition:
  host: "127.0.0.1"
  port: 9464
  path: "/internal/metrics"
sampler:
  interval_ms: 2500
histogram:
  buckets: [0.1, 0.5, 1.0]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.exposition.listen_addr().unwrap().to_string(), "127.0.0.1:9464");
    assert_eq!(cfg.exposition.path, "/internal/metrics");
    assert_eq!(cfg.sampler.interval(), Duration::from_millis(2500));
    assert_eq!(cfg.histogram.buckets, vec![0.1, 0.5, 1.0]);
}

#[test]
fn rejects_bad_values() {
    let cases = [
        "version: 2\n",
        "version: 1\nexposition: { path: \"metrics\" }\n",
        "version: 1\nexposition: { path: \"/\" }\n",
        "version: 1\nexposition: { host: \"not-an-ip\" }\n",
        "version: 1\nsampler: { interval_ms: 0 }\n",
        "version: 1\nhistogram: { buckets: [1.0, 0.5] }\n",
        "version: 1\nexposition: { path: \"/metrics/*\" }\n",
        "version: 1\nexposition: { path: \"/metrics/*rest\" }\n",
        "version: 1\nexposition: { path: \"/:\" }\n",
        "version: 1\nexposition: { path: \"/metrics/:id\" }\n",
        "version: 1\nexposition: { path: \"/metrics/{id}\" }\n",
        "version: 1\nexposition: { path: \"/metrics:scrape\" }\n",
        "version: 1\nhistogram: { buckets: [0.5, .nan] }\n",
        "version: 1\nhistogram: { buckets: [.inf, 1.0] }\n",
        "version: 1\nhistogram: { buckets: [-.inf, 1.0] }\n",
    ];
    for case in cases {
        let err = config::load_from_str(case).expect_err(case);
        assert!(matches!(err, MetricsError::Config(_)), "{case}: {err}");
    }
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let cfg = config::load_or_default("/nonexistent/pingmeter.yaml").expect("defaults");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.exposition.port, 9090);

    assert!(config::load_from_file("/nonexistent/pingmeter.yaml").is_err());
}

#[test]
fn literal_paths_are_accepted() {
    let metrics = Arc::new(ServiceMetrics::new(&DEFAULT_BUCKETS).unwrap());
    for path in ["/metrics", "/internal/metrics", "/metrics-v2", "/metrics/"] {
        let cfg = config::load_from_str(&format!("version: 1\nexposition: {{ path: \"{path}\" }}\n"))
            .expect(path);
        assert_eq!(cfg.exposition.path, path);
        // Accepted paths must also be routable.
        router::build_router(AppState::new(Arc::clone(&metrics)), &cfg.exposition.path);
    }
}

#[test]
fn trailing_inf_bucket_matches_registry_rule() {
    let cfg = config::load_from_str("version: 1\nhistogram: { buckets: [0.5, 1.0, .inf] }\n")
        .expect("trailing +Inf is allowed");
    assert_eq!(cfg.histogram.buckets.last(), Some(&f64::INFINITY));

    let metrics = ServiceMetrics::from_config(&cfg).expect("registry accepts it too");
    assert_eq!(metrics.request_duration().bounds(), &[0.5, 1.0]);
}

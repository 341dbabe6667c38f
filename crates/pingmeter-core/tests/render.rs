#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use pingmeter_core::Registry;

#[test]
fn request_counter_scenario() {
    let reg = Registry::new();
    let c = reg
        .register_counter("http_requests_total", "Total number of HTTP requests", ["method", "path", "status"])
        .unwrap();

    for _ in 0..3 {
        c.increment(["GET", "/ping", "200"]);
    }
    c.increment(["GET", "/ping", "500"]);

    let out = reg.render();
    let expected = "\
# HELP http_requests_total Total number of HTTP requests
# TYPE http_requests_total counter
http_requests_total{method=\"GET\",path=\"/ping\",status=\"200\"} 3
http_requests_total{method=\"GET\",path=\"/ping\",status=\"500\"} 1
";
    assert_eq!(out, expected);
}

#[test]
fn empty_instruments_render_preamble_only() {
    let reg = Registry::new();
    reg.register_counter("a_total", "A counter", ["x"]).unwrap();
    reg.register_histogram("b_seconds", "A histogram", &[1.0], ["y"]).unwrap();

    let out = reg.render();
    let expected = "\
# HELP a_total A counter
# TYPE a_total counter
# HELP b_seconds A histogram
# TYPE b_seconds histogram
";
    assert_eq!(out, expected);
}

#[test]
fn histogram_lines() {
    let reg = Registry::new();
    let h = reg
        .register_histogram("http_request_duration_seconds", "Latency", &[0.5, 1.0], ["method", "path"])
        .unwrap();
    for v in [0.25, 0.75] {
        h.observe(["GET", "/ping"], v);
    }

    let out = reg.render();
    let expected = "\
# HELP http_request_duration_seconds Latency
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_bucket{method=\"GET\",path=\"/ping\",le=\"0.5\"} 1
http_request_duration_seconds_bucket{method=\"GET\",path=\"/ping\",le=\"1\"} 2
http_request_duration_seconds_bucket{method=\"GET\",path=\"/ping\",le=\"+Inf\"} 2
http_request_duration_seconds_sum{method=\"GET\",path=\"/ping\"} 1
http_request_duration_seconds_count{method=\"GET\",path=\"/ping\"} 2
";
    assert_eq!(out, expected);
}

#[test]
fn unlabeled_histogram_has_no_empty_braces() {
    let reg = Registry::new();
    let h = reg.register_histogram("job_seconds", "j", &[2.5], []).unwrap();
    h.observe([], 1.0);

    let out = reg.render();
    assert!(out.contains("job_seconds_bucket{le=\"2.5\"} 1\n"));
    assert!(out.contains("job_seconds_sum 1\n"));
    assert!(out.contains("job_seconds_count 1\n"));
    assert!(!out.contains("{}"));
}

#[test]
fn families_sorted_by_name_and_series_by_labels() {
    let reg = Registry::new();
    let z = reg.register_counter("zz_total", "z", ["k"]).unwrap();
    reg.register_gauge("aa", "a").unwrap();

    z.increment(["b"]);
    z.increment(["a"]);

    let out = reg.render();
    let aa = out.find("# HELP aa").unwrap();
    let zz = out.find("# HELP zz_total").unwrap();
    assert!(aa < zz);

    let a = out.find("zz_total{k=\"a\"}").unwrap();
    let b = out.find("zz_total{k=\"b\"}").unwrap();
    assert!(a < b);
}

#[test]
fn escaping() {
    let reg = Registry::new();
    let c = reg
        .register_counter("esc_total", "line one\nback\\slash \"quoted\"", ["path"])
        .unwrap();
    c.increment(["/a\"b\\c\nd"]);

    let out = reg.render();
    assert!(out.contains("# HELP esc_total line one\\nback\\\\slash \"quoted\"\n"));
    assert!(out.contains("esc_total{path=\"/a\\\"b\\\\c\\nd\"} 1\n"));
}

#[test]
fn non_finite_gauge_values() {
    let reg = Registry::new();
    let g = reg.register_gauge("g", "g").unwrap();

    g.set(f64::INFINITY);
    assert!(reg.render().contains("\ng +Inf\n"));
    g.set(f64::NEG_INFINITY);
    assert!(reg.render().contains("\ng -Inf\n"));
    g.set(f64::NAN);
    assert!(reg.render().contains("\ng NaN\n"));
    g.set(0.25);
    assert!(reg.render().contains("\ng 0.25\n"));
}

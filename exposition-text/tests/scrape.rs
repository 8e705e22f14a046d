use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use exposition::{
    Buckets, Collector, CounterFamily, CounterMetric, GaugeFamily, HistogramFamily, Registry,
    Snapshot,
};
use exposition_text::{Serializer, TextSerializer};
use rand::Rng;

#[test]
fn test_full_scrape() {
    let registry = Registry::new();

    let requests = Arc::new(
        CounterFamily::new("http_requests_total", "Total HTTP requests.", ["method", "code"])
            .expect("family should be valid"),
    );
    let in_flight = Arc::new(
        GaugeFamily::new("http_in_flight", "Requests being served.", ["method"])
            .expect("family should be valid"),
    );
    let latency = Arc::new(
        HistogramFamily::with_options(
            "http_latency_seconds",
            "Request latency.",
            ["method"],
            Buckets::new(&[0.1, 1.0]).expect("bounds are valid"),
        )
        .expect("family should be valid"),
    );

    assert!(registry.register(Arc::clone(&requests)));
    assert!(registry.register(Arc::clone(&in_flight)));
    assert!(registry.register(Arc::clone(&latency)));

    requests.labels([("method", "POST"), ("code", "500")]).unwrap().increment();
    requests.labels([("code", "200"), ("method", "GET")]).unwrap().add(3.0);
    in_flight.labels_with([("method", "GET")], 2.0).unwrap().decrement();
    let get_latency = latency.labels([("method", "GET")]).unwrap();
    get_latency.observe(0.05);
    get_latency.observe(0.5);

    let output = TextSerializer::new().render(&registry);
    let expected = "\
# HELP http_requests_total Total HTTP requests.
# TYPE http_requests_total counter
http_requests_total{code=\"200\",method=\"GET\"} 3
http_requests_total{code=\"500\",method=\"POST\"} 1
# HELP http_in_flight Requests being served.
# TYPE http_in_flight gauge
http_in_flight{method=\"GET\"} 1
# HELP http_latency_seconds Request latency.
# TYPE http_latency_seconds histogram
http_latency_seconds{method=\"GET\",le=\"0.1\"} 1
http_latency_seconds{method=\"GET\",le=\"1\"} 2
http_latency_seconds{method=\"GET\",le=\"+Inf\"} 2
";
    assert_eq!(output, expected);
}

#[test]
fn test_family_without_members_writes_only_headers() {
    let registry = Registry::new();
    let family = CounterFamily::new("idle", "Never used.", ["l"]).expect("family should be valid");
    registry.register(Arc::new(family));

    let output = TextSerializer::new().render(&registry);
    assert_eq!(output, "# HELP idle Never used.\n# TYPE idle counter\n");
}

#[test]
fn test_concurrent_updates_during_scrapes() {
    const WRITERS: usize = 4;
    const ITERATIONS: usize = 50_000;

    let registry = Arc::new(Registry::new());
    let family = Arc::new(
        CounterFamily::new("jobs_total", "Jobs processed.", ["worker"])
            .expect("family should be valid"),
    );
    registry.register(Arc::clone(&family));

    let done = Arc::new(AtomicBool::new(false));

    // Keep registering and unregistering unrelated metrics while scraping.
    let churn = {
        let registry = Arc::clone(&registry);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut rng = rand::rng();
            while !done.load(Ordering::Relaxed) {
                let name = format!("ephemeral_{}", rng.random_range(0..8));
                let metric = CounterMetric::new(name.clone(), "").expect("name is valid");
                if !registry.register(Arc::new(metric)) {
                    registry.unregister(&name);
                }
            }
        })
    };

    let scraper = {
        let registry = Arc::clone(&registry);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let serializer = TextSerializer::new();
            let mut scrapes = 0;
            loop {
                let mut snapshot = Snapshot::new();
                registry.collect(&mut snapshot);
                let output = serializer.serialize(&snapshot);
                assert!(output.contains("# TYPE jobs_total counter\n"));
                scrapes += 1;

                if done.load(Ordering::Relaxed) {
                    break scrapes;
                }
            }
        })
    };

    let writers = (0..WRITERS)
        .map(|i| {
            let family = Arc::clone(&family);
            thread::spawn(move || {
                let worker = i.to_string();
                for _ in 0..ITERATIONS {
                    family.labels([("worker", worker.clone())]).unwrap().increment();
                }
            })
        })
        .collect::<Vec<_>>();

    for writer in writers {
        writer.join().expect("writer thread panicked");
    }
    done.store(true, Ordering::SeqCst);
    churn.join().expect("churn thread panicked");
    let scrapes = scraper.join().expect("scraper thread panicked");
    assert!(scrapes > 0);

    assert_eq!(family.len(), WRITERS);
    let output = TextSerializer::new().render(&*registry);
    for i in 0..WRITERS {
        let line = format!("jobs_total{{worker=\"{}\"}} {}\n", i, ITERATIONS);
        assert!(output.contains(&line), "missing {:?} in {}", line, output);
    }
}


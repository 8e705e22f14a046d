use exposition::{CounterFamily, GaugeMetric, HistogramFamily, Registry};
use exposition_text::TextSerializer;
use getopts::Options;
use hdrhistogram::Histogram as HdrHistogram;
use log::{error, info};
use portable_atomic::AtomicU64;
use quanta::Clock;
use std::{
    env,
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

const LOOP_SAMPLE: u64 = 1000;

/// How producers reach their series.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Mode {
    /// Resolve the labeled series once and keep the handles.
    Cached,
    /// Resolve the labeled series through the family on every iteration.
    Lookup,
}

/// The metrics every producer writes to.
struct Instruments {
    operations: Arc<CounterFamily>,
    depth: Arc<GaugeMetric>,
    latency: Arc<HistogramFamily>,
}

impl Instruments {
    fn register(registry: &Registry) -> Result<Instruments, exposition::Error> {
        let instruments = Instruments {
            operations: Arc::new(CounterFamily::new(
                "benchmark_operations_total",
                "Operations performed by producers.",
                ["producer"],
            )?),
            depth: Arc::new(GaugeMetric::new("benchmark_depth", "Most recent loop depth.")?),
            latency: Arc::new(HistogramFamily::new(
                "benchmark_loop_seconds",
                "Time between producer loop iterations.",
                ["producer"],
            )?),
        };

        registry.register(Arc::clone(&instruments.operations));
        registry.register(Arc::clone(&instruments.depth));
        registry.register(Arc::clone(&instruments.latency));

        Ok(instruments)
    }
}

struct Generator {
    id: String,
    instruments: Arc<Instruments>,
    depth: i64,
    hist: HdrHistogram<u64>,
    done: Arc<AtomicBool>,
    rate_counter: Arc<AtomicU64>,
}

impl Generator {
    fn new(
        id: usize,
        instruments: Arc<Instruments>,
        done: Arc<AtomicBool>,
        rate_counter: Arc<AtomicU64>,
    ) -> Generator {
        Generator {
            id: id.to_string(),
            instruments,
            depth: 0,
            hist: HdrHistogram::<u64>::new(3).expect("3 significant figures is a valid precision"),
            done,
            rate_counter,
        }
    }

    fn run(&mut self, mode: Mode) -> Result<(), exposition::Error> {
        let clock = Clock::new();
        let labels = [("producer", self.id.clone())];

        let mut cached = None;
        if mode == Mode::Cached {
            cached = Some((
                self.instruments.operations.labels(labels.clone())?,
                self.instruments.latency.labels(labels.clone())?,
            ));
        }

        let mut loop_counter = 0;
        let mut t0 = clock.now();
        loop {
            loop_counter += 1;
            self.depth += 1;

            let t1 = clock.now();
            let start = if loop_counter % LOOP_SAMPLE == 0 { Some(clock.now()) } else { None };

            let elapsed = t1.duration_since(t0).as_secs_f64();
            match cached {
                Some((ref operations, ref latency)) => {
                    operations.increment();
                    latency.observe(elapsed);
                }
                None => {
                    self.instruments.operations.labels(labels.clone())?.increment();
                    self.instruments.latency.labels(labels.clone())?.observe(elapsed);
                }
            }
            self.instruments.depth.set(self.depth as f64);

            if let Some(val) = start {
                let delta = clock.now() - val;
                self.hist.saturating_record(delta.as_nanos() as u64);

                // We also increment our global counter for the sample rate here.
                self.rate_counter.fetch_add(LOOP_SAMPLE * 3, Ordering::AcqRel);

                if self.done.load(Ordering::Relaxed) {
                    break;
                }
            }

            t0 = t1;
        }

        Ok(())
    }
}

impl Drop for Generator {
    fn drop(&mut self) {
        info!(
            "    sender latency: min: {:8} p50: {:8} p95: {:8} p99: {:8} p999: {:8} max: {:8}",
            nanos_to_readable(self.hist.min()),
            nanos_to_readable(self.hist.value_at_percentile(50.0)),
            nanos_to_readable(self.hist.value_at_percentile(95.0)),
            nanos_to_readable(self.hist.value_at_percentile(99.0)),
            nanos_to_readable(self.hist.value_at_percentile(99.9)),
            nanos_to_readable(self.hist.max())
        );
    }
}

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

pub fn opts() -> Options {
    let mut opts = Options::new();

    opts.optopt("d", "duration", "number of seconds to run the benchmark", "INTEGER");
    opts.optopt(
        "m",
        "mode",
        "whether producers hold their series handles (cached) or resolve them every time (lookup)",
        "STRING",
    );
    opts.optopt("p", "producers", "number of producers", "INTEGER");
    opts.optflag("h", "help", "print this help menu");

    opts
}

fn parse_opt<T: std::str::FromStr>(matches: &getopts::Matches, name: &str, default: T) -> T {
    match matches.opt_str(name) {
        None => default,
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                error!("Invalid value for --{}: {}", name, raw);
                process::exit(1);
            }
        },
    }
}

fn main() {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = &args[0];
    let opts = opts();

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            error!("Failed to parse command line args: {}", f);
            return;
        }
    };

    if matches.opt_present("help") {
        print_usage(program, &opts);
        return;
    }

    info!("exposition benchmark");

    let seconds: u64 = parse_opt(&matches, "duration", 60);
    let producers: usize = parse_opt(&matches, "producers", 1);
    let mode = match matches.opt_str("mode").map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("lookup") => Mode::Lookup,
        _ => Mode::Cached,
    };

    info!("duration: {}s", seconds);
    info!("producers: {}", producers);
    info!("mode: {:?}", mode);

    let registry = Registry::new();
    let instruments = match Instruments::register(&registry) {
        Ok(instruments) => Arc::new(instruments),
        Err(e) => {
            error!("Failed to register metrics: {}", e);
            return;
        }
    };

    info!("registry configured");

    // Spin up our sample producers.
    let done = Arc::new(AtomicBool::new(false));
    let rate_counter = Arc::new(AtomicU64::new(0));
    let mut handles = Vec::new();

    for id in 0..producers {
        let d = done.clone();
        let r = rate_counter.clone();
        let instruments = instruments.clone();
        let handle = thread::spawn(move || {
            let mut gen = Generator::new(id, instruments, d, r);
            if let Err(e) = gen.run(mode) {
                error!("producer {} failed: {}", id, e);
            }
        });

        handles.push(handle);
    }

    // Render the registry once a second, as a scraper would, and track the sample rate.
    let serializer = TextSerializer::new();
    let mut total = 0;
    let mut t0 = Instant::now();

    let mut render_hist =
        HdrHistogram::<u64>::new(3).expect("3 significant figures is a valid precision");
    let mut rendered_bytes = 0;
    for _ in 0..seconds {
        let t1 = Instant::now();

        let start = Instant::now();
        let output = serializer.render(&registry);
        let end = Instant::now();
        render_hist.saturating_record(duration_as_nanos(end - start) as u64);
        rendered_bytes = output.len();

        let turn_total = rate_counter.load(Ordering::Acquire);
        let turn_delta = turn_total - total;
        total = turn_total;
        let rate = turn_delta as f64 / (duration_as_nanos(t1 - t0) / 1_000_000_000.0);

        info!("sample ingest rate: {:.0} samples/sec", rate);
        t0 = t1;
        thread::sleep(Duration::new(1, 0));
    }

    info!("--------------------------------------------------------------------------------");
    info!(" ingested samples total: {}", total);
    info!(" last scrape size: {} bytes", rendered_bytes);
    info!(
        "   registry render: min: {:8} p50: {:8} p95: {:8} p99: {:8} p999: {:8} max: {:8}",
        nanos_to_readable(render_hist.min()),
        nanos_to_readable(render_hist.value_at_percentile(50.0)),
        nanos_to_readable(render_hist.value_at_percentile(95.0)),
        nanos_to_readable(render_hist.value_at_percentile(99.0)),
        nanos_to_readable(render_hist.value_at_percentile(99.9)),
        nanos_to_readable(render_hist.max())
    );

    // Wait for the producers to finish so we can get their stats too.
    done.store(true, Ordering::SeqCst);
    for handle in handles {
        let _ = handle.join();
    }
}

fn duration_as_nanos(d: Duration) -> f64 {
    (d.as_secs() as f64 * 1e9) + d.subsec_nanos() as f64
}

fn nanos_to_readable(t: u64) -> String {
    let f = t as f64;
    if f < 1_000.0 {
        format!("{}ns", f)
    } else if f < 1_000_000.0 {
        format!("{:.0}μs", f / 1_000.0)
    } else if f < 2_000_000_000.0 {
        format!("{:.2}ms", f / 1_000_000.0)
    } else {
        format!("{:.3}s", f / 1_000_000_000.0)
    }
}

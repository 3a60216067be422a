//! limq-bench CLI: measures push/pull throughput of the bounded queue.

use std::time::Duration;

use clap::Parser;
use limq_bench::{bench, push_pull_round, BenchError};
use limq_core::config::{QueueConfig, CAPACITY_ENV};

/// Capacity the benchmark uses unless one is given.
const DEFAULT_BENCH_CAPACITY: usize = 100;

#[derive(Parser)]
#[command(name = "limq-bench")]
#[command(about = "Push/pull micro-benchmark for the limq bounded queue", long_about = None)]
struct Cli {
    /// Items pushed and pulled per iteration
    #[arg(long, default_value_t = 1000)]
    items: usize,

    /// Queue capacity (overrides LIMQ_CAPACITY; defaults to 100)
    #[arg(long)]
    capacity: Option<usize>,

    /// Measured period in milliseconds
    #[arg(long, default_value_t = 3000)]
    time_ms: u64,

    /// Warm-up period in milliseconds
    #[arg(long, default_value_t = 1000)]
    warmup_ms: u64,

    /// Print only the JSON result line
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    if !cli.json {
        init_tracing();
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        for hint in queue_hints(&e) {
            eprintln!("  hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), BenchError> {
    let cfg = resolve_config(cli.capacity)?;
    let items = cli.items;
    let capacity = cfg.capacity;
    let name = format!("{} push/pull on queue size {}", items, capacity);

    // Single-threaded cooperative scheduling, like the queue's intended host.
    let rt = tokio::runtime::Builder::new_current_thread().build()?;
    let result = rt.block_on(bench(
        &name,
        Duration::from_millis(cli.time_ms),
        Duration::from_millis(cli.warmup_ms),
        || push_pull_round(items, capacity),
    ))?;

    let json = serde_json::to_string(&result)?;
    if cli.json {
        println!("{}", json);
    } else {
        println!("{}: result: {}", name, json);
    }
    Ok(())
}

fn resolve_config(capacity: Option<usize>) -> Result<QueueConfig, BenchError> {
    let cfg = match capacity {
        Some(cap) => QueueConfig::with_capacity(cap),
        None if std::env::var_os(CAPACITY_ENV).is_some() => QueueConfig::from_env()?,
        None => QueueConfig::with_capacity(DEFAULT_BENCH_CAPACITY),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn queue_hints(e: &BenchError) -> Vec<String> {
    match e {
        BenchError::Queue(err) => err.suggestions(),
        _ => vec![],
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

//! Market-data demo: run the synthetic generator for a few seconds, drain
//! the feed, and report throughput plus hand-off latency percentiles.

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;

use fen_bins::common::{self, CommonArgs};
use fen_core::market::MarketFeed;
use fen_core::perf::PerformanceMonitor;
use fen_core::{SimulatedMarketDataFeed, Symbol, WorkerPool};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// How long to consume ticks
    #[arg(short, long, default_value = "5")]
    seconds: u64,

    /// Simulator volatility
    #[arg(long, default_value = "0.001")]
    volatility: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    common::init_logging(&args.common.log_level)?;
    common::setup_performance(args.common.cpu_core, args.common.realtime)?;

    let mut feed = SimulatedMarketDataFeed::new();
    feed.set_initial_price("AAPL", 150.0)?;
    feed.set_initial_price("GOOGL", 2500.0)?;
    feed.set_initial_price("MSFT", 300.0)?;
    feed.set_volatility(args.volatility);

    feed.subscribe(Symbol::new("AAPL"));
    feed.subscribe(Symbol::new("GOOGL"));
    feed.subscribe(Symbol::new("MSFT"));

    let monitor = PerformanceMonitor::new();
    monitor.start_monitoring();

    tracing::info!("starting market-data simulation");
    feed.start_simulation();

    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    let mut tick_count = 0u64;

    while Instant::now() < deadline {
        let popped_at = Instant::now();
        match feed.get_tick() {
            Some(tick) => {
                tick_count += 1;
                monitor.record_latency(popped_at.duration_since(tick.timestamp));
                monitor.record_operation(std::mem::size_of_val(&tick) as u64);

                if tick_count % 1_000 == 0 {
                    tracing::info!(
                        tick = tick_count,
                        symbol = %tick.symbol,
                        bid = tick.bid_price,
                        ask = tick.ask_price,
                        "progress"
                    );
                }
            }
            None => std::thread::sleep(Duration::from_micros(100)),
        }
    }

    feed.stop_simulation();

    let generated = feed.simulator().throughput_stats();
    let consumed = monitor.throughput_stats();
    let latency = monitor.latency_stats();

    tracing::info!("=== Generator ===");
    tracing::info!(
        total = generated.total_messages,
        per_second = generated.messages_per_second,
        dropped = feed.simulator().dropped_ticks(),
        "tick generation"
    );
    tracing::info!("=== Consumer ===");
    tracing::info!(
        total = consumed.total_messages,
        per_second = consumed.messages_per_second,
        bytes_per_second = consumed.bytes_per_second,
        "tick consumption"
    );
    tracing::info!(
        min_us = latency.min.as_micros() as u64,
        mean_us = latency.mean.as_micros() as u64,
        p99_us = latency.p99.as_micros() as u64,
        max_us = latency.max.as_micros() as u64,
        samples = latency.count,
        "generate-to-consume latency"
    );

    // Worker pool demo: fan ten tasks across four threads.
    tracing::info!("=== Worker pool ===");
    let pool = WorkerPool::new(4);
    for i in 0..10 {
        pool.submit(move || {
            tracing::info!(task = i, thread = ?std::thread::current().id(), "task running");
            std::thread::sleep(Duration::from_millis(100));
        });
    }
    std::thread::sleep(Duration::from_secs(1));

    tracing::info!("demo complete");
    Ok(())
}

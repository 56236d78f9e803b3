use clap::Parser;
use hdrhistogram::Histogram;
use rand::seq::SliceRandom;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of concurrent clients
    #[arg(short, long, default_value = "1")]
    concurrency: usize,

    /// INTERVAL ms
    #[arg(short, long, default_value = "100")]
    interval: u64,

    /// Duration of the benchmark in seconds
    #[arg(short, long, default_value = "30")]
    duration: u64,

    /// Server address
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    server: String,

    /// Webhook API key
    #[arg(short, long, default_value = "dev-api-key")]
    api_key: String,
}

const EQUIPMENT_TYPES: &[&str] = &["Dry Van", "Flatbed", "Reefer", "Power Only"];
const CITIES: &[&str] = &[
    "Chicago", "Dallas", "Atlanta", "Miami", "Seattle", "Portland", "Phoenix", "Denver",
];
const DATES: &[&str] = &["2025-09-10", "2025-09-15", "2025-09-20"];

fn search_payload() -> serde_json::Value {
    let mut rng = rand::thread_rng();
    json!({
        "equipment_type": EQUIPMENT_TYPES.choose(&mut rng),
        "origin": CITIES.choose(&mut rng),
        "destination": CITIES.choose(&mut rng),
        "weight_capacity": 25000 + (rand::random::<u32>() % 4) * 5000,
        "available_dates": [DATES.choose(&mut rng)],
        "conversation_id": format!("bench-{}", rand::random::<u64>() % 1000),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let url = format!(
        "{}/webhook/carrier/load_search",
        args.server.trim_end_matches('/')
    );
    let histogram = Arc::new(Mutex::new(Histogram::<u64>::new(3).unwrap()));
    let total_requests = Arc::new(Mutex::new(0u64));

    println!(
        "Starting benchmark with {} concurrent clients, target INTERVAL: {}",
        args.concurrency, args.interval
    );

    // Spawn client tasks
    let mut handles = vec![];
    for _ in 0..args.concurrency {
        let url = url.clone();
        let api_key = args.api_key.clone();
        let histogram = histogram.clone();
        let total_requests = total_requests.clone();
        let interval = args.interval;

        let handle = tokio::spawn(async move {
            let client = reqwest::Client::new();

            loop {
                let start = Instant::now();

                let request = client
                    .post(&url)
                    .header("x-api-key", &api_key)
                    .json(&search_payload())
                    .send();

                match request.await.and_then(|r| r.error_for_status()) {
                    Ok(_) => {
                        let duration = start.elapsed();
                        let mut hist = histogram.lock().await;
                        hist.record(duration.as_micros() as u64).unwrap();
                        let mut total = total_requests.lock().await;
                        *total += 1;
                    }
                    Err(e) => eprintln!("Request failed: {}", e),
                }

                tokio::time::sleep(Duration::from_millis(interval)).await;
            }
        });

        handles.push(handle);
    }

    // Run for specified duration
    sleep(Duration::from_secs(args.duration)).await;

    // Cancel all tasks
    for handle in handles {
        handle.abort();
    }

    // Print statistics
    let total = *total_requests.lock().await;
    let hist = histogram.lock().await;

    println!("\nBenchmark Results:");
    println!("Total Requests: {}", total);
    println!("Average TPS: {:.2}", total as f64 / args.duration as f64);
    println!("\nLatency Distribution (microseconds):");
    println!("p50: {}", hist.value_at_percentile(50.0));
    println!("p90: {}", hist.value_at_percentile(90.0));
    println!("p95: {}", hist.value_at_percentile(95.0));
    println!("p99: {}", hist.value_at_percentile(99.0));
    println!("p99.9: {}", hist.value_at_percentile(99.9));

    Ok(())
}

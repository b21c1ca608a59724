use bitsift::BloomFilter;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn fast_random(seed: &mut u64) -> u64 {
    *seed ^= *seed << 13;
    *seed ^= *seed >> 7;
    *seed ^= *seed << 17;
    *seed
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bitsift=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let num_items: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(1_000_000);
    let rate: f64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0.01);

    println!("Bitsift Benchmark");
    println!("=================");
    println!("Items:            {}", num_items);
    println!("Target FP rate:   {}", rate);

    let mut filter = BloomFilter::with_capacity(num_items, rate)?;
    println!("Bits:             {}", filter.num_bits());
    println!("Hashes:           {}", filter.num_hashes());
    println!(
        "Memory:           {:.1} KiB",
        filter.memory_bytes() as f64 / 1024.0
    );
    println!();

    let mut seed: u64 = 12345;

    let keys: Vec<[u8; 8]> = (0..num_items)
        .map(|_| fast_random(&mut seed).to_le_bytes())
        .collect();

    let start = Instant::now();
    for key in &keys {
        filter.add(key);
    }
    let insert_time = start.elapsed();
    println!(
        "Insert:           {:.0} ops/sec ({:?} total)",
        num_items as f64 / insert_time.as_secs_f64(),
        insert_time
    );

    let start = Instant::now();
    let mut present = 0usize;
    for key in &keys {
        if filter.might_contain(key) {
            present += 1;
        }
    }
    let hit_time = start.elapsed();
    println!(
        "Query (present):  {:.0} ops/sec, {}/{} found",
        num_items as f64 / hit_time.as_secs_f64(),
        present,
        num_items
    );

    // The xorshift sequence has full period, so continuing it yields keys
    // disjoint from everything inserted above.
    let start = Instant::now();
    let mut false_positives = 0usize;
    for _ in 0..num_items {
        if filter.might_contain(&fast_random(&mut seed).to_le_bytes()) {
            false_positives += 1;
        }
    }
    let miss_time = start.elapsed();
    println!(
        "Query (absent):   {:.0} ops/sec",
        num_items as f64 / miss_time.as_secs_f64()
    );
    println!();

    println!("Bits set:         {}", filter.bits_set());
    println!(
        "Observed FP rate: {:.4}%",
        false_positives as f64 / num_items as f64 * 100.0
    );
    println!(
        "Estimated (fill): {:.4}%",
        filter.estimated_false_positive_rate() * 100.0
    );

    Ok(())
}

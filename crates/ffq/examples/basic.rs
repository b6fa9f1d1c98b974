use ffq::{FfqHandle, LocalGroup};
use std::thread;
use std::time::Instant;

fn main() {
    println!("FFQ Basic Example");
    println!("=================\n");

    const N: usize = 1024;
    const N_CONSUMERS: usize = 3;
    const ITEMS: u64 = 999_999;

    println!("Configuration:");
    println!("  Capacity: {N}");
    println!("  Consumers: {N_CONSUMERS}");
    println!("  Items: {ITEMS}\n");

    let group = LocalGroup::<u64>::solo();
    let handle = FfqHandle::open(N, &group).unwrap();

    let start = Instant::now();

    thread::scope(|scope| {
        for id in 0..N_CONSUMERS {
            let mut consumer = handle.consumer(id);
            scope.spawn(move || {
                let mut count = 0u64;
                let mut sum = 0u64;
                while count < ITEMS / N_CONSUMERS as u64 {
                    if let Ok(v) = consumer.dequeue() {
                        sum += v;
                        count += 1;
                    }
                }
                println!("Consumer {id} finished: {count} items, sum {sum}");
            });
        }

        let mut producer = handle.producer().unwrap();
        for i in 0..ITEMS {
            producer.enqueue(i);
        }
        println!("Producer finished");
    });

    let duration = start.elapsed();
    println!("\nResults:");
    println!("  Duration: {duration:.2?}");
    println!(
        "  Throughput: {:.2} million items/sec",
        ITEMS as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}

use ffq::{Config, FfqHandle, LocalGroup};
use ffq_demo::AqiReading;
use std::thread;

fn main() {
    println!("FFQ Demo: AQI Readings");
    println!("======================\n");

    const N: usize = 16;
    const N_CONSUMERS: usize = 2;
    const N_READINGS: i32 = 200;

    let config = Config::new(N).unwrap().with_metrics(true);
    let group = LocalGroup::<AqiReading>::solo();
    let handle = FfqHandle::open_with_config(config, &group).unwrap();

    thread::scope(|scope| {
        for id in 0..N_CONSUMERS {
            let mut consumer = handle.consumer(id);
            scope.spawn(move || {
                let mut received = 0u32;
                loop {
                    match consumer.dequeue() {
                        Ok(reading) if !reading.valid => {
                            println!("Consumer {id} observed sentinel, stopping");
                            break;
                        }
                        Ok(reading) => {
                            received += 1;
                            if received % 50 == 0 {
                                println!("Consumer {id}: {reading}");
                            }
                        }
                        Err(err) => {
                            eprintln!("Consumer {id} dequeue error: {err}");
                            break;
                        }
                    }
                }
                println!("Consumer {id} finished, received {received} readings");
            });
        }

        let mut producer = handle.producer().unwrap();
        for i in 0..N_READINGS {
            let reading = AqiReading::new(
                "2026-07-26T00:00:00Z",
                "Boston",
                i % 300,
                "clear",
                4.5,
                55 + (i % 10),
            );
            producer.enqueue(reading);
        }
        for _ in 0..N_CONSUMERS {
            producer.enqueue(AqiReading::sentinel());
        }
        println!("Producer finished, emitted {N_READINGS} readings plus sentinels");
    });

    let metrics = handle.metrics();
    println!("\nMetrics: {metrics:?}");
}

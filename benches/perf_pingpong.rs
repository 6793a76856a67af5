//! Ping-pong latency benchmark for axon-queue.
//!
//! Measures round-trip latency with exactly one message in flight.
//!
//! Run: cargo build --release --bench perf_pingpong
//! Profile: sudo taskset -c 0,2 ./target/release/deps/perf_pingpong-*

use std::thread;
use std::time::Instant;

use axon_queue::spsc;

const WARMUP: u64 = 10_000;
const SAMPLES: usize = 100_000;
const CAPACITY: usize = 64;

fn main() {
    let (mut tx_fwd, mut rx_fwd) = spsc::ring_buffer::<u64>(CAPACITY);
    let (mut tx_ret, mut rx_ret) = spsc::ring_buffer::<u64>(CAPACITY);

    let total = WARMUP + SAMPLES as u64;

    // Consumer thread: receive and echo back
    let consumer = thread::spawn(move || {
        for _ in 0..total {
            let val = loop {
                if let Some(v) = rx_fwd.pop() {
                    break v;
                }
                std::hint::spin_loop();
            };
            while tx_ret.push(val).is_err() {
                std::hint::spin_loop();
            }
        }
    });

    let mut samples = Vec::with_capacity(SAMPLES);

    for i in 0..total {
        let start = Instant::now();

        while tx_fwd.push(i).is_err() {
            std::hint::spin_loop();
        }
        loop {
            if let Some(v) = rx_ret.pop() {
                assert_eq!(v, i);
                break;
            }
            std::hint::spin_loop();
        }

        if i >= WARMUP {
            samples.push(start.elapsed().as_nanos() as u64);
        }
    }

    consumer.join().unwrap();

    samples.sort_unstable();
    let pct = |p: f64| samples[((samples.len() as f64 * p) as usize).min(samples.len() - 1)];

    println!("axon_spsc ping-pong round-trip ({SAMPLES} samples):");
    println!("  p50:  {} ns", pct(0.50));
    println!("  p99:  {} ns", pct(0.99));
    println!("  p999: {} ns", pct(0.999));
    println!("  max:  {} ns", samples[samples.len() - 1]);
}

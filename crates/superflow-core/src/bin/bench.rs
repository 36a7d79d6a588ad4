/// Pure Rust core benchmarks for the cross-section solver.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for flow
/// rates, and std::hint::black_box to prevent dead-code elimination.
use std::hint::black_box;
use std::time::{Duration, Instant};

use superflow_core::rating::rating_curve;
use superflow_core::solver::solve;
use superflow_core::{Geometry, HydraulicParameters, RegimeTable};

const REPEATS: usize = 7;

/// Simple LCG PRNG for deterministic flow rates in `[0, capacity]`.
fn make_flow_rates(n: usize, capacity: f64, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };
    (0..n).map(|_| next_f64() * capacity).collect()
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn geometries() -> [(&'static str, Geometry); 2] {
    let asymmetric = Geometry {
        right_summer_height: 4.0,
        left_winter_height: 5.0,
        right_winter_height: 5.0,
        ..Geometry::default()
    };
    [("symmetric", Geometry::default()), ("asymmetric", asymmetric)]
}

fn bench_build() -> Vec<(&'static str, &'static str, usize, Duration)> {
    let params = HydraulicParameters::default();
    let n = 10_000;
    let mut results = Vec::new();

    for (name, g) in geometries() {
        let dur = median_time(|| {
            for _ in 0..n {
                black_box(RegimeTable::build(black_box(&g), &params).ok());
            }
        });
        results.push(("build", name, n, dur));
    }
    results
}

fn bench_solve(sizes: &[usize]) -> Vec<(&'static str, &'static str, usize, Duration)> {
    let params = HydraulicParameters::default();
    let mut results = Vec::new();

    for (name, g) in geometries() {
        let Ok(table) = RegimeTable::build(&g, &params) else {
            continue;
        };
        for &n in sizes {
            let flows = make_flow_rates(n, table.capacity(), 42);

            // Warmup
            black_box(rating_curve(&table, &flows));

            let dur = median_time(|| {
                for &q in &flows {
                    black_box(solve(&table, q).ok());
                }
            });
            results.push(("solve", name, n, dur));
        }
    }
    results
}

fn main() {
    println!("Pure Rust Core Benchmarks");
    println!("============================================================");
    println!("{:<8} {:<12} {:>7}   {:>12}", "Op", "Geometry", "N", "Median (ms)");
    println!("--------------------------------------------");

    let mut all_results = bench_build();
    all_results.extend(bench_solve(&[1_000, 10_000]));

    for (op, geometry, n, dur) in &all_results {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<8} {:<12} {:>7}      {:>8.2}", op, geometry, n, ms);
    }

    println!("============================================================");
}

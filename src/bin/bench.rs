//! Benchmark for a full assignment run.
//!
//! Run with: cargo run --release --bin bench

use chrono::NaiveDate;
use nurse_scheduling::assignment::build_week;
use nurse_scheduling::catalog::RequirementCatalog;
use nurse_scheduling::demo_data;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

const RUNS: u32 = 1_000;

fn main() {
    let nurses = demo_data::generate(demo_data::DemoData::Large);
    let catalog = RequirementCatalog::default_week();
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    println!("Benchmark: Week Assignment");
    println!("  Nurses: {}", nurses.len());
    println!("  Requirements: {}", catalog.requirements().len());
    println!();

    let mut rng = StdRng::seed_from_u64(0);
    let bench_start = Instant::now();
    let mut total_shifts = 0usize;
    let mut last = None;

    for _ in 0..RUNS {
        let plan = build_week(&nurses, catalog.requirements(), today, &mut rng);
        total_shifts += plan.shifts.len();
        last = Some(plan);
    }

    let elapsed = bench_start.elapsed();
    let runs_per_sec = RUNS as f64 / elapsed.as_secs_f64();

    println!("Results:");
    println!("  Runs: {}", RUNS);
    println!("  Time: {:.2?}", elapsed);
    println!("  Runs/sec: {:.0}", runs_per_sec);
    println!("  Shifts/run: {:.1}", total_shifts as f64 / RUNS as f64);

    if let Some(plan) = last {
        let missing: u32 = plan.unfilled.iter().map(|s| s.missing).sum();
        println!("  Unfilled slots (last run): {}", missing);
    }
}

//! Range-sum workload: uncached scan vs RangeSumCache

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use memocache::CachedSequence;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seqstore::{parse_script, render_script, Op, Sequence};
use serde::Serialize;
use tracing::{debug, info};

use crate::report::speedup;

/// Options for the `range` subcommand
#[derive(clap::Args, Debug)]
pub struct RangeArgs {
    /// Sequence length
    #[arg(short = 'n', long, default_value_t = 100_000)]
    pub size: usize,

    /// Number of generated operations
    #[arg(short, long, default_value_t = 50_000)]
    pub queries: usize,

    /// Range cache capacity (number of intervals)
    #[arg(short, long, default_value_t = 1000)]
    pub capacity: usize,

    /// RNG seed for a reproducible workload
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Load operations from a script instead of generating them
    #[arg(short, long)]
    pub workload: Option<PathBuf>,

    /// Write the operations that were run to a script
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Initial sequence plus the operations to run against it
#[derive(Debug, Clone)]
pub struct Workload {
    pub values: Vec<i64>,
    pub ops: Vec<Op>,
}

/// Timings and cache counters for one run
#[derive(Debug, Serialize)]
pub struct RangeReport {
    pub size: usize,
    pub ops: usize,
    pub capacity: usize,
    pub uncached_secs: f64,
    pub cached_secs: f64,
    pub speedup: f64,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub invalidations: u64,
    pub hit_ratio: f64,
}

/// Random values in 1..=100 with an even mix of range reads and updates
pub fn generate<R: Rng>(rng: &mut R, size: usize, queries: usize) -> Workload {
    let values = (0..size).map(|_| rng.gen_range(1..=100)).collect();

    let ops = if size == 0 {
        Vec::new()
    } else {
        (0..queries)
            .map(|_| {
                if rng.gen_bool(0.5) {
                    let l = rng.gen_range(0..size);
                    let r = rng.gen_range(l..size);
                    Op::Range { l, r }
                } else {
                    Op::Update {
                        index: rng.gen_range(0..size),
                        value: rng.gen_range(1..=100),
                    }
                }
            })
            .collect()
    };

    Workload { values, ops }
}

/// Run `ops` directly on the sequence; returns a checksum of all range results
pub fn run_uncached(sequence: &mut Sequence, ops: &[Op]) -> seqstore::Result<i64> {
    let mut checksum = 0i64;
    for op in ops {
        match *op {
            Op::Range { l, r } => checksum = checksum.wrapping_add(sequence.range_sum(l, r)?),
            Op::Update { index, value } => sequence.write(index, value)?,
        }
    }
    Ok(checksum)
}

/// Run `ops` through the range cache; returns a checksum of all range results
pub fn run_cached(cached: &mut CachedSequence, ops: &[Op]) -> seqstore::Result<i64> {
    let mut checksum = 0i64;
    for op in ops {
        if let Some(sum) = cached.apply(*op)? {
            checksum = checksum.wrapping_add(sum);
        }
    }
    Ok(checksum)
}

fn load_workload(args: &RangeArgs) -> Result<Workload> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match &args.workload {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read workload {}", path.display()))?;
            let ops = parse_script(&text)
                .with_context(|| format!("Failed to parse workload {}", path.display()))?;
            let mut workload = generate(&mut rng, args.size, 0);
            workload.ops = ops;
            Ok(workload)
        }
        None => Ok(generate(&mut rng, args.size, args.queries)),
    }
}

/// Execute the benchmark described by `args`
pub fn run(args: &RangeArgs) -> Result<RangeReport> {
    let workload = load_workload(args)?;
    info!(
        size = workload.values.len(),
        ops = workload.ops.len(),
        capacity = args.capacity,
        "Range workload ready"
    );

    if let Some(path) = &args.dump {
        std::fs::write(path, render_script(&workload.ops))
            .with_context(|| format!("Failed to write workload {}", path.display()))?;
        info!("Workload written to {}", path.display());
    }

    let mut plain = Sequence::new(workload.values.clone());
    let start = Instant::now();
    let uncached_sum = run_uncached(&mut plain, &workload.ops).context("Uncached run failed")?;
    let uncached_secs = start.elapsed().as_secs_f64();
    debug!(uncached_secs, "Uncached run done");

    let mut cached = CachedSequence::new(Sequence::new(workload.values), args.capacity);
    let start = Instant::now();
    let cached_sum = run_cached(&mut cached, &workload.ops).context("Cached run failed")?;
    let cached_secs = start.elapsed().as_secs_f64();
    debug!(cached_secs, "Cached run done");

    ensure!(
        uncached_sum == cached_sum,
        "Cached results diverged: checksum {} vs {}",
        cached_sum,
        uncached_sum
    );

    let stats = cached.stats().snapshot();
    Ok(RangeReport {
        size: plain.len(),
        ops: workload.ops.len(),
        capacity: args.capacity,
        uncached_secs,
        cached_secs,
        speedup: speedup(uncached_secs, cached_secs),
        hits: stats.hits,
        misses: stats.misses,
        inserts: stats.inserts,
        evictions: stats.evictions,
        invalidations: stats.invalidations,
        hit_ratio: stats.hit_ratio(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(size: usize, queries: usize) -> RangeArgs {
        RangeArgs {
            size,
            queries,
            capacity: 16,
            seed: Some(7),
            workload: None,
            dump: None,
            json: false,
        }
    }

    #[test]
    fn test_generate_is_seeded() {
        let a = generate(&mut StdRng::seed_from_u64(42), 50, 200);
        let b = generate(&mut StdRng::seed_from_u64(42), 50, 200);

        assert_eq!(a.values, b.values);
        assert_eq!(a.ops, b.ops);
        assert!(a.values.iter().all(|v| (1..=100).contains(v)));
    }

    #[test]
    fn test_generate_in_bounds() {
        let workload = generate(&mut StdRng::seed_from_u64(1), 10, 500);

        for op in &workload.ops {
            match *op {
                Op::Range { l, r } => assert!(l <= r && r < 10),
                Op::Update { index, value } => {
                    assert!(index < 10);
                    assert!((1..=100).contains(&value));
                }
            }
        }
    }

    #[test]
    fn test_generate_empty_sequence() {
        let workload = generate(&mut StdRng::seed_from_u64(1), 0, 10);
        assert!(workload.values.is_empty());
        assert!(workload.ops.is_empty());
    }

    #[test]
    fn test_paths_agree() {
        let workload = generate(&mut StdRng::seed_from_u64(9), 200, 2000);

        let mut plain = Sequence::new(workload.values.clone());
        let mut cached = CachedSequence::new(Sequence::new(workload.values), 8);

        let expected = run_uncached(&mut plain, &workload.ops).unwrap();
        assert_eq!(run_cached(&mut cached, &workload.ops).unwrap(), expected);
        assert_eq!(cached.sequence(), &plain);
    }

    #[test]
    fn test_run_report() {
        let report = run(&args(100, 1000)).unwrap();

        assert_eq!(report.ops, 1000);
        assert_eq!(report.size, 100);
        assert!(report.hits + report.misses > 0);
        // Every miss computes and stores its sum
        assert_eq!(report.inserts, report.misses);
    }

    #[test]
    fn test_dump_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ops.txt");

        let mut dump_args = args(64, 300);
        dump_args.dump = Some(path.clone());
        let first = run(&dump_args).unwrap();

        let mut load_args = args(64, 0);
        load_args.workload = Some(path);
        let second = run(&load_args).unwrap();

        assert_eq!(second.ops, first.ops);
        assert_eq!(second.hits, first.hits);
        assert_eq!(second.invalidations, first.invalidations);
    }

    #[test]
    fn test_out_of_bounds_workload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "range 0 5\n").unwrap();

        let mut load_args = args(4, 0);
        load_args.workload = Some(path);

        assert!(run(&load_args).is_err());
    }
}

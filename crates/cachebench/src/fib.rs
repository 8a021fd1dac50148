//! Memoized Fibonacci: bounded LRU memo vs splay tree memo

use std::time::Instant;

use anyhow::{ensure, Context, Result};
use memocache::{fibonacci_iter, fibonacci_memo, LruCache, Memo, SplayTree, FIB_MAX_N};
use serde::Serialize;
use tracing::{debug, info};

/// Options for the `fib` subcommand
#[derive(clap::Args, Debug)]
pub struct FibArgs {
    /// Largest n to compute
    #[arg(short, long, default_value_t = 180)]
    pub max: u64,

    /// Distance between measured n values, starting at 0
    #[arg(short, long, default_value_t = 10)]
    pub step: u64,

    /// Calls per n; reported times are the mean
    #[arg(short, long, default_value_t = 5)]
    pub repeat: u32,

    /// Entry bound for the LRU memo
    #[arg(long, default_value_t = 1024)]
    pub lru_capacity: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Mean call time per memo store for one n
#[derive(Debug, Serialize)]
pub struct FibRow {
    pub n: u64,
    pub value: String,
    pub lru_secs: f64,
    pub splay_secs: f64,
    pub splay_rotations: u64,
}

fn mean_call_secs<M>(n: u64, repeat: u32, memo: &mut M) -> Result<(u128, f64)>
where
    M: Memo<u64, u128>,
{
    let mut value = 0;
    let start = Instant::now();
    for _ in 0..repeat {
        value = fibonacci_memo(n, memo).with_context(|| format!("fib({}) failed", n))?;
    }
    Ok((value, start.elapsed().as_secs_f64() / f64::from(repeat)))
}

/// Execute the benchmark described by `args`
pub fn run(args: &FibArgs) -> Result<Vec<FibRow>> {
    ensure!(
        args.max <= FIB_MAX_N,
        "max {} exceeds {}, the largest n whose value fits in 128 bits",
        args.max,
        FIB_MAX_N
    );
    ensure!(args.step > 0, "step must be positive");
    ensure!(args.repeat > 0, "repeat must be positive");

    info!(max = args.max, step = args.step, repeat = args.repeat, "Fibonacci benchmark");

    let mut rows = Vec::new();
    for n in (0..=args.max).step_by(args.step as usize) {
        let mut lru = LruCache::new(args.lru_capacity);
        let mut tree = SplayTree::new();

        let (lru_value, lru_secs) = mean_call_secs(n, args.repeat, &mut lru)?;
        let (splay_value, splay_secs) = mean_call_secs(n, args.repeat, &mut tree)?;

        let expected = fibonacci_iter(n)?;
        ensure!(
            lru_value == expected && splay_value == expected,
            "fib({}) mismatch: lru {} splay {} expected {}",
            n,
            lru_value,
            splay_value,
            expected
        );
        debug!(n, lru_secs, splay_secs, "measured");

        rows.push(FibRow {
            n,
            value: expected.to_string(),
            lru_secs,
            splay_secs,
            splay_rotations: tree.rotations(),
        });
    }

    Ok(rows)
}

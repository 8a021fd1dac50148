//! cachebench - timing harness for the memocache engines

mod fib;
mod range;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::fib::FibArgs;
use crate::range::RangeArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Range-sum queries and updates, uncached vs LRU range cache
    Range(RangeArgs),

    /// Memoized Fibonacci, LRU memo vs splay tree memo
    Fib(FibArgs),
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting cachebench v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Range(range_args) => {
            let report = range::run(&range_args)?;
            if range_args.json {
                println!("{}", report::to_json("range", &report)?);
            } else {
                report::print_range(&report);
            }
        }
        Command::Fib(fib_args) => {
            let rows = fib::run(&fib_args)?;
            if fib_args.json {
                println!("{}", report::to_json("fib", &rows)?);
            } else {
                report::print_fib(&rows);
            }
        }
    }

    Ok(())
}

use std::time::Instant;

use anstream::println;
use clap::Parser;
use clap::ValueEnum;
use owo_colors::OwoColorize;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use pqueue::FlatQueue;
use pqueue::NodeQueue;
use pqueue::PriorityQueue;
use pqueue::StableFlatQueue;
use pqueue::StableNodeQueue;

#[cfg(feature = "mem_profile")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;
#[cfg(all(not(feature = "mem_profile"), not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Node,
    StableNode,
    Flat,
    StableFlat,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = pqueue::build::CLAP_LONG_VERSION)]
#[command(version, about = "Runs a seeded enqueue/dequeue workload", long_about = None)]
pub struct Args {
    #[arg(short, long, value_enum, default_value_t = Backend::StableFlat)]
    pub backend: Backend,

    #[arg(short = 'n', long, env = "PQUEUE_ENTRIES", default_value_t = 1_000_000usize)]
    pub entries: usize,

    /// Distinct priorities. Fewer means more ties.
    #[arg(long, default_value_t = 1_000u32)]
    pub priorities: u32,

    /// Dequeues per enqueue once the queue is full.
    #[arg(long, default_value_t = 1usize)]
    pub churn: usize,

    #[arg(long, default_value_t = 0u64)]
    pub seed: u64,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

/// Fills the queue with `entries` values, churns through it and drains it,
/// checking order on the way out. Returns the number of dequeued entries.
fn run<Q: PriorityQueue<u32, u32>>(q: &mut Q, entries: u32, args: &Args) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let range = args.priorities.max(1);

    for i in 0..entries {
        if !q.enqueue(i, rng.random_range(0..range)) {
            log::warn!("Entry {i} was rejected");
        }
    }
    log::info!("Enqueued {} entries", q.len());

    let mut dequeued = 0usize;
    for i in 0..entries {
        for _ in 0..args.churn {
            if q.dequeue().is_some() {
                dequeued += 1;
            }
        }
        q.enqueue(i, rng.random_range(0..range));
    }
    log::info!("Churned {dequeued} entries");

    let mut last = None;
    while let Some(e) = q.pop() {
        if let Some(previous) = last {
            assert!(previous <= e.priority, "Out of order: {previous} > {}", e.priority);
        }
        last = Some(e.priority);
        dequeued += 1;
    }
    dequeued
}

/// Values are `u32`s numbered from 0, so at most `u32::MAX` of them.
fn entry_count(entries: usize) -> std::io::Result<u32> {
    u32::try_from(entries).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("--entries must fit in 32 bits, got {entries}"),
        )
    })
}

fn main() -> std::io::Result<()> {
    #[cfg(feature = "mem_profile")]
    let _profiler = dhat::Profiler::new_heap();

    let args = Args::parse();
    args.color.write_global();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!(
        "Running {:?} with {} entries (seed={})",
        args.backend.green(),
        args.entries.yellow(),
        args.seed
    );

    let entries = entry_count(args.entries)?;

    let start = Instant::now();
    let dequeued = match args.backend {
        Backend::Node => {
            let mut q = NodeQueue::<u32, u32>::new();
            q.reserve(args.entries).map_err(std::io::Error::other)?;
            let n = run(&mut q, entries, &args);
            q.print_memory_stats()?;
            n
        }
        Backend::StableNode => {
            let mut q = StableNodeQueue::<u32, u32>::new();
            q.reserve(args.entries).map_err(std::io::Error::other)?;
            let n = run(&mut q, entries, &args);
            q.print_memory_stats()?;
            n
        }
        Backend::Flat => {
            let mut q = FlatQueue::<u32, u32>::new();
            q.reserve(args.entries).map_err(std::io::Error::other)?;
            let n = run(&mut q, entries, &args);
            q.print_memory_stats()?;
            n
        }
        Backend::StableFlat => {
            let mut q = StableFlatQueue::<u32, u32>::new();
            q.reserve(args.entries).map_err(std::io::Error::other)?;
            let n = run(&mut q, entries, &args);
            q.print_memory_stats()?;
            n
        }
    };

    println!(
        "Dequeued {} entries in {:?}",
        dequeued.green(),
        start.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(entries: usize, churn: usize) -> Args {
        Args::parse_from([
            "main",
            "--entries",
            entries.to_string().as_str(),
            "--churn",
            churn.to_string().as_str(),
            "--priorities",
            "7",
        ])
    }

    #[test]
    fn entry_count_is_bounded() {
        assert_eq!(entry_count(10).unwrap(), 10);
        assert_eq!(entry_count(u32::MAX as usize).unwrap(), u32::MAX);
        let err = entry_count(u32::MAX as usize + 1).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn run_dequeues_everything() {
        let args = args(100, 1);
        let mut q = StableFlatQueue::<u32, u32>::new();
        q.reserve(args.entries).unwrap();
        assert!(q.capacity() >= 100);
        // Filled with 100, then 100 rounds of one dequeue and one enqueue.
        assert_eq!(run(&mut q, 100, &args), 200);
        assert!(q.is_empty());
    }
}

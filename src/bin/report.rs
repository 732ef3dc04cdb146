/// Report tool
///
/// Generates `docs/type_report.org`
///
/// Needs the `inspect` feature for the storage layout section.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use pqueue::Entry;
use pqueue::FlatQueue;
use pqueue::NodeQueue;
use pqueue::PriorityQueue;
use pqueue::StableFlatQueue;
use pqueue::StableNodeQueue;
use pqueue::heap_primitives::DEFAULT_ARITY;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = pqueue::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        short,
        long,
        env = "TYPE_REPORT",
        default_value = "docs/type_report.org"
    )]
    pub type_report: PathBuf,

    /// Entries queued before measuring memory.
    #[arg(long, default_value_t = 10_000usize)]
    pub entries: usize,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

/// `std::any::type_name` without module paths.
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}

fn print_size<T, W: std::io::Write>(out: &mut BufWriter<W>) -> std::io::Result<()> {
    use std::mem::size_of;

    let t_type = format!("~{}~", short_type_name::<T>());
    let size = size_of::<T>();
    const AVG_CACHELINE_SIZE: usize = 64;
    let items_per_avg_cacheline = AVG_CACHELINE_SIZE.checked_div(size).unwrap_or(0);
    writeln!(
        out,
        "| {t_type:60} | {size:10?} | {items_per_avg_cacheline:10?} |"
    )?;
    Ok(())
}

fn fill<Q: PriorityQueue<u32, u32>>(q: &mut Q, entries: usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    for i in 0..entries {
        q.enqueue(i as u32, rng.random_range(0..1_000u32));
    }
}

/// Storage order of a small stable queue in both layouts, as
/// `value:priority:stamp`. Row `i` holds the children of the nodes in row
/// `i - 1`.
fn write_layout<W: std::io::Write>(out: &mut BufWriter<W>) -> std::io::Result<()> {
    const LAYOUT_ENTRIES: usize = 21;
    let mut node: StableNodeQueue<u32, u32> = StableNodeQueue::new();
    fill(&mut node, LAYOUT_ENTRIES);
    let mut flat: StableFlatQueue<u32, u32> = StableFlatQueue::new();
    fill(&mut flat, LAYOUT_ENTRIES);

    let node_cells: Vec<String> = node
        .as_entries()
        .iter()
        .map(|e| format!("{}:{}:{}", e.value, e.priority, e.stability))
        .collect();
    let (values, priorities, stamps) = flat.as_slices();
    let flat_cells: Vec<String> = values
        .iter()
        .zip(priorities)
        .zip(stamps)
        .map(|((v, p), s)| format!("{v}:{p}:{s}"))
        .collect();
    // Same sift primitives and tie-breaking, so both layouts must agree.
    if node_cells != flat_cells {
        return Err(std::io::Error::other(format!(
            "Storage layouts diverged: {node_cells:?} != {flat_cells:?}"
        )));
    }

    writeln!(out, "#+begin_example")?;
    let mut start = 0usize;
    let mut width = 1usize;
    while start < flat_cells.len() {
        let end = (start + width).min(flat_cells.len());
        writeln!(out, "{}", flat_cells[start..end].join(" "))?;
        start = end;
        width *= DEFAULT_ARITY;
    }
    writeln!(out, "#+end_example")?;
    Ok(())
}

fn write_report<W: std::io::Write>(out: &mut BufWriter<W>, entries: usize) -> std::io::Result<()> {
    writeln!(out, ":PROPERTIES:")?;
    writeln!(out, ":VERSION: {:?}", pqueue::build::PKG_VERSION)?;
    writeln!(out, ":GIT_BRANCH: {:?}", shadow_rs::branch())?;
    writeln!(out, ":BUILD_IS_DEBUG: {}", shadow_rs::is_debug())?;
    if pqueue::build::GIT_CLEAN {
        writeln!(out, ":GIT_STATUS: CLEAN")?;
    } else {
        writeln!(out, ":GIT_STATUS: DIRTY")?;
    }
    writeln!(out, ":END:")?;
    writeln!(out, "#+title: Priority queues")?;
    writeln!(out)?;
    writeln!(out, "* Data")?;

    writeln!(out, "** Sizes")?;
    writeln!(
        out,
        "| {:60} | {:10} | {:10} |",
        "Struct", "Size", "Items/64B"
    )?;
    print_size::<Entry<u32, u32>, _>(out)?;
    print_size::<Entry<u32, u32, u64>, _>(out)?;
    print_size::<Entry<String, f64, u64>, _>(out)?;
    print_size::<NodeQueue<u32, u32>, _>(out)?;
    print_size::<StableNodeQueue<u32, u32>, _>(out)?;
    print_size::<FlatQueue<u32, u32>, _>(out)?;
    print_size::<StableFlatQueue<u32, u32>, _>(out)?;

    writeln!(out, "** Storage layout")?;
    write_layout(out)?;

    writeln!(out, "** Memory ({entries} entries)")?;
    writeln!(out, "#+begin_example")?;
    let mut q = NodeQueue::new();
    fill(&mut q, entries);
    q.write_memory_stats(&mut *out)?;
    let mut q = StableNodeQueue::new();
    fill(&mut q, entries);
    q.write_memory_stats(&mut *out)?;
    let mut q = FlatQueue::new();
    fill(&mut q, entries);
    q.write_memory_stats(&mut *out)?;
    let mut q = StableFlatQueue::new();
    fill(&mut q, entries);
    q.write_memory_stats(&mut *out)?;
    writeln!(out, "#+end_example")?;

    out.flush()
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    args.color.write_global();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("Writing report to {:?}", args.type_report.green());

    if let Some(dir) = args.type_report.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = File::create(&args.type_report)?;
    let mut r = BufWriter::new(file);
    write_report(&mut r, args.entries)?;
    log::info!("Report written for {} entries", args.entries);

    Ok(())
}

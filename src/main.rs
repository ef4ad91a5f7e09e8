//! Command-line driver: reads a trace, runs the simulation, prints the
//! report.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vmsim::config::{DEFAULT_FRAMES, DEFAULT_PAGE_SIZE, DEFAULT_VIRTUAL_PAGES};
use vmsim::{trace, PolicyKind, SimConfig, Simulation};

/// Simulate virtual-memory paging over a reference trace.
#[derive(Debug, Parser)]
#[command(name = "vmsim", version, about)]
struct Args {
    /// Trace file of whitespace-separated `pid address write` triples;
    /// address -1 terminates the process.
    trace: PathBuf,

    /// Replacement policy.
    #[arg(short, long, value_enum, default_value_t = PolicyKind::Fifo)]
    policy: PolicyKind,

    /// Number of physical frames in the pool.
    #[arg(short, long, default_value_t = DEFAULT_FRAMES)]
    frames: usize,

    /// Virtual pages per process.
    #[arg(long, default_value_t = DEFAULT_VIRTUAL_PAGES)]
    virtual_pages: usize,

    /// Page size in address units.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .without_time()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = SimConfig {
        frames: args.frames,
        virtual_pages: args.virtual_pages,
        page_size: args.page_size,
        policy: args.policy,
    };
    let mut sim = Simulation::new(config)?;

    let input = std::fs::read_to_string(&args.trace)
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    let records = trace::parse(&input).context("parsing trace")?;

    for record in records {
        sim.apply(record)
            .with_context(|| format!("simulating a reference by process {}", record.pid))?;
    }

    print_report(&sim);
    Ok(())
}

/// Renders frame ownership, each surviving process's memory map, and the
/// run totals to stdout.
fn print_report(sim: &Simulation) {
    for (index, frame) in sim.manager().pool().frames().iter().enumerate() {
        match frame.occupant() {
            Some(occupant) => println!(
                "frame {index} is owned by process {} (virtual page {})",
                occupant.process.id(),
                occupant.vpage,
            ),
            None => println!("frame {index} is free"),
        }
    }

    for process in sim.processes() {
        println!("\nprocess {} memory map", process.id());
        for (vpage, frame) in process.mappings() {
            println!("  virtual page {vpage} -> frame {frame}");
        }
    }

    let stats = sim.stats();
    println!(
        "\n{} page faults out of {} memory references ({}%)",
        stats.faults,
        stats.references,
        stats.fault_ratio_percent(),
    );
}

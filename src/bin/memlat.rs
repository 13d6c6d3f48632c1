//! Cache and Memory Latency Measurement via Pointer Chasing
//!
//! Sweeps a grid of working set sizes and strides, printing each cell's average access latency
//! as it is measured and writing the complete grid to a CSV file at the end.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use log::{info, warn};
use memlat_rs::config::{DEFAULT_ITERATIONS, STRIDES, SweepConfig, WORKING_SET_SIZES};
use memlat_rs::sweep::run_sweep;

// use faster/smaller `mimalloc` allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "memlat", version)]
#[command(about = "Measure memory access latency across working set and stride sizes")]
struct Args {
    /// Path to the CSV file results are written to
    output: PathBuf,

    /// Pointer dereferences timed per cell
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Comma separated working set sizes in bytes, ascending (defaults to 48 KiB..64 MiB presets)
    #[arg(long, value_delimiter = ',')]
    working_set_sizes: Option<Vec<usize>>,

    /// Comma separated stride sizes in bytes, ascending (defaults to 1 B..32 KiB presets)
    #[arg(long, value_delimiter = ',')]
    strides: Option<Vec<usize>>,

    /// CPU core to pin the measuring thread to
    #[arg(long)]
    core: Option<usize>,

    /// Don't raise the measuring thread to maximum priority
    #[arg(long)]
    no_priority: bool,
}

impl Args {
    fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            working_set_sizes: self
                .working_set_sizes
                .clone()
                .unwrap_or_else(|| WORKING_SET_SIZES.to_vec()),
            strides: self.strides.clone().unwrap_or_else(|| STRIDES.to_vec()),
            iterations: self.iterations,
        }
    }
}

/// Reduce scheduling noise on the measuring thread; failures are reported but not fatal
fn prepare_thread(core: Option<usize>, raise_priority: bool) {
    if let Some(cpu_num) = core {
        let core_num = core_affinity::CoreId { id: cpu_num };
        if core_affinity::set_for_current(core_num) {
            info!("Pinned to CPU core {}", cpu_num);
        } else {
            warn!("Couldn't pin to CPU core {} (NOTE: this is expected on macOS)", cpu_num);
        }
    }

    if raise_priority
        && thread_priority::set_current_thread_priority(thread_priority::ThreadPriority::Max)
            .is_err()
    {
        warn!("Couldn't set maximum thread priority");
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.sweep_config();
    prepare_thread(args.core, !args.no_priority);

    let table = run_sweep(&config, |measurement| {
        println!("{}", measurement.console_line());
    })
    .context("latency sweep aborted")?;

    table
        .save_csv(&args.output)
        .with_context(|| format!("failed to write results to {}", args.output.display()))?;
    println!("Written to {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                // usage errors exit with 1, not clap's default of 2
                let _ = err.print();
                return ExitCode::from(1);
            }
        },
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

//! # Sweep
//!
//! Drives the latency kernel over every (working set, stride) pair of a [`SweepConfig`], working
//! sets in the outer loop and strides in the inner loop. Measurements run strictly one after the
//! other on the calling thread: concurrent chases would contend for cache and memory bandwidth and
//! skew each other's numbers. Only one node block is alive at any time.
use std::time::Instant;

use log::info;

use crate::config::SweepConfig;
use crate::kernel::{Measurement, measure_cell};
use crate::table::ResultTable;
use crate::{Result, format_size_fixed_int};

/// Measure every cell, calling `on_measurement` as each one completes
///
/// Any error aborts the sweep; no partial table is returned.
pub fn run_sweep<F>(config: &SweepConfig, mut on_measurement: F) -> Result<ResultTable>
where
    F: FnMut(&Measurement),
{
    config.validate()?;
    info!(
        "Sweeping {} working sets x {} strides, {} iterations per cell",
        config.working_set_sizes.len(),
        config.strides.len(),
        config.iterations
    );

    let sweep_time = Instant::now();
    let mut table = ResultTable::new(config.working_set_sizes.clone(), config.strides.clone());

    for (row, &working_set_size) in config.working_set_sizes.iter().enumerate() {
        info!("Working set {}", format_size_fixed_int(working_set_size));
        for (col, &stride) in config.strides.iter().enumerate() {
            let measurement = measure_cell(working_set_size, stride, config.iterations)?;
            table.set(row, col, measurement.latency_ns);
            on_measurement(&measurement);
        }
    }

    info!(
        "Sweep of {} cells finished in {:.2?}",
        config.cell_count(),
        sweep_time.elapsed()
    );
    Ok(table)
}

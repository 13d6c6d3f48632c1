//! Latency kernel: times a pointer chase over one working set at one stride.
use std::hint::black_box;
use std::time::Instant;

use log::debug;

use crate::chain::{ChaseChain, Cursor};
use crate::{Error, Result, format_size};

/// One cell of the sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub working_set_size: usize,
    pub stride: usize,
    pub latency_ns: f64,
}

impl Measurement {
    /// Console line reported for each measured cell
    pub fn console_line(&self) -> String {
        format!(
            "Working set size of {} bytes, stride size of {} bytes, average latency: {} ns",
            self.working_set_size, self.stride, self.latency_ns
        )
    }
}

/// Average latency in nanoseconds of one access in a chase over `working_set_size` bytes where
/// consecutive accesses are `stride` bytes apart
///
/// The node block lives only for the duration of the call.
pub fn measure(working_set_size: usize, stride: usize, iterations: usize) -> Result<f64> {
    if iterations == 0 {
        return Err(Error::ZeroIterations);
    }
    let chain = ChaseChain::for_working_set(working_set_size, stride)?;
    debug!(
        "Chain of {} nodes ({}), jump {} nodes, cycle of {} nodes",
        chain.node_count(),
        format_size(chain.footprint_bytes()),
        chain.jump_length(),
        chain.cycle_len()
    );

    let mut cursor = chain.cursor();
    // Warmup: bring the cycle's pages and TLB entries in before timing
    black_box(cursor.advance(chain.warmup_steps()));

    Ok(timed_chase(&mut cursor, iterations))
}

/// Measure latency by chasing pointers from the cursor's current position
#[inline(never)]
fn timed_chase(cursor: &mut Cursor<'_>, iterations: usize) -> f64 {
    let start = Instant::now();
    let idx = cursor.advance(iterations);
    let elapsed = start.elapsed();

    // Prevent dead code elimination
    black_box(idx);

    elapsed.as_nanos() as f64 / iterations as f64
}

/// Run [`measure`] and pair the result with its coordinates
pub fn measure_cell(working_set_size: usize, stride: usize, iterations: usize) -> Result<Measurement> {
    Ok(Measurement {
        working_set_size,
        stride,
        latency_ns: measure(working_set_size, stride, iterations)?,
    })
}

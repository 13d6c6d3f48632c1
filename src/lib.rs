//! # memlat
//!
//! Memory and cache latency microbenchmark. A working set is laid out as a contiguous block of
//! link nodes wired into a single cycle whose consecutive hops are `stride` bytes apart. Chasing
//! the links serializes every load on the previous one, so hardware prefetchers cannot hide the
//! access latency, and the average time per hop is the latency of whichever level of the memory
//! hierarchy the working set lands in.
pub mod chain;
pub mod config;
pub mod error;
pub mod kernel;
pub mod sweep;
pub mod table;

pub use error::{Error, Result};

/// Size of one node, which holds exactly one successor link
pub const NODE_SIZE: usize = std::mem::size_of::<chain::Node>();

/// Convert number of bytes to formatted string
pub fn format_size(bytes: usize) -> String {
    const GB: f64 = 1024.0 * 1024.0 * 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    const KB: f64 = 1024.0;

    let bytes = bytes as f64;
    if bytes >= GB {
        format!("{:.2} GiB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.2} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.2} KiB", bytes / KB)
    } else {
        format!("{:.2} B", bytes)
    }
}

/// Convert number of bytes to formatted string for fixed-width integer string
pub fn format_size_fixed_int(bytes: usize) -> String {
    const GB: usize = 1024 * 1024 * 1024;
    const MB: usize = 1024 * 1024;
    const KB: usize = 1024;

    if bytes >= GB {
        format!("{:>4} GiB", bytes / GB)
    } else if bytes >= MB {
        format!("{:>4} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{:>4} KiB", bytes / KB)
    } else {
        format!("{:>4} B", bytes)
    }
}

//! Sweep configuration: which working sets and strides to measure, and how long to chase.
use crate::{Error, NODE_SIZE, Result};

/// Pointer dereferences per measurement, large enough that timer overhead is negligible
pub const DEFAULT_ITERATIONS: usize = 50_000_000;

/// Working set sizes in bytes, 48 KiB to 64 MiB
pub const WORKING_SET_SIZES: [usize; 22] = [
    49152,    // 48 KiB
    65536,    // 64 KiB
    98304,    // 96 KiB
    131072,   // 128 KiB
    196608,   // 192 KiB
    262144,   // 256 KiB
    393216,   // 384 KiB
    524288,   // 512 KiB
    786432,   // 768 KiB
    1048576,  // 1 MiB
    1572864,  // 1.5 MiB
    2097152,  // 2 MiB
    3145728,  // 3 MiB
    4194304,  // 4 MiB
    6291456,  // 6 MiB
    8388608,  // 8 MiB
    12582912, // 12 MiB
    16777216, // 16 MiB
    25165824, // 24 MiB
    33554432, // 32 MiB
    50331648, // 48 MiB
    67108864, // 64 MiB
];

/// Stride sizes in bytes, 1 B to 32 KiB
pub const STRIDES: [usize; 16] = [
    1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Row labels, ascending
    pub working_set_sizes: Vec<usize>,
    /// Column labels, ascending
    pub strides: Vec<usize>,
    pub iterations: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            working_set_sizes: WORKING_SET_SIZES.to_vec(),
            strides: STRIDES.to_vec(),
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl SweepConfig {
    /// Check the configuration before any memory is allocated
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::ZeroIterations);
        }
        check_ascending("working set sizes", &self.working_set_sizes)?;
        check_ascending("strides", &self.strides)?;

        if let Some(&size) = self.working_set_sizes.iter().find(|&&s| s < NODE_SIZE) {
            return Err(Error::InvalidConfig(format!(
                "working set size of {size} bytes cannot hold a {NODE_SIZE} byte node"
            )));
        }
        if self.strides.contains(&0) {
            return Err(Error::InvalidConfig("stride of 0 bytes".to_string()));
        }
        Ok(())
    }

    /// Number of cells in the sweep
    pub fn cell_count(&self) -> usize {
        self.working_set_sizes.len() * self.strides.len()
    }
}

fn check_ascending(name: &str, values: &[usize]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::InvalidConfig(format!("no {name} given")));
    }
    if values.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(Error::InvalidConfig(format!(
            "{name} must be strictly ascending"
        )));
    }
    Ok(())
}

//! Result table and its CSV serialization.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::Result;

/// Average latencies in nanoseconds indexed by (working set, stride)
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    working_set_sizes: Vec<usize>,
    strides: Vec<usize>,
    /// Row-major, one row per working set
    latencies: Vec<f64>,
}

impl ResultTable {
    /// Empty table for the given labels, every cell at `NaN` until measured
    pub fn new(working_set_sizes: Vec<usize>, strides: Vec<usize>) -> Self {
        let cells = working_set_sizes.len() * strides.len();
        ResultTable {
            working_set_sizes,
            strides,
            latencies: vec![f64::NAN; cells],
        }
    }

    pub fn working_set_sizes(&self) -> &[usize] {
        &self.working_set_sizes
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn set(&mut self, row: usize, col: usize, latency_ns: f64) {
        let idx = self.index(row, col);
        self.latencies[idx] = latency_ns;
    }

    /// Latencies of one working set, in stride order
    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.strides.len();
        &self.latencies[row * width..(row + 1) * width]
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.working_set_sizes.len() && col < self.strides.len(),
            "cell ({row}, {col}) outside {}x{} table",
            self.working_set_sizes.len(),
            self.strides.len()
        );
        row * self.strides.len() + col
    }

    /// Write the table as CSV: a stride header row, then one row per working set
    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<()> {
        write!(out, "WorkingSetSize")?;
        for stride in &self.strides {
            write!(out, ",{stride}")?;
        }
        writeln!(out)?;

        for (row, size) in self.working_set_sizes.iter().enumerate() {
            write!(out, "{size}")?;
            for latency in self.row(row) {
                write!(out, ",{latency:.2}")?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Create or truncate `path` and write the table to it
    pub fn save_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))?;
        info!("Saved {} rows to {}", self.working_set_sizes.len(), path.display());
        Ok(())
    }
}

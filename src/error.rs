use thiserror::Error;

/// Errors produced while configuring or running the latency sweep
#[derive(Debug, Error)]
pub enum Error {
    /// The node block for a working set could not be allocated
    #[error("failed to allocate {nodes} nodes ({bytes} bytes) for the working set")]
    AllocationFailed { nodes: usize, bytes: usize },

    /// Working set is too small to hold a single node
    #[error("working set size of {size} bytes is smaller than one node ({node_size} bytes)")]
    WorkingSetTooSmall { size: usize, node_size: usize },

    #[error("chain must hold at least one node")]
    EmptyChain,

    #[error("jump length must be at least 1 node")]
    ZeroJumpLength,

    #[error("stride must be at least 1 byte")]
    ZeroStride,

    #[error("iteration count must be at least 1")]
    ZeroIterations,

    /// Sweep configuration rejected before any measurement ran
    #[error("invalid sweep configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! # Chain
//!
//! A pointer-chasing chain: one contiguous block of [`Node`]s whose successor links form a single
//! cycle through index 0. Links are indices into the block instead of references, which keeps the
//! block a plain `Vec` with the same memory layout (one `usize` per node) that a raw-pointer list
//! would have.
//!
//! The cycle is built by sweeping `0, jump, 2 * jump, ...` while the running index is still inside
//! the block, then linking the last node visited back to 0. When `jump` does not divide the node
//! count, nodes off that sweep are never linked and keep the [`Node::UNSET`] sentinel.
use crate::{Error, NODE_SIZE, Result};

/// A single link in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Node {
    next: usize,
}

impl Node {
    /// Link value of a node the cycle never reaches
    pub const UNSET: Node = Node { next: usize::MAX };
}

/// Number of nodes that fit in a working set (truncating)
pub fn node_count(working_set_size: usize) -> usize {
    working_set_size / NODE_SIZE
}

/// Index distance between consecutively visited nodes for a byte stride
pub fn jump_length(stride: usize) -> usize {
    (stride / NODE_SIZE).max(1)
}

/// Owned node block wired into a traversal cycle
#[derive(Debug)]
pub struct ChaseChain {
    nodes: Vec<Node>,
    jump_length: usize,
}

impl ChaseChain {
    /// Allocate `node_count` nodes and link them with the given jump length
    pub fn new(node_count: usize, jump_length: usize) -> Result<Self> {
        if node_count == 0 {
            return Err(Error::EmptyChain);
        }
        if jump_length == 0 {
            return Err(Error::ZeroJumpLength);
        }

        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(node_count)
            .map_err(|_| Error::AllocationFailed {
                nodes: node_count,
                bytes: node_count.saturating_mul(NODE_SIZE),
            })?;
        nodes.resize(node_count, Node::UNSET);

        // Each visited node is linked exactly once: forward while the next index is still in the
        // block, otherwise back to the start.
        let mut idx = 0usize;
        loop {
            match idx.checked_add(jump_length).filter(|&next| next < node_count) {
                Some(next) => {
                    nodes[idx].next = next;
                    idx = next;
                }
                None => {
                    nodes[idx].next = 0;
                    break;
                }
            }
        }

        Ok(ChaseChain { nodes, jump_length })
    }

    /// Build the chain for a working set size and stride, both in bytes
    pub fn for_working_set(working_set_size: usize, stride: usize) -> Result<Self> {
        if working_set_size < NODE_SIZE {
            return Err(Error::WorkingSetTooSmall {
                size: working_set_size,
                node_size: NODE_SIZE,
            });
        }
        if stride == 0 {
            return Err(Error::ZeroStride);
        }
        Self::new(node_count(working_set_size), jump_length(stride))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn jump_length(&self) -> usize {
        self.jump_length
    }

    /// Bytes occupied by the node block
    pub fn footprint_bytes(&self) -> usize {
        self.nodes.len() * NODE_SIZE
    }

    /// Number of hops the warmup pass takes to touch the cycle once
    pub fn warmup_steps(&self) -> usize {
        self.nodes.len() / self.jump_length
    }

    /// Successor of `idx`, or `None` if the node is out of range or was never linked
    pub fn successor(&self, idx: usize) -> Option<usize> {
        self.nodes
            .get(idx)
            .filter(|node| **node != Node::UNSET)
            .map(|node| node.next)
    }

    /// Indices on the cycle, in traversal order starting at 0
    #[cfg(test)]
    pub fn cycle_indices(&self) -> Vec<usize> {
        let mut indices = vec![0];
        let mut idx = self.nodes[0].next;
        while idx != 0 {
            indices.push(idx);
            idx = self.nodes[idx].next;
        }
        indices
    }

    /// Number of distinct nodes on the cycle through index 0
    pub fn cycle_len(&self) -> usize {
        (self.nodes.len() - 1) / self.jump_length + 1
    }

    /// Cursor positioned at index 0
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            nodes: &self.nodes,
            position: 0,
        }
    }
}

/// Traversal position on a chain's cycle
///
/// A cursor only ever moves along successor links starting from index 0, so its position is
/// always a linked node inside the block.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    nodes: &'a [Node],
    position: usize,
}

impl Cursor<'_> {
    /// Follow `steps` successor links, returning the final position
    #[inline(always)]
    pub fn advance(&mut self, steps: usize) -> usize {
        let ptr = self.nodes.as_ptr();
        let mut idx = self.position;
        for _ in 0..steps {
            // SAFETY: `idx` starts on the cycle and every link on the cycle points at another
            // in-bounds node of the cycle, so the sentinel is never read.
            idx = unsafe { (*ptr.add(idx)).next };
        }
        self.position = idx;
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn counts_truncate() {
        assert_eq!(node_count(65536), 8192);
        assert_eq!(node_count(NODE_SIZE * 3 + NODE_SIZE - 1), 3);
        assert_eq!(jump_length(1), 1);
        assert_eq!(jump_length(NODE_SIZE), 1);
        assert_eq!(jump_length(NODE_SIZE * 2 + 1), 2);
        assert_eq!(jump_length(32768), 32768 / NODE_SIZE);
    }

    #[test]
    fn unit_jump_visits_every_node_in_order() {
        let chain = ChaseChain::new(8192, 1).unwrap();
        assert_eq!(chain.cycle_indices(), (0..8192).collect::<Vec<_>>());
        assert_eq!(chain.successor(8191), Some(0));
        assert_eq!(chain.warmup_steps(), 8192);
        assert_eq!(chain.footprint_bytes(), 8192 * NODE_SIZE);
    }

    #[test]
    fn uneven_jump_leaves_unvisited_nodes_unset() {
        // 48 KiB working set with a 4096-node jump: the sweep touches 0 and 4096 only
        let chain = ChaseChain::new(6144, 4096).unwrap();
        assert_eq!(chain.successor(0), Some(4096));
        assert_eq!(chain.successor(4096), Some(0));
        assert_eq!(chain.successor(2048), None);
        assert_eq!(chain.successor(1), None);
        assert_eq!(chain.cycle_indices(), vec![0, 4096]);
        assert_eq!(chain.cycle_len(), 2);
        assert_eq!(chain.warmup_steps(), 1);

        let linked = (0..chain.node_count())
            .filter(|&idx| chain.successor(idx).is_some())
            .count();
        assert_eq!(linked, 2);
    }

    #[test]
    fn single_node_is_self_loop() {
        let chain = ChaseChain::new(1, 1).unwrap();
        assert_eq!(chain.successor(0), Some(0));
        assert_eq!(chain.cycle_indices(), vec![0]);
    }

    #[test]
    fn oversized_jump_is_self_loop() {
        let chain = ChaseChain::new(16, 16).unwrap();
        assert_eq!(chain.successor(0), Some(0));
        let chain = ChaseChain::new(16, 1000).unwrap();
        assert_eq!(chain.successor(0), Some(0));
        assert_eq!(chain.cycle_len(), 1);
        assert_eq!(chain.warmup_steps(), 0);
        assert!((1..16).all(|idx| chain.successor(idx).is_none()));
    }

    #[test]
    fn huge_jump_does_not_overflow() {
        let chain = ChaseChain::new(4, usize::MAX).unwrap();
        assert_eq!(chain.cycle_indices(), vec![0]);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert!(matches!(
            ChaseChain::for_working_set(NODE_SIZE - 1, 8),
            Err(Error::WorkingSetTooSmall { .. })
        ));
        assert!(matches!(
            ChaseChain::for_working_set(4096, 0),
            Err(Error::ZeroStride)
        ));
        assert!(matches!(ChaseChain::new(0, 1), Err(Error::EmptyChain)));
        assert!(matches!(ChaseChain::new(8, 0), Err(Error::ZeroJumpLength)));
    }

    #[test]
    fn allocation_failure_is_reported() {
        let result = ChaseChain::new(usize::MAX / NODE_SIZE, 1);
        assert!(matches!(result, Err(Error::AllocationFailed { .. })));
    }

    #[test]
    fn cursor_advances_along_cycle() {
        let chain = ChaseChain::new(10, 3).unwrap();
        assert_eq!(chain.cycle_indices(), vec![0, 3, 6, 9]);

        let mut cursor = chain.cursor();
        assert_eq!(cursor.advance(0), 0);
        assert_eq!(cursor.advance(2), 6);
        assert_eq!(cursor.advance(1), 9);
        assert_eq!(cursor.advance(1), 0);
        assert_eq!(cursor.advance(9), 3);
        assert_eq!(cursor.advance(0), 3);
    }

    proptest! {
        #[test]
        fn cycle_closes_through_zero(node_count in 1usize..4096, jump in 1usize..8192) {
            let chain = ChaseChain::new(node_count, jump).unwrap();
            let expected: Vec<usize> = (0..node_count).step_by(jump).collect();

            // Linear sweep order, every link on it set, and nothing else linked
            prop_assert_eq!(chain.cycle_indices(), expected.clone());
            prop_assert_eq!(chain.cycle_len(), expected.len());
            for idx in 0..node_count {
                prop_assert_eq!(chain.successor(idx).is_some(), idx % jump == 0);
            }

            let mut cursor = chain.cursor();
            let mut zero_visits = 0;
            for _ in 0..(3 * expected.len()) {
                if cursor.advance(1) == 0 {
                    zero_visits += 1;
                }
            }
            prop_assert_eq!(zero_visits, 3);
        }

        #[test]
        fn dividing_jump_returns_after_warmup(nodes_per_jump in 1usize..512, jump in 1usize..64) {
            let chain = ChaseChain::new(nodes_per_jump * jump, jump).unwrap();
            let mut cursor = chain.cursor();
            prop_assert_eq!(cursor.advance(chain.warmup_steps()), 0);
        }
    }
}

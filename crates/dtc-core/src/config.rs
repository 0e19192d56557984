// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Board geometry configuration and the capability seams supplied by the
//! surrounding framework.

use thiserror::Error;

use crate::stub::{HitRecord, RegionSet};

/// Errors raised when a board is constructed against an inconsistent
/// geometry.
///
/// Every variant is fatal: construction aborts before any routing state
/// exists, so a failed board never exposes partial results. Capacity
/// overflow at runtime is modeled hardware behavior, not an error, and is
/// reported through the lost streams instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Routing blocks need at least one input channel.
    #[error("routing blocks need at least one input channel")]
    NoChannels,
    /// Boards need at least one routing block.
    #[error("boards need at least one routing block")]
    NoRoutingBlocks,
    /// The board population needs at least one detector region.
    #[error("board population needs at least one detector region")]
    NoBoardRegions,
    /// Each detector region needs at least one board.
    #[error("detector regions need at least one board")]
    NoBoardsPerRegion,
    /// Overlapping region count outside the representable range.
    #[error("overlapping region count {0} not in 1..={1}")]
    RegionCount(usize, usize),
    /// Holding buffers evict their front at `depth - 1`, so a depth below
    /// two cannot hold anything.
    #[error("holding buffer depth {0} too shallow, need at least 2")]
    StackDepth(usize),
    /// Input and output channel capacities must be at least one frame.
    #[error("channel capacities must be at least one frame")]
    ZeroCapacity,
    /// The construction input does not cover the declared module slots.
    #[error("expected {expected} module slots, got {got}")]
    ModuleCount {
        /// Module slots the geometry declares.
        expected: usize,
        /// Module slots the caller supplied.
        got: usize,
    },
    /// The board identifier does not exist in the declared geometry.
    #[error("board id {board_id} outside the declared population of {boards}")]
    BoardId {
        /// Identifier supplied by the caller.
        board_id: usize,
        /// Total boards in the configured population.
        boards: usize,
    },
}

/// Geometry-derived constants for one board flavor.
///
/// These mirror the constants the hardware is synthesized with. They are
/// validated once, before any routing happens; the routing core itself never
/// re-checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Input channels multiplexed into one stage-1 routing block.
    pub channels_per_block: usize,
    /// Stage-1 routing blocks per board.
    pub routing_blocks: usize,
    /// Detector regions the board population is distributed over.
    pub board_regions: usize,
    /// Boards servicing one detector region.
    pub boards_per_region: usize,
    /// Overlapping output regions each board fans out to; one output channel
    /// per region.
    pub regions: usize,
    /// Depth of the per-channel holding buffer inside the merge engine.
    pub stack_depth: usize,
    /// Per-channel input capacity applied at assignment.
    pub input_capacity: usize,
    /// Per-channel output capacity applied after each merge.
    pub output_capacity: usize,
    /// Emulate the hardware's truncation. When disabled, channels and
    /// buffers grow without bound and nothing is ever lost.
    pub truncation: bool,
}

impl BoardConfig {
    /// Module slots (= input channels) on one board.
    #[must_use]
    pub fn modules_per_board(&self) -> usize {
        self.channels_per_block * self.routing_blocks
    }

    /// Total boards in the configured population.
    #[must_use]
    pub fn boards(&self) -> usize {
        self.board_regions * self.boards_per_region
    }

    /// Checks the configuration contract.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels_per_block == 0 {
            return Err(ConfigError::NoChannels);
        }
        if self.routing_blocks == 0 {
            return Err(ConfigError::NoRoutingBlocks);
        }
        if self.board_regions == 0 {
            return Err(ConfigError::NoBoardRegions);
        }
        if self.boards_per_region == 0 {
            return Err(ConfigError::NoBoardsPerRegion);
        }
        if self.regions == 0 || self.regions > RegionSet::MAX_REGIONS {
            return Err(ConfigError::RegionCount(
                self.regions,
                RegionSet::MAX_REGIONS,
            ));
        }
        if self.stack_depth < 2 {
            return Err(ConfigError::StackDepth(self.stack_depth));
        }
        if self.input_capacity == 0 || self.output_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

/// Capability seam for the geometry predicates the surrounding framework
/// precomputes per hit.
///
/// Implementations must be pure functions of their arguments: the router
/// evaluates each predicate exactly once per hit during assignment and
/// caches the results, so a stateful implementation would silently break
/// replay determinism.
pub trait Geometry {
    /// Whether the hit survives the upstream pt/eta style cuts.
    fn is_valid(&self, module: usize, hit: &HitRecord) -> bool;

    /// Whether a stub produced by `module` from this hit belongs to the
    /// overlapping output region `region`.
    fn in_region(&self, module: usize, hit: &HitRecord, region: usize) -> bool;
}

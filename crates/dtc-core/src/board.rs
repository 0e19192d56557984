// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Board orchestration: assignment, both routing stages, and emission.

use crate::channel::{self, BlockChannels};
use crate::config::{BoardConfig, ConfigError, Geometry};
use crate::frame;
use crate::product::{ChannelKey, FrameProduct};
use crate::router::{self, Slot};
use crate::stub::{HitRecord, StubArena, StubRef};
use crate::telemetry;

/// One processing unit: a single board's worth of input, routed in
/// isolation.
///
/// A board owns every piece of mutable routing state (the stub arena, the
/// input channels, the per-region lost accumulators) and shares nothing, so
/// independent boards can be processed on independent threads; only the
/// final [`FrameProduct`] sinks need merging, and their keys partition
/// cleanly by board.
#[derive(Debug)]
pub struct Board {
    cfg: BoardConfig,
    region: usize,
    board: usize,
    arena: StubArena,
    input: Vec<BlockChannels>,
    lost: Vec<Vec<StubRef>>,
}

impl Board {
    /// Builds the board's input channels from raw per-module hits.
    ///
    /// `modules[m]` holds the ordered hits of module slot `m`; `board_id`
    /// enumerates the board population region-major. Construction runs the
    /// full channel assignment (conversion, validity filtering, |bend|
    /// ordering, early input truncation). Any configuration-contract
    /// violation is fatal here, before any routing state exists.
    pub fn new<G: Geometry>(
        cfg: BoardConfig,
        board_id: usize,
        modules: &[Vec<HitRecord>],
        geometry: &G,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        if board_id >= cfg.boards() {
            return Err(ConfigError::BoardId {
                board_id,
                boards: cfg.boards(),
            });
        }
        let total: usize = modules.iter().map(Vec::len).sum();
        let mut arena = StubArena::with_capacity(total);
        let mut lost = vec![Vec::new(); cfg.regions];
        let input = channel::assign(&cfg, geometry, modules, &mut arena, &mut lost)?;
        Ok(Self {
            cfg,
            region: board_id / cfg.boards_per_region,
            board: board_id % cfg.boards_per_region,
            arena,
            input,
            lost,
        })
    }

    /// Detector region this board sits in.
    #[must_use]
    pub fn region(&self) -> usize {
        self.region
    }

    /// Board index within its detector region.
    #[must_use]
    pub fn board(&self) -> usize {
        self.board
    }

    /// Number of stubs that passed the validity predicate at assignment.
    #[must_use]
    pub fn stub_count(&self) -> usize {
        self.arena.len()
    }

    /// Runs both routing stages and emits every stream into the sinks.
    ///
    /// Consumes the board: the channels are drained destructively and the
    /// emulation is cycle-accurate, so a unit is routed exactly once and
    /// either completes fully or (when dropped instead) contributes nothing.
    pub fn produce(mut self, accepted: &mut FrameProduct, lost: &mut FrameProduct) {
        let cfg = self.cfg;
        // Stage 1: merge each routing block's channels into one stream.
        let mut merge_lost: Vec<StubRef> = Vec::new();
        let block_streams: Vec<Vec<Slot>> = self
            .input
            .iter_mut()
            .map(|channels| router::merge(&cfg, channels, &mut merge_lost))
            .collect();
        // A stub lost in stage 1 counts once in every region it belongs to.
        for (region, sink) in self.lost.iter_mut().enumerate() {
            sink.extend(
                merge_lost
                    .iter()
                    .copied()
                    .filter(|&stub| self.arena.get(stub).regions.contains(region)),
            );
        }
        // Stage 2: mask per region, then merge across routing blocks.
        let mut region_streams: Vec<Vec<Slot>> = Vec::with_capacity(cfg.regions);
        for region in 0..cfg.regions {
            let mut masked = router::split_region(&self.arena, &block_streams, region);
            region_streams.push(router::merge(&cfg, &mut masked, &mut self.lost[region]));
        }
        telemetry::board_summary(
            self.region,
            self.board,
            region_streams
                .iter()
                .map(|stream| stream.iter().flatten().count())
                .sum(),
            self.lost.iter().map(Vec::len).sum(),
        );
        // Fill the products: one output channel per overlapping region.
        for (channel, slots) in region_streams.iter().enumerate() {
            accepted.set_stream(self.key(channel), frame::emit(&self.arena, slots, channel));
        }
        for (channel, refs) in self.lost.iter().enumerate() {
            let slots: Vec<Slot> = refs.iter().copied().map(Some).collect();
            lost.set_stream(self.key(channel), frame::emit(&self.arena, &slots, channel));
        }
    }

    fn key(&self, channel: usize) -> ChannelKey {
        ChannelKey {
            region: self.region,
            board: self.board,
            channel,
        }
    }
}

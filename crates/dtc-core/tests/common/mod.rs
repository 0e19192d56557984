// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use dtc_core::{
    Board, BoardConfig, ChannelKey, FrameProduct, Geometry, HitId, HitRecord, Stream,
};

/// Tiny deterministic RNG (xorshift64*) so tests don't need `rand`.
#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a new PRNG with the given seed (0 is bumped to 1; a zero
    /// state would produce all-zero output in xorshift).
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Returns the next pseudo-random `u64` in the xorshift64* sequence.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Returns a pseudo-random value in `0..bound`.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

/// Seeds shared across the deterministic suites.
pub const SEEDS: &[u64] = &[0x1, 0xDEAD_BEEF, 0xC0FF_EE00_1234_5678];

/// Geometry used across the integration suite.
///
/// Validity cuts the bend magnitude at `bend_cut`. With two overlapping
/// regions, region 0 takes `bend <= overlap` and region 1 takes
/// `bend >= -overlap`, so the band `[-overlap, overlap]` belongs to both and
/// every valid hit belongs to at least one region.
pub struct SplitGeometry {
    pub bend_cut: u32,
    pub overlap: i32,
}

impl Geometry for SplitGeometry {
    fn is_valid(&self, _module: usize, hit: &HitRecord) -> bool {
        hit.bend.unsigned_abs() <= self.bend_cut
    }

    fn in_region(&self, _module: usize, hit: &HitRecord, region: usize) -> bool {
        match region {
            0 => hit.bend <= self.overlap,
            1 => hit.bend >= -self.overlap,
            _ => false,
        }
    }
}

/// Geometry that accepts everything into every region; useful for timing
/// fixtures where membership is not the point.
pub struct AllRegions;

impl Geometry for AllRegions {
    fn is_valid(&self, _module: usize, _hit: &HitRecord) -> bool {
        true
    }

    fn in_region(&self, _module: usize, _hit: &HitRecord, _region: usize) -> bool {
        true
    }
}

/// Default split geometry for the suite.
pub fn split_geometry() -> SplitGeometry {
    SplitGeometry {
        bend_cut: 64,
        overlap: 1,
    }
}

/// A hardware-shaped configuration, scaled down for test speed.
pub fn suite_config() -> BoardConfig {
    BoardConfig {
        channels_per_block: 6,
        routing_blocks: 2,
        board_regions: 3,
        boards_per_region: 4,
        regions: 2,
        stack_depth: 8,
        input_capacity: 12,
        output_capacity: 18,
        truncation: true,
    }
}

/// Builds a hit record.
pub fn hit(id: u64, bend: i32) -> HitRecord {
    HitRecord {
        id: HitId::from_raw(id),
        bend,
    }
}

/// Generates pseudo-random per-module hits with unique ids.
///
/// Bends span `[-80, 80]`, so some hits fail the suite geometry's validity
/// cut of 64.
pub fn random_modules(rng: &mut XorShift64, cfg: &BoardConfig, max_hits: u64) -> Vec<Vec<HitRecord>> {
    let mut next_id = 1u64;
    (0..cfg.modules_per_board())
        .map(|_| {
            let count = rng.next_below(max_hits + 1);
            (0..count)
                .map(|_| {
                    let id = next_id;
                    next_id += 1;
                    let bend = i32::try_from(rng.next_below(161)).expect("bounded") - 80;
                    hit(id, bend)
                })
                .collect()
        })
        .collect()
}

/// Routes one board and returns its `(accepted, lost)` products.
pub fn route<G: Geometry>(
    cfg: BoardConfig,
    board_id: usize,
    modules: &[Vec<HitRecord>],
    geometry: &G,
) -> (FrameProduct, FrameProduct) {
    let board = Board::new(cfg, board_id, modules, geometry).expect("board construction");
    let mut accepted = FrameProduct::new();
    let mut lost = FrameProduct::new();
    board.produce(&mut accepted, &mut lost);
    (accepted, lost)
}

/// Extracts the hit ids of the occupied slots of `stream`, in tick order.
pub fn occupied_ids(stream: &Stream) -> Vec<u64> {
    stream
        .iter()
        .flatten()
        .map(|(id, _)| id.value())
        .collect()
}

/// Renders `stream` as `Some(id)` / `None` per slot, in tick order.
pub fn slot_ids(stream: &Stream) -> Vec<Option<u64>> {
    stream
        .iter()
        .map(|slot| slot.as_ref().map(|(id, _)| id.value()))
        .collect()
}

/// Decodes the producing module index out of an emitted frame.
pub fn frame_module(frame: &dtc_core::Frame) -> u64 {
    let bytes = frame.bytes();
    let mut module = [0u8; 8];
    module.copy_from_slice(&bytes[8..16]);
    u64::from_le_bytes(module)
}

/// Looks up a stream of board `board_id` under `cfg`, by output channel.
pub fn stream_of<'a>(
    product: &'a FrameProduct,
    cfg: &BoardConfig,
    board_id: usize,
    channel: usize,
) -> &'a Stream {
    let key = ChannelKey {
        region: board_id / cfg.boards_per_region,
        board: board_id % cfg.boards_per_region,
        channel,
    };
    product.stream(key).expect("stream present for channel key")
}

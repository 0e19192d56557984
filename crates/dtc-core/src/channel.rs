// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Channel assignment: converts raw per-module hits into sorted,
//! capacity-limited routing-block input channels.

use std::collections::VecDeque;

use crate::config::{BoardConfig, ConfigError, Geometry};
use crate::router::Slot;
use crate::stub::{HitRecord, RegionSet, StubArena, StubRecord, StubRef};

/// Input channels of one routing block, indexed by channel.
pub(crate) type BlockChannels = Vec<VecDeque<Slot>>;

/// Runs the full assignment for one board.
///
/// Module `m` feeds channel `(m / channels_per_block, m % channels_per_block)`.
/// Hits failing the validity capability produce no stub; survivors are
/// arena-allocated with their region membership evaluated once and cached.
/// Each channel is then stably sorted ascending by `|bend|` (equal magnitudes
/// keep their input order), and, with truncation enabled, every stub at or
/// past the input capacity is removed and appended, in pre-truncation order,
/// to the lost accumulator of every region it belongs to.
pub(crate) fn assign<G: Geometry>(
    cfg: &BoardConfig,
    geometry: &G,
    modules: &[Vec<HitRecord>],
    arena: &mut StubArena,
    lost: &mut [Vec<StubRef>],
) -> Result<Vec<BlockChannels>, ConfigError> {
    if modules.len() != cfg.modules_per_board() {
        return Err(ConfigError::ModuleCount {
            expected: cfg.modules_per_board(),
            got: modules.len(),
        });
    }
    let mut input: Vec<BlockChannels> =
        vec![vec![VecDeque::new(); cfg.channels_per_block]; cfg.routing_blocks];
    for (module, hits) in modules.iter().enumerate() {
        if hits.is_empty() {
            continue;
        }
        let block = module / cfg.channels_per_block;
        let channel = module % cfg.channels_per_block;
        let mut stubs: Vec<StubRef> = Vec::with_capacity(hits.len());
        for hit in hits {
            if !geometry.is_valid(module, hit) {
                continue;
            }
            let mut regions = RegionSet::empty();
            for region in 0..cfg.regions {
                if geometry.in_region(module, hit, region) {
                    regions.insert(region);
                }
            }
            stubs.push(arena.alloc(StubRecord {
                id: hit.id,
                module,
                bend: hit.bend,
                regions,
            }));
        }
        // The |bend| order is the tie-break rule the hardware truncates by.
        stubs.sort_by_key(|&stub| arena.get(stub).bend_abs());
        if cfg.truncation && stubs.len() > cfg.input_capacity {
            let truncated = stubs.split_off(cfg.input_capacity);
            for (region, sink) in lost.iter_mut().enumerate() {
                sink.extend(
                    truncated
                        .iter()
                        .copied()
                        .filter(|&stub| arena.get(stub).regions.contains(region)),
                );
            }
        }
        input[block][channel] = stubs.into_iter().map(Some).collect();
    }
    Ok(input)
}

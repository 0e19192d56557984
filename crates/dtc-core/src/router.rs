// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cycle-accurate merge engine and the per-region mask projection.
//!
//! Each trip through the merge loop models one clock tick of the firmware:
//! every input channel feeds its holding buffer, then at most one stub is
//! routed to the output. Arbitration is fixed priority by descending channel
//! index. That rule looks arbitrary but is load-bearing: it reproduces the
//! synthesized arbiter exactly, so it must not be rebalanced into anything
//! fairer.

use std::collections::VecDeque;

use crate::config::BoardConfig;
use crate::stub::{StubArena, StubRef};

/// One slot of a channel or output stream.
///
/// `None` is a gap: a tick that advanced the stream without carrying a stub.
/// Gaps encode real timing and survive until the final trailing compaction.
pub(crate) type Slot = Option<StubRef>;

/// Merges `inputs` into a single time-ordered output stream.
///
/// Channels are drained destructively, front to back. With truncation
/// enabled, a holding buffer already at `stack_depth - 1` entries evicts its
/// oldest entry into `lost` before accepting a new arrival, and stubs past
/// the output capacity follow them (order preserved). Trailing gaps are
/// compacted away; interior gaps are kept.
///
/// The result is a pure function of the channel contents and the
/// configuration constants.
pub(crate) fn merge(
    cfg: &BoardConfig,
    inputs: &mut [VecDeque<Slot>],
    lost: &mut Vec<StubRef>,
) -> Vec<Slot> {
    let mut stacks: Vec<VecDeque<StubRef>> = vec![VecDeque::new(); inputs.len()];
    let mut output: Vec<Slot> = Vec::new();
    while !inputs.iter().all(VecDeque::is_empty) || !stacks.iter().all(VecDeque::is_empty) {
        // Fill phase: each channel surrenders one slot per tick. A gap
        // advances the channel but feeds nothing.
        for (input, stack) in inputs.iter_mut().zip(stacks.iter_mut()) {
            let Some(slot) = input.pop_front() else {
                continue;
            };
            let Some(stub) = slot else {
                continue;
            };
            if cfg.truncation && stack.len() == cfg.stack_depth - 1 {
                // FIFO overflow: the oldest entry is killed so the newest
                // arrival always wins the last slot.
                if let Some(evicted) = stack.pop_front() {
                    lost.push(evicted);
                }
            }
            stack.push_back(stub);
        }
        // Route phase: highest channel index wins, one stub per tick.
        let routed = stacks.iter_mut().rev().find_map(VecDeque::pop_front);
        // Every tick grows the output by exactly one slot, occupied or not.
        output.push(routed);
    }
    if cfg.truncation && output.len() > cfg.output_capacity {
        lost.extend(output.drain(cfg.output_capacity..).flatten());
    }
    while output.last().is_some_and(Option::is_none) {
        output.pop();
    }
    output
}

/// Projects stage-1 block streams through `region`'s membership mask.
///
/// Slot positions are preserved exactly: a non-member or empty slot becomes a
/// gap at the same tick, so the stage-2 merge sees the timing the hardware
/// sees.
pub(crate) fn split_region(
    arena: &StubArena,
    block_streams: &[Vec<Slot>],
    region: usize,
) -> Vec<VecDeque<Slot>> {
    block_streams
        .iter()
        .map(|stream| {
            stream
                .iter()
                .copied()
                .map(|slot| slot.filter(|&stub| arena.get(stub).regions.contains(region)))
                .collect()
        })
        .collect()
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire frame encoding for emitted streams.

use bytes::Bytes;

use crate::router::Slot;
use crate::stub::{HitId, StubArena, StubRecord};

/// Serialized frame length in bytes.
pub const FRAME_BYTES: usize = 32;

/// Opaque fixed-size wire payload for one routed stub.
///
/// Layout (little-endian, always [`FRAME_BYTES`] bytes):
/// - bytes 0..8: hit identifier
/// - bytes 8..16: producing module index
/// - bytes 16..24: output channel index
/// - bytes 24..28: signed bend
/// - bytes 28..32: region membership bits
///
/// The payload is keyed by the output channel it is emitted on; the same
/// stub serializes differently on different channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Bytes);

impl Frame {
    /// Raw payload bytes; always exactly [`FRAME_BYTES`] long.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.0
    }
}

/// One emitted slot: the routed stub's identifier and frame, or `None` for a
/// tick that carried nothing.
pub type EmittedSlot = Option<(HitId, Frame)>;

/// One output channel's worth of emitted slots, in tick order.
pub type Stream = Vec<EmittedSlot>;

/// Encodes `stub` for emission on output channel `channel`.
pub(crate) fn encode_frame(stub: &StubRecord, channel: usize) -> Frame {
    let mut buf = Vec::with_capacity(FRAME_BYTES);
    buf.extend_from_slice(&stub.id.value().to_le_bytes());
    buf.extend_from_slice(&(stub.module as u64).to_le_bytes());
    buf.extend_from_slice(&(channel as u64).to_le_bytes());
    buf.extend_from_slice(&stub.bend.to_le_bytes());
    buf.extend_from_slice(&stub.regions.bits().to_le_bytes());
    Frame(Bytes::from(buf))
}

/// Maps routed slots onto the wire format for output channel `channel`.
///
/// A pure per-element mapping: no filtering, no reordering, gaps stay gaps.
pub(crate) fn emit(arena: &StubArena, slots: &[Slot], channel: usize) -> Stream {
    slots
        .iter()
        .map(|slot| {
            slot.map(|handle| {
                let stub = arena.get(handle);
                (stub.id, encode_frame(stub, channel))
            })
        })
        .collect()
}

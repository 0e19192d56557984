// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Keyed output sink for emitted streams.
//!
//! Determinism contract
//! - Streams are keyed by `(detector region, board, output channel)` in a
//!   `BTreeMap`, so iteration order is ascending and stable.
//! - [`FrameProduct::digest`] is a BLAKE3 digest over a canonical byte
//!   stream: a format version tag, the stream count, and per stream the key,
//!   the slot count, and each slot's presence tag plus hit id and frame
//!   bytes. All integers are 8-byte little-endian except the 2-byte version
//!   tag; changing any of this changes digests and must be treated as a
//!   breaking change.

use std::collections::BTreeMap;

use blake3::Hasher;

use crate::frame::Stream;

/// Canonical 256-bit digest used for replay comparisons.
pub type Digest = [u8; 32];

/// Identifies one output channel across the full board population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelKey {
    /// Detector region the board sits in.
    pub region: usize,
    /// Board index within its detector region.
    pub board: usize,
    /// Output channel index on the board.
    pub channel: usize,
}

/// Accumulates emitted streams keyed by `(region, board, channel)`.
///
/// One product instance typically collects the streams of many boards; the
/// keys partition it so independent boards never contend for the same entry.
#[derive(Debug, Clone, Default)]
pub struct FrameProduct {
    streams: BTreeMap<ChannelKey, Stream>,
}

impl FrameProduct {
    /// Creates an empty product.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `stream`, replacing any previous stream under the same key.
    pub fn set_stream(&mut self, key: ChannelKey, stream: Stream) {
        self.streams.insert(key, stream);
    }

    /// Returns the stream stored under `key`, if any.
    #[must_use]
    pub fn stream(&self, key: ChannelKey) -> Option<&Stream> {
        self.streams.get(&key)
    }

    /// Iterates all streams in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ChannelKey, &Stream)> {
        self.streams.iter()
    }

    /// Number of streams stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Returns true when no stream has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Total occupied slots across all streams.
    #[must_use]
    pub fn stub_count(&self) -> usize {
        self.streams
            .values()
            .map(|stream| stream.iter().filter(|slot| slot.is_some()).count())
            .sum()
    }

    /// Canonical digest of the full ordered content.
    ///
    /// Two runs over identical inputs and configuration produce identical
    /// digests; see the module docs for the committed encoding.
    #[must_use]
    pub fn digest(&self) -> Digest {
        let mut hasher = Hasher::new();
        // Product format version tag.
        hasher.update(&1u16.to_le_bytes());
        hasher.update(&(self.streams.len() as u64).to_le_bytes());
        for (key, stream) in &self.streams {
            hasher.update(&(key.region as u64).to_le_bytes());
            hasher.update(&(key.board as u64).to_le_bytes());
            hasher.update(&(key.channel as u64).to_le_bytes());
            hasher.update(&(stream.len() as u64).to_le_bytes());
            for slot in stream {
                match slot {
                    None => {
                        hasher.update(&[0u8]);
                    }
                    Some((id, frame)) => {
                        hasher.update(&[1u8]);
                        hasher.update(&id.value().to_le_bytes());
                        hasher.update(frame.bytes());
                    }
                }
            }
        }
        hasher.finalize().into()
    }

    /// Lowercase hex rendering of [`Self::digest`].
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

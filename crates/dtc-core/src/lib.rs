// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! dtc-core: deterministic cycle-accurate stub routing for tracker DTC
//! boards.
//!
//! The crate emulates, tick for tick, the two-stage router of one detector
//! readout board: per-module input channels feed fixed-depth holding
//! buffers that are drained onto per-region output channels under a
//! one-stub-per-tick bandwidth limit, with hardware-exact truncation
//! accounting. Overflow is never an error: every stub that fails to route
//! is recorded, in order, in the lost stream of each region it belongs to.
//!
//! Each [`Board`] is one self-contained processing unit. Construction runs
//! channel assignment; [`Board::produce`] runs stage-1 merges per routing
//! block, the per-region split, stage-2 merges, and emission into two
//! [`FrameProduct`] sinks (accepted and lost). The whole pipeline is a pure
//! function of its inputs and the [`BoardConfig`] constants, which
//! [`FrameProduct::digest`] makes checkable.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod board;
mod channel;
mod config;
mod frame;
mod product;
mod router;
mod stub;
mod telemetry;

/// Per-board orchestration of the two routing stages.
pub use board::Board;
/// Geometry constants, the capability seam, and fatal construction errors.
pub use config::{BoardConfig, ConfigError, Geometry};
/// Wire frames and emitted stream types.
pub use frame::{EmittedSlot, Frame, Stream, FRAME_BYTES};
/// Keyed output sink with canonical digests for replay comparison.
pub use product::{ChannelKey, Digest, FrameProduct};
/// Stub records, identifiers, region masks, and the per-board arena.
pub use stub::{HitId, HitRecord, RegionSet, StubArena, StubRecord, StubRef};

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

// Telemetry helpers for JSONL logging when the `telemetry` feature is
// enabled. Manually formats JSON to avoid a non-deterministic serde_json
// dependency. Observability only: every lost stub is already accounted for
// in the lost streams, so nothing here is load-bearing.

#[cfg(feature = "telemetry")]
fn ts_micros() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros()
}

/// Emits a per-board routing summary once both stages have completed.
///
/// Logs the board coordinates, the routed stub count, and the per-region
/// lost total as a JSON line to stdout. Best-effort: I/O errors are ignored
/// and timestamps fall back to 0 on clock errors.
#[cfg(feature = "telemetry")]
pub(crate) fn board_summary(region: usize, board: usize, routed: usize, lost: usize) {
    use std::io::Write as _;
    let mut out = std::io::stdout().lock();
    let _ = write!(
        out,
        r#"{{"timestamp_micros":{},"event":"board_routed","region":{},"board":{},"routed":{},"lost":{}}}"#,
        ts_micros(),
        region,
        board,
        routed,
        lost
    );
    let _ = out.write_all(b"\n");
}

#[cfg(not(feature = "telemetry"))]
#[inline]
pub(crate) fn board_summary(_region: usize, _board: usize, _routed: usize, _lost: usize) {}

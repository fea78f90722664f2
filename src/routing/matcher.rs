//! Exact segment matching.
//!
//! # Responsibilities
//! - Locate the `/` separators of a request path
//! - Verify literal segments byte-for-byte (case-sensitive)
//! - Capture parameter segments into a pooled buffer, left to right
//!
//! # Design Decisions
//! - Segment count mismatch fails before any buffer is drawn
//! - The buffer is drawn lazily on the first parameter segment
//! - A failed literal drops the guard, returning the buffer to the pool

use crate::routing::params::{ParamPool, ParamSpan, PooledSpans};
use crate::routing::pattern::{CompiledPattern, Segment, SEPARATOR};

/// Captured parameter spans; `None` when the pattern has no parameters.
pub type Captured<'a> = Option<PooledSpans<'a>>;

/// Byte offsets of every separator in `path`.
pub fn slash_offsets(path: &str) -> Vec<usize> {
    path.bytes()
        .enumerate()
        .filter(|(_, b)| *b == SEPARATOR)
        .map(|(i, _)| i)
        .collect()
}

/// Match `path`, pre-split at `slashes`, against a compiled pattern.
///
/// Returns `None` on mismatch. `slashes` must be `slash_offsets(path)`.
pub fn match_segments<'a>(
    pattern: &CompiledPattern,
    slashes: &[usize],
    path: &str,
    pool: &'a ParamPool,
) -> Option<Captured<'a>> {
    let segments = pattern.segments();
    if segments.len() != slashes.len() {
        return None;
    }

    let bytes = path.as_bytes();
    let mut captured: Captured<'a> = None;
    for (i, segment) in segments.iter().enumerate() {
        let start = slashes[i] + 1;
        let end = slashes.get(i + 1).copied().unwrap_or(bytes.len());
        match segment {
            Segment::Param(_) => {
                captured
                    .get_or_insert_with(|| pool.acquire())
                    .push(ParamSpan { segment: i, start, end });
            }
            Segment::Literal(text) => {
                if text.as_bytes() != &bytes[start..end] {
                    return None;
                }
            }
        }
    }
    Some(captured)
}

//! Optional listeners layered on top of the swipe state machine.
//!
//! Observers see the same session lifecycle as the swipe classifier (start,
//! centroid moves, end) but keep their own state and report through their own
//! callbacks. They cannot change the swipe verdict or the consumed flag.

mod long_press;
mod trace;

pub use long_press::{LongPress, LongPressDetector, LongPressInvalidReason, LongPressResult};
pub use trace::{CentroidTrace, TraceRecorder, TraceSample, TRACE_SAMPLE_CAPACITY};

use crate::types::Point;

/// A session was (re)baselined. Re-baselining on an extra finger reports a new
/// start without an end for the previous baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionStart {
    pub fingers: u8,
    pub centroid: Option<Point>,
    pub time_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEnd {
    /// Tracked fingers lifted; a swipe result was emitted for this session.
    Finished {
        time_ms: u64,
        centroid: Option<Point>,
    },
    Cancelled {
        time_ms: u64,
    },
    /// Dropped without a result (vanished pointer, unsupported finger count,
    /// or a fresh touch stream).
    Discarded {
        time_ms: u64,
    },
}

pub trait SessionObserver {
    fn on_session_start(&mut self, start: SessionStart);

    fn on_session_move(&mut self, centroid: Point, time_ms: u64);

    fn on_session_end(&mut self, end: SessionEnd);
}

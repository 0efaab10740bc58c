//! Real-time 3-5 finger swipe recognition over raw multi-touch frames.
//!
//! The host forwards every touch frame to [`SwipeDetector::on_touch_frame`],
//! which reports whether the frame was consumed and, when the tracked fingers
//! lift, delivers exactly one [`SwipeResult`] to the result callback.

pub mod config;
pub mod detector;
pub mod observers;
pub mod types;

pub use config::{ConfigError, DetectorConfig, LongPressThresholds, SwipeThresholds};
pub use detector::SwipeDetector;
pub use observers::{
    CentroidTrace, LongPress, LongPressDetector, LongPressInvalidReason, LongPressResult,
    SessionEnd, SessionObserver, SessionStart, TraceRecorder, TraceSample,
};
pub use types::{
    Direction, FrameAction, FrameSnapshot, Gesture, InvalidReason, Point, PointerId,
    SwipeMetrics, SwipeResult, TouchFrame,
};

use serde::Serialize;

use crate::types::Point;

use super::{SessionEnd, SessionObserver, SessionStart};

pub const TRACE_SAMPLE_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TraceSample {
    pub t_ms: u64,
    pub x: f32,
    pub y: f32,
}

impl TraceSample {
    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Raw centroid path of one finished session, for hosts that run their own
/// recognition on top of the swipe detector.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CentroidTrace {
    pub fingers: u8,
    pub samples: Vec<TraceSample>,
    pub start_time_ms: u64,
    pub end_time_ms: u64,
    pub net_distance_px: f32,
    pub total_path_px: f32,
    /// Samples past [`TRACE_SAMPLE_CAPACITY`] were dropped.
    pub overflow: bool,
}

struct Recording {
    fingers: u8,
    start_ms: u64,
    samples: heapless::Vec<TraceSample, TRACE_SAMPLE_CAPACITY>,
    overflow: bool,
}

impl Recording {
    fn push(&mut self, t_ms: u64, point: Point) {
        let sample = TraceSample {
            t_ms,
            x: point.x,
            y: point.y,
        };
        if self.samples.push(sample).is_err() {
            self.overflow = true;
        }
    }

    fn finish(self, end_ms: u64) -> CentroidTrace {
        let total_path_px = self
            .samples
            .windows(2)
            .map(|pair| pair[0].point().distance_to(pair[1].point()))
            .sum::<f32>();
        let net_distance_px = match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => first.point().distance_to(last.point()),
            _ => 0.0,
        };

        CentroidTrace {
            fingers: self.fingers,
            samples: self.samples.iter().copied().collect(),
            start_time_ms: self.start_ms,
            end_time_ms: end_ms,
            net_distance_px,
            total_path_px,
            overflow: self.overflow,
        }
    }
}

/// Records the centroid samples of each session, restarting on every
/// baseline, and emits them when the session finishes.
pub struct TraceRecorder<F>
where
    F: FnMut(&CentroidTrace),
{
    recording: Option<Recording>,
    on_trace: F,
}

impl<F> TraceRecorder<F>
where
    F: FnMut(&CentroidTrace),
{
    pub fn new(on_trace: F) -> Self {
        Self {
            recording: None,
            on_trace,
        }
    }
}

impl<F> SessionObserver for TraceRecorder<F>
where
    F: FnMut(&CentroidTrace),
{
    fn on_session_start(&mut self, start: SessionStart) {
        let mut recording = Recording {
            fingers: start.fingers,
            start_ms: start.time_ms,
            samples: heapless::Vec::new(),
            overflow: false,
        };
        if let Some(centroid) = start.centroid {
            recording.push(start.time_ms, centroid);
        }
        self.recording = Some(recording);
    }

    fn on_session_move(&mut self, centroid: Point, time_ms: u64) {
        if let Some(recording) = &mut self.recording {
            recording.push(time_ms, centroid);
        }
    }

    fn on_session_end(&mut self, end: SessionEnd) {
        let Some(mut recording) = self.recording.take() else {
            return;
        };

        if let SessionEnd::Finished { time_ms, centroid } = end {
            if let Some(centroid) = centroid {
                let last = recording.samples.last().map(TraceSample::point);
                if last != Some(centroid) {
                    recording.push(time_ms, centroid);
                }
            }
            let trace = recording.finish(time_ms);
            (self.on_trace)(&trace);
        }
    }
}

use serde::Serialize;

use crate::{
    config::{DetectorConfig, LongPressThresholds},
    types::Point,
};

use super::{SessionEnd, SessionObserver, SessionStart};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LongPress {
    pub fingers: u8,
    pub held_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LongPressInvalidReason {
    HoldTooShort,
    Moved,
    FingerChanged,
    Incomplete,
}

impl LongPressInvalidReason {
    pub fn label(self) -> &'static str {
        match self {
            LongPressInvalidReason::HoldTooShort => "hold_too_short",
            LongPressInvalidReason::Moved => "moved",
            LongPressInvalidReason::FingerChanged => "finger_changed",
            LongPressInvalidReason::Incomplete => "incomplete",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LongPressResult {
    pub fingers: u8,
    pub held_ms: u64,
    pub long_press: Option<LongPress>,
    pub invalid_reason: Option<LongPressInvalidReason>,
}

#[derive(Clone, Copy, Debug)]
struct Hold {
    fingers: u8,
    origin: Option<Point>,
    start_ms: u64,
    armed: bool,
    left_before_armed: bool,
    moved_after_armed: bool,
    finger_changed: bool,
}

impl Hold {
    fn new(start: SessionStart) -> Self {
        Self {
            fingers: start.fingers,
            origin: start.centroid,
            start_ms: start.time_ms,
            armed: false,
            left_before_armed: false,
            moved_after_armed: false,
            finger_changed: false,
        }
    }

    fn observe_time(&mut self, time_ms: u64, hold_ms: u64) {
        if !self.left_before_armed && time_ms.saturating_sub(self.start_ms) >= hold_ms {
            self.armed = true;
        }
    }
}

/// Reports 3-5 finger presses held still for `hold_ms`.
///
/// A hold arms once it has stayed inside the tolerance radius for the full
/// hold time. Leaving the radius earlier hands the session to the swipe
/// classifier and no verdict is reported. Finger count changes before arming
/// restart the hold clock.
pub struct LongPressDetector<F>
where
    F: FnMut(&LongPressResult),
{
    thresholds: LongPressThresholds,
    hold: Option<Hold>,
    on_result: F,
}

impl<F> LongPressDetector<F>
where
    F: FnMut(&LongPressResult),
{
    pub fn new(touch_slop_px: f32, on_result: F) -> Self {
        Self::with_thresholds(
            DetectorConfig::from_touch_slop(touch_slop_px).long_press_thresholds(),
            on_result,
        )
    }

    pub fn with_thresholds(thresholds: LongPressThresholds, on_result: F) -> Self {
        Self {
            thresholds,
            hold: None,
            on_result,
        }
    }

    fn verdict(&self, hold: &Hold, end_ms: u64, end: Option<Point>) -> Option<LongPressResult> {
        if hold.left_before_armed {
            return None;
        }

        let held_ms = end_ms.saturating_sub(hold.start_ms);
        let invalid_reason = if hold.origin.is_none() || end.is_none() {
            Some(LongPressInvalidReason::Incomplete)
        } else if hold.finger_changed {
            Some(LongPressInvalidReason::FingerChanged)
        } else if hold.moved_after_armed {
            Some(LongPressInvalidReason::Moved)
        } else if !hold.armed {
            Some(LongPressInvalidReason::HoldTooShort)
        } else {
            None
        };

        Some(LongPressResult {
            fingers: hold.fingers,
            held_ms,
            long_press: match invalid_reason {
                None => Some(LongPress {
                    fingers: hold.fingers,
                    held_ms,
                }),
                Some(_) => None,
            },
            invalid_reason,
        })
    }
}

impl<F> SessionObserver for LongPressDetector<F>
where
    F: FnMut(&LongPressResult),
{
    fn on_session_start(&mut self, start: SessionStart) {
        let hold_ms = self.thresholds.hold_ms;
        if let Some(hold) = &mut self.hold {
            hold.observe_time(start.time_ms, hold_ms);
            if hold.armed {
                hold.finger_changed = true;
                return;
            }
        }
        self.hold = Some(Hold::new(start));
    }

    fn on_session_move(&mut self, centroid: Point, time_ms: u64) {
        let hold_ms = self.thresholds.hold_ms;
        let tolerance_px = self.thresholds.move_tolerance_px;
        let Some(hold) = &mut self.hold else {
            return;
        };

        hold.observe_time(time_ms, hold_ms);
        let Some(origin) = hold.origin else {
            hold.origin = Some(centroid);
            return;
        };
        if origin.distance_to(centroid) > tolerance_px {
            if hold.armed {
                hold.moved_after_armed = true;
            } else {
                hold.left_before_armed = true;
            }
        }
    }

    fn on_session_end(&mut self, end: SessionEnd) {
        let Some(mut hold) = self.hold.take() else {
            return;
        };

        if let SessionEnd::Finished { time_ms, centroid } = end {
            hold.observe_time(time_ms, self.thresholds.hold_ms);
            if let Some(result) = self.verdict(&hold, time_ms, centroid) {
                (self.on_result)(&result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(fingers: u8, x: f32, y: f32, time_ms: u64) -> SessionStart {
        SessionStart {
            fingers,
            centroid: Some(Point::new(x, y)),
            time_ms,
        }
    }

    fn finished(time_ms: u64, x: f32, y: f32) -> SessionEnd {
        SessionEnd::Finished {
            time_ms,
            centroid: Some(Point::new(x, y)),
        }
    }

    fn run(steps: impl FnOnce(&mut dyn SessionObserver)) -> Vec<LongPressResult> {
        let mut results = Vec::new();
        {
            let mut detector = LongPressDetector::new(10.0, |r: &LongPressResult| results.push(*r));
            steps(&mut detector);
        }
        results
    }

    #[test]
    fn still_hold_past_hold_time_is_valid() {
        let results = run(|d| {
            d.on_session_start(start(3, 100.0, 100.0, 0));
            d.on_session_move(Point::new(103.0, 101.0), 2_000);
            d.on_session_move(Point::new(104.0, 99.0), 5_200);
            d.on_session_end(finished(5_400, 104.0, 99.0));
        });

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].long_press,
            Some(LongPress {
                fingers: 3,
                held_ms: 5_400
            })
        );
        assert_eq!(results[0].invalid_reason, None);
    }

    #[test]
    fn short_still_press_reports_hold_too_short() {
        let results = run(|d| {
            d.on_session_start(start(4, 50.0, 50.0, 1_000));
            d.on_session_end(finished(2_500, 50.0, 50.0));
        });

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].invalid_reason,
            Some(LongPressInvalidReason::HoldTooShort)
        );
        assert_eq!(results[0].held_ms, 1_500);
    }

    #[test]
    fn early_motion_leaves_the_session_to_swipes() {
        let results = run(|d| {
            d.on_session_start(start(3, 500.0, 800.0, 0));
            d.on_session_move(Point::new(500.0, 700.0), 60);
            d.on_session_end(finished(6_000, 500.0, 700.0));
        });

        assert!(results.is_empty());
    }

    #[test]
    fn motion_after_arming_reports_moved() {
        let results = run(|d| {
            d.on_session_start(start(5, 0.0, 0.0, 0));
            d.on_session_move(Point::new(60.0, 0.0), 5_100);
            d.on_session_end(finished(5_300, 60.0, 0.0));
        });

        assert_eq!(results[0].invalid_reason, Some(LongPressInvalidReason::Moved));
    }

    #[test]
    fn finger_ramp_before_arming_restarts_the_clock() {
        let results = run(|d| {
            d.on_session_start(start(3, 0.0, 0.0, 0));
            d.on_session_start(start(4, 10.0, 0.0, 400));
            d.on_session_end(finished(5_200, 10.0, 0.0));
        });

        assert_eq!(
            results[0].invalid_reason,
            Some(LongPressInvalidReason::HoldTooShort)
        );
        assert_eq!(results[0].fingers, 4);
        assert_eq!(results[0].held_ms, 4_800);
    }

    #[test]
    fn finger_change_after_arming_is_reported() {
        let results = run(|d| {
            d.on_session_start(start(3, 0.0, 0.0, 0));
            d.on_session_start(start(4, 10.0, 0.0, 5_500));
            d.on_session_end(finished(6_000, 10.0, 0.0));
        });

        assert_eq!(
            results[0].invalid_reason,
            Some(LongPressInvalidReason::FingerChanged)
        );
        assert_eq!(results[0].fingers, 3);
    }

    #[test]
    fn cancelled_session_reports_nothing() {
        let results = run(|d| {
            d.on_session_start(start(3, 0.0, 0.0, 0));
            d.on_session_end(SessionEnd::Cancelled { time_ms: 6_000 });
        });

        assert!(results.is_empty());
    }

    #[test]
    fn missing_geometry_is_incomplete() {
        let results = run(|d| {
            d.on_session_start(SessionStart {
                fingers: 3,
                centroid: None,
                time_ms: 0,
            });
            d.on_session_end(SessionEnd::Finished {
                time_ms: 100,
                centroid: None,
            });
        });

        assert_eq!(
            results[0].invalid_reason,
            Some(LongPressInvalidReason::Incomplete)
        );
    }
}

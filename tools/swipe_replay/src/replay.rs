use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
use multiswipe::{
    CentroidTrace, DetectorConfig, FrameSnapshot, LongPressDetector, LongPressResult,
    SwipeDetector, SwipeResult, TouchFrame, TraceRecorder,
};
use serde::Serialize;

#[derive(Clone, Debug)]
pub struct ReplayOptions {
    pub config: DetectorConfig,
    pub long_press: bool,
    pub record_trace: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayEvent {
    Swipe(SwipeResult),
    LongPress(LongPressResult),
    Trace(CentroidTrace),
}

/// One callback delivery, stamped with the time of the frame that caused it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReplayRecord {
    pub t_ms: u64,
    #[serde(flatten)]
    pub event: ReplayEvent,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplayOutcome {
    pub records: Vec<ReplayRecord>,
    pub frames: usize,
    pub consumed: usize,
    /// The trace stopped while a session was still being tracked.
    pub unfinished: bool,
}

pub fn replay(frames: &[FrameSnapshot], options: &ReplayOptions) -> Result<ReplayOutcome> {
    let emitted = Rc::new(RefCell::new(Vec::<ReplayEvent>::new()));

    let sink = Rc::clone(&emitted);
    let mut detector = SwipeDetector::from_config(&options.config, move |result: &SwipeResult| {
        sink.borrow_mut().push(ReplayEvent::Swipe(*result))
    })?;
    if options.long_press {
        let sink = Rc::clone(&emitted);
        detector.add_observer(LongPressDetector::with_thresholds(
            options.config.long_press_thresholds(),
            move |result: &LongPressResult| sink.borrow_mut().push(ReplayEvent::LongPress(*result)),
        ));
    }
    if options.record_trace {
        let sink = Rc::clone(&emitted);
        detector.add_observer(TraceRecorder::new(move |trace: &CentroidTrace| {
            sink.borrow_mut().push(ReplayEvent::Trace(trace.clone()))
        }));
    }

    let mut outcome = ReplayOutcome {
        frames: frames.len(),
        ..ReplayOutcome::default()
    };
    for frame in frames {
        if detector.on_touch_frame(frame) {
            outcome.consumed += 1;
        }
        let t_ms = frame.time_ms();
        outcome.records.extend(
            emitted
                .borrow_mut()
                .drain(..)
                .map(|event| ReplayRecord { t_ms, event }),
        );
    }
    outcome.unfinished = detector.is_tracking();

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use multiswipe::{ConfigError, Direction, FrameAction, InvalidReason};

    use super::*;
    use crate::trace::parse_trace_str;

    const HOLD_THEN_LIFT: &str = "\
swipe_trace,0,pointer_down,3,0:100:100 1:200:100 2:300:100
swipe_trace,3000,move,3,0:101:100 1:201:100 2:301:100
swipe_trace,5200,move,3,0:100:100 1:200:100 2:300:100
swipe_trace,5300,pointer_up,3,0:100:100 1:200:100 2:300:100
";

    fn options(long_press: bool, record_trace: bool) -> ReplayOptions {
        ReplayOptions {
            config: DetectorConfig::from_touch_slop(10.0),
            long_press,
            record_trace,
        }
    }

    #[test]
    fn records_are_stamped_with_the_lifting_frame() {
        let frames = parse_trace_str(HOLD_THEN_LIFT).expect("trace");
        let outcome = replay(&frames, &options(false, false)).expect("replay");

        assert_eq!(outcome.frames, 4);
        assert_eq!(outcome.consumed, 4);
        assert!(!outcome.unfinished);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].t_ms, 5300);
        match &outcome.records[0].event {
            ReplayEvent::Swipe(result) => {
                assert_eq!(result.candidate_direction, Some(Direction::Right));
                assert_eq!(result.invalid_reason, Some(InvalidReason::TooShort));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn observers_report_before_the_swipe_result() {
        let frames = parse_trace_str(HOLD_THEN_LIFT).expect("trace");
        let outcome = replay(&frames, &options(true, true)).expect("replay");

        let kinds: Vec<&str> = outcome
            .records
            .iter()
            .map(|record| match record.event {
                ReplayEvent::LongPress(_) => "long_press",
                ReplayEvent::Trace(_) => "trace",
                ReplayEvent::Swipe(_) => "swipe",
            })
            .collect();
        assert_eq!(kinds, vec!["long_press", "trace", "swipe"]);
    }

    #[test]
    fn open_session_at_end_of_trace_is_flagged() {
        let frames = vec![FrameSnapshot::new(FrameAction::PointerAdded, 0)
            .with_pointer(0, 0.0, 0.0)
            .with_pointer(1, 10.0, 0.0)
            .with_pointer(2, 20.0, 0.0)];
        let outcome = replay(&frames, &options(false, false)).expect("replay");
        assert!(outcome.unfinished);
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut opts = options(false, false);
        opts.config.touch_slop_px = -1.0;
        let err = replay(&[], &opts).expect_err("negative slop");
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn records_serialize_with_kind_tag() {
        let frames = parse_trace_str(HOLD_THEN_LIFT).expect("trace");
        let outcome = replay(&frames, &options(false, false)).expect("replay");
        let value = serde_json::to_value(&outcome.records[0]).expect("json");
        assert_eq!(value["kind"], "swipe");
        assert_eq!(value["t_ms"], 5300);
        assert_eq!(value["invalid_reason"], "too_short");
    }
}

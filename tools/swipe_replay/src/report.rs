use multiswipe::{CentroidTrace, LongPressResult, SwipeResult};

use crate::replay::{ReplayEvent, ReplayRecord};

/// Column layout of `result` lines. `long_press` lines carry
/// `ms,label,fingers,held_ms`; `trace` lines carry
/// `ms,label,fingers,samples,start_ms,end_ms,net_distance_px,total_path_px,overflow`.
pub const CSV_HEADER: &str = "result,ms,label,fingers,candidate,primary_px,off_axis_px,opposite_px,end_primary_px,net_dx,net_dy,net_distance_px,total_path_px,linearity,duration_ms";

/// Stable label used in expectation files, e.g. `3f_up` or
/// `4f_invalid_too_short`.
pub fn record_label(event: &ReplayEvent) -> String {
    match event {
        ReplayEvent::Swipe(result) => swipe_label(result),
        ReplayEvent::LongPress(result) => long_press_label(result),
        ReplayEvent::Trace(trace) => format!("{}f_trace", trace.fingers),
    }
}

pub fn swipe_label(result: &SwipeResult) -> String {
    match (result.gesture, result.invalid_reason) {
        (Some(gesture), _) => format!("{}f_{}", gesture.fingers, gesture.direction.label()),
        (None, Some(reason)) => format!("{}f_invalid_{}", result.fingers, reason.label()),
        (None, None) => format!("{}f_unknown", result.fingers),
    }
}

pub fn long_press_label(result: &LongPressResult) -> String {
    match result.invalid_reason {
        None => format!("{}f_long_press", result.fingers),
        Some(reason) => format!("{}f_long_press_invalid_{}", result.fingers, reason.label()),
    }
}

pub fn format_record(record: &ReplayRecord) -> String {
    let label = record_label(&record.event);
    match &record.event {
        ReplayEvent::Swipe(result) => format_swipe(record.t_ms, &label, result),
        ReplayEvent::LongPress(result) => format!(
            "long_press,{},{},{},{}",
            record.t_ms, label, result.fingers, result.held_ms
        ),
        ReplayEvent::Trace(trace) => format_trace(record.t_ms, &label, trace),
    }
}

fn format_swipe(t_ms: u64, label: &str, result: &SwipeResult) -> String {
    let candidate = result.candidate_direction.map_or("", |d| d.label());
    let metrics = match result.metrics {
        Some(m) => format!(
            "{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.3},{}",
            m.primary_px,
            m.off_axis_px,
            m.opposite_px,
            m.end_primary_px,
            m.net_dx,
            m.net_dy,
            m.net_distance_px,
            m.total_path_px,
            m.linearity,
            m.duration_ms
        ),
        None => ",,,,,,,,,".to_string(),
    };
    format!("result,{t_ms},{label},{},{candidate},{metrics}", result.fingers)
}

fn format_trace(t_ms: u64, label: &str, trace: &CentroidTrace) -> String {
    format!(
        "trace,{},{},{},{},{},{},{:.1},{:.1},{}",
        t_ms,
        label,
        trace.fingers,
        trace.samples.len(),
        trace.start_time_ms,
        trace.end_time_ms,
        trace.net_distance_px,
        trace.total_path_px,
        trace.overflow
    )
}

#[cfg(test)]
mod tests {
    use multiswipe::{
        Direction, Gesture, InvalidReason, LongPress, LongPressInvalidReason, SwipeMetrics,
    };

    use super::*;

    fn metrics() -> SwipeMetrics {
        SwipeMetrics {
            primary_px: 240.0,
            off_axis_px: 2.0,
            opposite_px: 0.0,
            end_primary_px: 240.0,
            net_dx: 2.0,
            net_dy: -240.0,
            net_distance_px: 240.0,
            total_path_px: 241.0,
            linearity: 0.996,
            duration_ms: 105,
        }
    }

    #[test]
    fn swipe_labels_name_fingers_and_outcome() {
        let valid = SwipeResult {
            fingers: 3,
            candidate_direction: Some(Direction::Up),
            gesture: Some(Gesture {
                fingers: 3,
                direction: Direction::Up,
            }),
            invalid_reason: None,
            metrics: Some(metrics()),
        };
        assert_eq!(swipe_label(&valid), "3f_up");

        let invalid = SwipeResult {
            fingers: 4,
            candidate_direction: Some(Direction::Left),
            gesture: None,
            invalid_reason: Some(InvalidReason::EndMismatch),
            metrics: Some(metrics()),
        };
        assert_eq!(swipe_label(&invalid), "4f_invalid_end_mismatch");
    }

    #[test]
    fn long_press_labels() {
        let valid = LongPressResult {
            fingers: 5,
            held_ms: 5_200,
            long_press: Some(LongPress {
                fingers: 5,
                held_ms: 5_200,
            }),
            invalid_reason: None,
        };
        assert_eq!(long_press_label(&valid), "5f_long_press");

        let moved = LongPressResult {
            long_press: None,
            invalid_reason: Some(LongPressInvalidReason::Moved),
            ..valid
        };
        assert_eq!(long_press_label(&moved), "5f_long_press_invalid_moved");
    }

    #[test]
    fn result_line_matches_header_width() {
        let record = ReplayRecord {
            t_ms: 120,
            event: ReplayEvent::Swipe(SwipeResult {
                fingers: 3,
                candidate_direction: Some(Direction::Up),
                gesture: Some(Gesture {
                    fingers: 3,
                    direction: Direction::Up,
                }),
                invalid_reason: None,
                metrics: Some(metrics()),
            }),
        };
        let line = format_record(&record);
        assert_eq!(
            line,
            "result,120,3f_up,3,up,240.0,2.0,0.0,240.0,2.0,-240.0,240.0,241.0,0.996,105"
        );
        assert_eq!(line.split(',').count(), CSV_HEADER.split(',').count());
    }

    #[test]
    fn incomplete_result_leaves_metric_columns_empty() {
        let record = ReplayRecord {
            t_ms: 80,
            event: ReplayEvent::Swipe(SwipeResult {
                fingers: 3,
                candidate_direction: None,
                gesture: None,
                invalid_reason: Some(InvalidReason::Incomplete),
                metrics: None,
            }),
        };
        let line = format_record(&record);
        assert_eq!(line, "result,80,3f_invalid_incomplete,3,,,,,,,,,,,");
        assert_eq!(line.split(',').count(), CSV_HEADER.split(',').count());
    }
}

use crate::{
    config::SwipeThresholds,
    types::{Direction, Gesture, InvalidReason, SwipeMetrics, SwipeResult},
};

use super::session::{Excursion, TrackingSession};

pub(crate) fn classify_session(
    session: &TrackingSession,
    thresholds: &SwipeThresholds,
) -> SwipeResult {
    let (Some(start), Some(end)) = (session.start, session.last) else {
        return SwipeResult {
            fingers: session.fingers,
            candidate_direction: None,
            gesture: None,
            invalid_reason: Some(InvalidReason::Incomplete),
            metrics: None,
        };
    };

    // Peak excursion, not end position: an overshoot that partially retracts
    // is still measured at its furthest point.
    let excursion = &session.excursion;
    let direction = candidate_direction(excursion);
    let (primary_px, off_axis_px) = match direction {
        Direction::Left | Direction::Right => (best_horizontal(excursion), best_vertical(excursion)),
        Direction::Up | Direction::Down => (best_vertical(excursion), best_horizontal(excursion)),
    };
    let opposite_px = peak_toward(excursion, direction.opposite());

    let net_dx = end.x - start.x;
    let net_dy = end.y - start.y;
    let net_distance_px = net_dx.hypot(net_dy);
    let linearity = if session.total_path_px > 0.0 {
        (net_distance_px / session.total_path_px).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let end_primary_px = match direction {
        Direction::Right => net_dx,
        Direction::Left => -net_dx,
        Direction::Down => net_dy,
        Direction::Up => -net_dy,
    };

    let metrics = SwipeMetrics {
        primary_px,
        off_axis_px,
        opposite_px,
        end_primary_px,
        net_dx,
        net_dy,
        net_distance_px,
        total_path_px: session.total_path_px,
        linearity,
        duration_ms: session.duration_ms(),
    };

    let invalid_reason = validate(&metrics, thresholds);
    SwipeResult {
        fingers: session.fingers,
        candidate_direction: Some(direction),
        gesture: match invalid_reason {
            None => Some(Gesture {
                fingers: session.fingers,
                direction,
            }),
            Some(_) => None,
        },
        invalid_reason,
        metrics: Some(metrics),
    }
}

/// First failing rule wins; the order is part of the contract.
fn validate(metrics: &SwipeMetrics, thresholds: &SwipeThresholds) -> Option<InvalidReason> {
    let primary = metrics.primary_px;
    if primary < thresholds.min_distance_px {
        return Some(InvalidReason::TooShort);
    }
    if metrics.off_axis_px > primary * thresholds.max_off_axis_ratio {
        return Some(InvalidReason::OffAxis);
    }
    if metrics.opposite_px >= thresholds.reverse_min_distance_px
        && metrics.opposite_px > primary * thresholds.reverse_max_ratio
    {
        return Some(InvalidReason::Reversed);
    }
    if metrics.end_primary_px < primary * thresholds.end_keep_ratio {
        return Some(InvalidReason::EndMismatch);
    }
    if metrics.linearity < thresholds.min_linearity_ratio {
        return Some(InvalidReason::Wiggly);
    }
    None
}

/// Ties favor the horizontal axis, then Right over Left and Down over Up.
fn candidate_direction(excursion: &Excursion) -> Direction {
    if best_horizontal(excursion) >= best_vertical(excursion) {
        if excursion.peak_right() >= excursion.peak_left() {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if excursion.peak_down() >= excursion.peak_up() {
        Direction::Down
    } else {
        Direction::Up
    }
}

fn best_horizontal(excursion: &Excursion) -> f32 {
    excursion.peak_right().max(excursion.peak_left())
}

fn best_vertical(excursion: &Excursion) -> f32 {
    excursion.peak_down().max(excursion.peak_up())
}

fn peak_toward(excursion: &Excursion, direction: Direction) -> f32 {
    match direction {
        Direction::Right => excursion.peak_right(),
        Direction::Left => excursion.peak_left(),
        Direction::Down => excursion.peak_down(),
        Direction::Up => excursion.peak_up(),
    }
}

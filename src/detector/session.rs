use crate::types::{Point, PointerId, TouchFrame, MAX_SESSION_FINGERS};

/// Running extrema of the centroid offset from the start centroid. All four
/// start at zero, so each only grows in its own sign.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Excursion {
    pub(crate) max_dx: f32,
    pub(crate) min_dx: f32,
    pub(crate) max_dy: f32,
    pub(crate) min_dy: f32,
}

impl Excursion {
    fn include(&mut self, dx: f32, dy: f32) {
        if dx > self.max_dx {
            self.max_dx = dx;
        }
        if dx < self.min_dx {
            self.min_dx = dx;
        }
        if dy > self.max_dy {
            self.max_dy = dy;
        }
        if dy < self.min_dy {
            self.min_dy = dy;
        }
    }

    pub(crate) fn peak_right(&self) -> f32 {
        self.max_dx
    }

    pub(crate) fn peak_left(&self) -> f32 {
        0.0 - self.min_dx
    }

    pub(crate) fn peak_down(&self) -> f32 {
        self.max_dy
    }

    pub(crate) fn peak_up(&self) -> f32 {
        0.0 - self.min_dy
    }
}

/// Geometry of one baselined 3-5 finger press. Lives only as local storage of
/// the `tracking` state, so dropping it is the reset.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TrackingSession {
    pub(crate) fingers: u8,
    pub(crate) pointer_ids: heapless::Vec<PointerId, MAX_SESSION_FINGERS>,
    pub(crate) start: Option<Point>,
    pub(crate) last: Option<Point>,
    pub(crate) last_move: Option<Point>,
    pub(crate) excursion: Excursion,
    pub(crate) total_path_px: f32,
    pub(crate) start_ms: u64,
    pub(crate) last_ms: u64,
}

impl TrackingSession {
    pub(crate) fn begin(frame: &impl TouchFrame, fingers: u8) -> Self {
        let mut pointer_ids = heapless::Vec::new();
        for id in frame.pointer_ids() {
            if pointer_ids.push(id).is_err() {
                break;
            }
        }

        let start = strict_centroid(frame, &pointer_ids);
        let now_ms = frame.time_ms();
        Self {
            fingers,
            pointer_ids,
            start,
            last: start,
            last_move: start,
            excursion: Excursion::default(),
            total_path_px: 0.0,
            start_ms: now_ms,
            last_ms: now_ms,
        }
    }

    /// Folds a move frame into the session. Returns `None` when a tracked
    /// pointer can no longer be resolved; the caller must drop the session.
    pub(crate) fn track_move(&mut self, frame: &impl TouchFrame) -> Option<Point> {
        let current = strict_centroid(frame, &self.pointer_ids)?;
        let start = self.start?;
        self.last_ms = frame.time_ms();

        if let Some(prev) = self.last_move {
            self.total_path_px += prev.distance_to(current);
        }
        self.last_move = Some(current);
        self.last = Some(current);
        self.excursion.include(current.x - start.x, current.y - start.y);
        Some(current)
    }

    /// Best-effort end position when one finger lifts: tracked pointers
    /// missing from the frame drop out of the average, and the previous
    /// centroid is kept when none resolve.
    pub(crate) fn track_pointer_removed(&mut self, frame: &impl TouchFrame) {
        self.last_ms = frame.time_ms();
        if let Some(centroid) = partial_centroid(frame, &self.pointer_ids) {
            self.last = Some(centroid);
        }
    }

    /// The final up frame carries a single pointer, so a subset average would
    /// jump to that finger; only a complete centroid replaces the last one.
    pub(crate) fn track_up(&mut self, frame: &impl TouchFrame) {
        self.last_ms = frame.time_ms();
        if let Some(centroid) = strict_centroid(frame, &self.pointer_ids) {
            self.last = Some(centroid);
        }
    }

    pub(crate) fn duration_ms(&self) -> u64 {
        self.last_ms.saturating_sub(self.start_ms)
    }
}

/// Mean position of `ids`; `None` if any id is missing or the set is empty.
pub(crate) fn strict_centroid(frame: &impl TouchFrame, ids: &[PointerId]) -> Option<Point> {
    let mut sum_x = 0.0f32;
    let mut sum_y = 0.0f32;
    for id in ids {
        let point = frame.position(*id)?;
        sum_x += point.x;
        sum_y += point.y;
    }
    mean(sum_x, sum_y, ids.len())
}

/// Mean position of the resolvable subset of `ids`.
pub(crate) fn partial_centroid(frame: &impl TouchFrame, ids: &[PointerId]) -> Option<Point> {
    let mut sum_x = 0.0f32;
    let mut sum_y = 0.0f32;
    let mut count = 0usize;
    for point in ids.iter().filter_map(|id| frame.position(*id)) {
        sum_x += point.x;
        sum_y += point.y;
        count += 1;
    }
    mean(sum_x, sum_y, count)
}

fn mean(sum_x: f32, sum_y: f32, count: usize) -> Option<Point> {
    if count == 0 {
        return None;
    }
    let n = count as f32;
    Some(Point::new(sum_x / n, sum_y / n))
}

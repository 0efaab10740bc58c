use serde::Serialize;

/// Upper bound on pointers kept from one host frame.
pub const MAX_FRAME_POINTERS: usize = 10;
/// Largest finger count a swipe session can be baselined at.
pub const MAX_SESSION_FINGERS: usize = 5;
/// Smallest finger count a swipe session can be baselined at.
pub const MIN_SESSION_FINGERS: usize = 3;

pub type PointerId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameAction {
    /// First pointer of a new touch stream.
    Down,
    PointerAdded,
    Move,
    /// One of several active pointers lifted; it is still present in this frame.
    PointerRemoved,
    /// Last pointer lifted.
    Up,
    Cancel,
}

/// Read access to one host touch frame.
///
/// Any touch API that can list the active pointer ids and resolve an id to a
/// position is enough to drive the detector.
pub trait TouchFrame {
    fn action(&self) -> FrameAction;

    /// Active pointers as reported by the host, including a pointer that is
    /// being added or removed by this frame.
    fn pointer_count(&self) -> usize;

    /// Monotonic event time in milliseconds.
    fn time_ms(&self) -> u64;

    fn pointer_ids(&self) -> impl Iterator<Item = PointerId> + '_;

    fn position(&self, id: PointerId) -> Option<Point>;
}

/// Owned copy of a touch frame, bounded to [`MAX_FRAME_POINTERS`] pointers.
/// Ids whose position the host could not resolve stay listed without one.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    action: FrameAction,
    time_ms: u64,
    pointer_count: Option<usize>,
    pointers: heapless::Vec<(PointerId, Option<Point>), MAX_FRAME_POINTERS>,
}

impl FrameSnapshot {
    pub fn new(action: FrameAction, time_ms: u64) -> Self {
        Self {
            action,
            time_ms,
            pointer_count: None,
            pointers: heapless::Vec::new(),
        }
    }

    /// Copies `frame`. Pointers past the capacity are dropped from the
    /// position table but still counted.
    pub fn capture(frame: &impl TouchFrame) -> Self {
        let mut snapshot = Self::new(frame.action(), frame.time_ms());
        for id in frame.pointer_ids() {
            if snapshot.pointers.push((id, frame.position(id))).is_err() {
                break;
            }
        }
        snapshot.pointer_count = Some(frame.pointer_count());
        snapshot
    }

    pub fn with_pointer(mut self, id: PointerId, x: f32, y: f32) -> Self {
        self.push_pointer(id, Point::new(x, y));
        self
    }

    /// Overrides the reported pointer count; by default it equals the number
    /// of pointers added.
    pub fn with_pointer_count(mut self, count: usize) -> Self {
        self.pointer_count = Some(count);
        self
    }

    pub fn push_pointer(&mut self, id: PointerId, point: Point) -> bool {
        if let Some(slot) = self.pointers.iter_mut().find(|(existing, _)| *existing == id) {
            slot.1 = Some(point);
            return true;
        }
        self.pointers.push((id, Some(point))).is_ok()
    }
}

impl TouchFrame for FrameSnapshot {
    fn action(&self) -> FrameAction {
        self.action
    }

    fn pointer_count(&self) -> usize {
        self.pointer_count.unwrap_or(self.pointers.len())
    }

    fn time_ms(&self) -> u64 {
        self.time_ms
    }

    fn pointer_ids(&self) -> impl Iterator<Item = PointerId> + '_ {
        self.pointers.iter().map(|(id, _)| *id)
    }

    fn position(&self, id: PointerId) -> Option<Point> {
        self.pointers
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .and_then(|(_, point)| *point)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Gesture {
    pub fingers: u8,
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    TooShort,
    OffAxis,
    Reversed,
    EndMismatch,
    Wiggly,
    Incomplete,
}

impl InvalidReason {
    pub fn label(self) -> &'static str {
        match self {
            InvalidReason::TooShort => "too_short",
            InvalidReason::OffAxis => "off_axis",
            InvalidReason::Reversed => "reversed",
            InvalidReason::EndMismatch => "end_mismatch",
            InvalidReason::Wiggly => "wiggly",
            InvalidReason::Incomplete => "incomplete",
        }
    }
}

/// Geometry of a finished session. Peak values are excursions from the
/// start centroid; `net_*` values are end minus start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SwipeMetrics {
    pub primary_px: f32,
    pub off_axis_px: f32,
    pub opposite_px: f32,
    pub end_primary_px: f32,
    pub net_dx: f32,
    pub net_dy: f32,
    pub net_distance_px: f32,
    pub total_path_px: f32,
    pub linearity: f32,
    pub duration_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SwipeResult {
    pub fingers: u8,
    pub candidate_direction: Option<Direction>,
    pub gesture: Option<Gesture>,
    pub invalid_reason: Option<InvalidReason>,
    pub metrics: Option<SwipeMetrics>,
}

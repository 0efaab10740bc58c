use statig::prelude::*;

use crate::{
    config::SwipeThresholds,
    observers::{SessionEnd, SessionStart},
    types::{FrameAction, FrameSnapshot, Point, SwipeResult, TouchFrame},
};

use super::{
    classify::classify_session,
    session::TrackingSession,
    supported_finger_count,
};

const SIGNAL_CAPACITY: usize = 4;

#[derive(Clone, Debug)]
pub(super) enum DetectorEvent {
    Frame { frame: FrameSnapshot },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum DetectorSignal {
    Started(SessionStart),
    Moved { centroid: Point, time_ms: u64 },
    Ended(SessionEnd),
    Result(SwipeResult),
}

/// Collects what one frame produced, in order, for the caller to dispatch
/// once the state machine has settled.
#[derive(Clone, Debug, Default)]
pub(super) struct DispatchContext {
    pub(super) consumed: bool,
    pub(super) signals: heapless::Vec<DetectorSignal, SIGNAL_CAPACITY>,
}

impl DispatchContext {
    fn emit(&mut self, signal: DetectorSignal) {
        if let Err(dropped) = self.signals.push(signal) {
            log::warn!("swipe dispatch context full, dropping {dropped:?}");
        }
    }
}

pub(super) struct SwipeHsm {
    thresholds: SwipeThresholds,
}

impl SwipeHsm {
    pub(super) fn new(thresholds: SwipeThresholds) -> Self {
        Self { thresholds }
    }

    fn begin_session(
        &self,
        context: &mut DispatchContext,
        frame: &FrameSnapshot,
        fingers: u8,
    ) -> TrackingSession {
        let session = TrackingSession::begin(frame, fingers);
        log::debug!(
            "swipe session baselined fingers={} t_ms={} start={:?}",
            fingers,
            session.start_ms,
            session.start
        );
        context.emit(DetectorSignal::Started(SessionStart {
            fingers,
            centroid: session.start,
            time_ms: session.start_ms,
        }));
        context.consumed = true;
        session
    }

    fn discard_session(&self, context: &mut DispatchContext, time_ms: u64) {
        context.emit(DetectorSignal::Ended(SessionEnd::Discarded { time_ms }));
    }

    fn finish_session(&self, context: &mut DispatchContext, session: &TrackingSession) {
        let result = classify_session(session, &self.thresholds);
        log::debug!(
            "swipe session finished fingers={} candidate={:?} reason={:?}",
            result.fingers,
            result.candidate_direction,
            result.invalid_reason
        );
        context.emit(DetectorSignal::Ended(SessionEnd::Finished {
            time_ms: session.last_ms,
            centroid: session.last,
        }));
        context.emit(DetectorSignal::Result(result));
        context.consumed = true;
    }
}

#[state_machine(initial = "State::idle()")]
impl SwipeHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &DetectorEvent) -> Outcome<State> {
        match event {
            DetectorEvent::Frame { frame } => {
                if frame.action() == FrameAction::PointerAdded {
                    if let Some(fingers) = supported_finger_count(frame.pointer_count()) {
                        let session = self.begin_session(context, frame, fingers);
                        return Transition(State::tracking(session));
                    }
                }
                Handled
            }
        }
    }

    #[state]
    fn tracking(
        &mut self,
        session: &mut TrackingSession,
        context: &mut DispatchContext,
        event: &DetectorEvent,
    ) -> Outcome<State> {
        match event {
            DetectorEvent::Frame { frame } => {
                let now_ms = frame.time_ms();
                match frame.action() {
                    FrameAction::Down => {
                        self.discard_session(context, now_ms);
                        Transition(State::idle())
                    }
                    FrameAction::PointerAdded => {
                        // 3 -> 4 -> 5 finger ramps re-baseline instead of aborting.
                        if let Some(fingers) = supported_finger_count(frame.pointer_count()) {
                            let next = self.begin_session(context, frame, fingers);
                            return Transition(State::tracking(next));
                        }
                        self.discard_session(context, now_ms);
                        Transition(State::idle())
                    }
                    FrameAction::Move => match session.track_move(frame) {
                        Some(centroid) => {
                            context.emit(DetectorSignal::Moved {
                                centroid,
                                time_ms: now_ms,
                            });
                            context.consumed = true;
                            Handled
                        }
                        None => {
                            log::warn!(
                                "swipe session aborted: tracked pointer missing at t_ms={now_ms}"
                            );
                            self.discard_session(context, now_ms);
                            Transition(State::idle())
                        }
                    },
                    FrameAction::PointerRemoved => {
                        session.track_pointer_removed(frame);
                        let remaining = frame.pointer_count().saturating_sub(1);
                        if remaining < usize::from(session.fingers) {
                            self.finish_session(context, session);
                            return Transition(State::idle());
                        }
                        context.consumed = true;
                        Handled
                    }
                    FrameAction::Up => {
                        session.track_up(frame);
                        self.finish_session(context, session);
                        Transition(State::idle())
                    }
                    FrameAction::Cancel => {
                        context.emit(DetectorSignal::Ended(SessionEnd::Cancelled {
                            time_ms: now_ms,
                        }));
                        context.consumed = true;
                        Transition(State::idle())
                    }
                }
            }
        }
    }
}

pub(super) fn is_tracking(machine: &statig::blocking::StateMachine<SwipeHsm>) -> bool {
    matches!(machine.state(), State::Tracking { .. })
}

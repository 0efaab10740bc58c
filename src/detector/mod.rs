//! Multi-finger swipe detection.
//!
//! [`SwipeDetector`] is fed one host touch frame at a time. It baselines a
//! session whenever 3-5 fingers are pressed, follows the centroid of exactly
//! those pointers, and when they lift classifies the motion into a
//! [`SwipeResult`] delivered synchronously to the result callback.

mod classify;
mod hsm;
mod session;


use statig::blocking::IntoStateMachineExt as _;

use crate::{
    config::{ConfigError, DetectorConfig, SwipeThresholds},
    observers::SessionObserver,
    types::{FrameSnapshot, SwipeResult, TouchFrame, MAX_SESSION_FINGERS, MIN_SESSION_FINGERS},
};

use hsm::{DetectorEvent, DetectorSignal, DispatchContext, SwipeHsm};

pub struct SwipeDetector<F>
where
    F: FnMut(&SwipeResult),
{
    machine: statig::blocking::StateMachine<SwipeHsm>,
    thresholds: SwipeThresholds,
    observers: Vec<Box<dyn SessionObserver>>,
    on_result: F,
}

impl<F> SwipeDetector<F>
where
    F: FnMut(&SwipeResult),
{
    /// Detector with the default thresholds for the host's touch slop.
    pub fn new(touch_slop_px: f32, on_result: F) -> Self {
        Self::with_thresholds(SwipeThresholds::from_touch_slop(touch_slop_px), on_result)
    }

    pub fn from_config(config: &DetectorConfig, on_result: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_thresholds(config.swipe_thresholds(), on_result))
    }

    pub fn with_thresholds(thresholds: SwipeThresholds, on_result: F) -> Self {
        Self {
            machine: SwipeHsm::new(thresholds).state_machine(),
            thresholds,
            observers: Vec::new(),
            on_result,
        }
    }

    pub fn add_observer(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn thresholds(&self) -> &SwipeThresholds {
        &self.thresholds
    }

    pub fn is_tracking(&self) -> bool {
        hsm::is_tracking(&self.machine)
    }

    /// Processes one frame. Returns whether the frame was consumed, i.e. it
    /// belongs to a 3-5 finger session and should not propagate further.
    ///
    /// Observers and the result callback run before this returns.
    pub fn on_touch_frame(&mut self, frame: &impl TouchFrame) -> bool {
        let event = DetectorEvent::Frame {
            frame: FrameSnapshot::capture(frame),
        };
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);

        for signal in context.signals {
            match signal {
                DetectorSignal::Started(start) => {
                    for observer in &mut self.observers {
                        observer.on_session_start(start);
                    }
                }
                DetectorSignal::Moved { centroid, time_ms } => {
                    for observer in &mut self.observers {
                        observer.on_session_move(centroid, time_ms);
                    }
                }
                DetectorSignal::Ended(end) => {
                    for observer in &mut self.observers {
                        observer.on_session_end(end);
                    }
                }
                DetectorSignal::Result(result) => (self.on_result)(&result),
            }
        }

        context.consumed
    }
}

fn supported_finger_count(pointer_count: usize) -> Option<u8> {
    if (MIN_SESSION_FINGERS..=MAX_SESSION_FINGERS).contains(&pointer_count) {
        u8::try_from(pointer_count).ok()
    } else {
        None
    }
}

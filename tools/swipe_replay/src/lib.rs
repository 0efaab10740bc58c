//! Offline replay of recorded multi-touch traces through the swipe detector.

pub mod logging;
pub mod replay;
pub mod report;
pub mod trace;

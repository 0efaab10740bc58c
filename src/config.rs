use core::fmt;
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_DISTANCE_SLOP_FACTOR: f32 = 7.0;
pub const DEFAULT_MAX_OFF_AXIS_RATIO: f32 = 0.25;
pub const DEFAULT_REVERSE_MIN_DISTANCE_SLOP_FACTOR: f32 = 1.5;
pub const DEFAULT_REVERSE_MAX_RATIO: f32 = 0.15;
pub const DEFAULT_END_KEEP_RATIO: f32 = 0.8;
pub const DEFAULT_MIN_LINEARITY_RATIO: f32 = 0.88;
pub const DEFAULT_LONG_PRESS_HOLD_MS: u64 = 5_000;
pub const DEFAULT_LONG_PRESS_MOVE_TOLERANCE_SLOP_FACTOR: f32 = 2.0;

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config io error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwipeConfig {
    pub min_distance_slop_factor: f32,
    pub max_off_axis_ratio: f32,
    pub reverse_min_distance_slop_factor: f32,
    pub reverse_max_ratio: f32,
    pub end_keep_ratio: f32,
    pub min_linearity_ratio: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            min_distance_slop_factor: DEFAULT_MIN_DISTANCE_SLOP_FACTOR,
            max_off_axis_ratio: DEFAULT_MAX_OFF_AXIS_RATIO,
            reverse_min_distance_slop_factor: DEFAULT_REVERSE_MIN_DISTANCE_SLOP_FACTOR,
            reverse_max_ratio: DEFAULT_REVERSE_MAX_RATIO,
            end_keep_ratio: DEFAULT_END_KEEP_RATIO,
            min_linearity_ratio: DEFAULT_MIN_LINEARITY_RATIO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LongPressConfig {
    pub hold_ms: u64,
    pub move_tolerance_slop_factor: f32,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            hold_ms: DEFAULT_LONG_PRESS_HOLD_MS,
            move_tolerance_slop_factor: DEFAULT_LONG_PRESS_MOVE_TOLERANCE_SLOP_FACTOR,
        }
    }
}

/// Detector configuration. Distances are expressed as multiples of the
/// host's touch slop so one file works across screen densities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorConfig {
    pub touch_slop_px: f32,
    #[serde(default)]
    pub swipe: SwipeConfig,
    #[serde(default)]
    pub long_press: LongPressConfig,
}

/// Absolute swipe thresholds, fixed when a detector is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeThresholds {
    pub min_distance_px: f32,
    pub max_off_axis_ratio: f32,
    pub reverse_min_distance_px: f32,
    pub reverse_max_ratio: f32,
    pub end_keep_ratio: f32,
    pub min_linearity_ratio: f32,
}

impl SwipeThresholds {
    pub fn from_touch_slop(touch_slop_px: f32) -> Self {
        DetectorConfig::from_touch_slop(touch_slop_px).swipe_thresholds()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LongPressThresholds {
    pub hold_ms: u64,
    pub move_tolerance_px: f32,
}

impl DetectorConfig {
    pub fn from_touch_slop(touch_slop_px: f32) -> Self {
        Self {
            touch_slop_px,
            swipe: SwipeConfig::default(),
            long_press: LongPressConfig::default(),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.touch_slop_px.is_finite() && self.touch_slop_px > 0.0) {
            return Err(ConfigError::Validation(
                "touch_slop_px must be a positive finite number".into(),
            ));
        }

        let swipe = &self.swipe;
        for (key, factor) in [
            ("swipe.min_distance_slop_factor", swipe.min_distance_slop_factor),
            (
                "swipe.reverse_min_distance_slop_factor",
                swipe.reverse_min_distance_slop_factor,
            ),
            (
                "long_press.move_tolerance_slop_factor",
                self.long_press.move_tolerance_slop_factor,
            ),
        ] {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a positive finite number"
                )));
            }
        }

        for (key, ratio) in [
            ("swipe.max_off_axis_ratio", swipe.max_off_axis_ratio),
            ("swipe.reverse_max_ratio", swipe.reverse_max_ratio),
            ("swipe.end_keep_ratio", swipe.end_keep_ratio),
            ("swipe.min_linearity_ratio", swipe.min_linearity_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be in (0, 1]"
                )));
            }
        }

        if self.long_press.hold_ms == 0 {
            return Err(ConfigError::Validation(
                "long_press.hold_ms must be > 0".into(),
            ));
        }

        Ok(())
    }

    pub fn swipe_thresholds(&self) -> SwipeThresholds {
        let slop = self.touch_slop_px;
        SwipeThresholds {
            min_distance_px: slop * self.swipe.min_distance_slop_factor,
            max_off_axis_ratio: self.swipe.max_off_axis_ratio,
            reverse_min_distance_px: slop * self.swipe.reverse_min_distance_slop_factor,
            reverse_max_ratio: self.swipe.reverse_max_ratio,
            end_keep_ratio: self.swipe.end_keep_ratio,
            min_linearity_ratio: self.swipe.min_linearity_ratio,
        }
    }

    pub fn long_press_thresholds(&self) -> LongPressThresholds {
        LongPressThresholds {
            hold_ms: self.long_press.hold_ms,
            move_tolerance_px: self.touch_slop_px * self.long_press.move_tolerance_slop_factor,
        }
    }
}

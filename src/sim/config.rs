//! Simulation tuning
//!
//! A fixed set of named numeric constants supplied at construction time.
//! Loadable from JSON (camelCase keys, missing keys fall back to defaults).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Most tunnel segments a single screen width may hold. Bounds both the
/// window length and the work `Tunnel::extend` does per tick.
pub const MAX_SEGMENTS_PER_SCREEN: f32 = 4096.0;

/// Largest segment length or center offset the tunnel generator can sample.
/// Uniform float ranges need their width to stay finite.
const MAX_SAMPLED_SPAN: f32 = f32::MAX / 4.0;

/// Errors raised when a configuration cannot be used to build a simulation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be greater than zero (got {value:.2})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value:.2})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} is too large to sample (got {value})")]
    TooLarge { field: &'static str, value: f32 },
    #[error("segment length minimum {min:.2} exceeds maximum {max:.2}")]
    SegmentRange { min: f32, max: f32 },
    #[error("segment length minimum {min} is too short to cover a screen of width {width:.2}")]
    SegmentTooShort { min: f32, width: f32 },
    #[error("craft x {craft_x:.2} must lie inside the screen (0, {width:.2})")]
    CraftOffScreen { craft_x: f32, width: f32 },
    #[error(
        "craft height {craft_height:.2} does not fit a corridor of height {corridor_height:.2}"
    )]
    CraftTallerThanCorridor {
        craft_height: f32,
        corridor_height: f32,
    },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimConfig {
    /// Downward acceleration applied when not thrusting
    pub gravity: f32,
    /// Upward acceleration applied when thrusting
    pub thrust: f32,
    /// Zero any downward velocity before thrust is applied
    pub reset_speed_on_thrust: bool,
    /// Symmetric clamp bound on vertical velocity
    pub max_vertical_speed: f32,
    /// Vertical size of the navigable corridor
    pub corridor_height: f32,
    pub segment_length_min: f32,
    pub segment_length_max: f32,
    /// Maximum distance of a centerline point from the screen's vertical middle
    pub center_offset_max: f32,
    /// Horizontal scroll (and distance gained) per tick
    pub scroll_speed: u32,
    pub screen_width: f32,
    pub screen_height: f32,
    pub craft_width: f32,
    pub craft_height: f32,
    /// Fixed horizontal position of the craft on screen
    pub craft_x: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            thrust: THRUST,
            reset_speed_on_thrust: RESET_SPEED_ON_THRUST,
            max_vertical_speed: MAX_VERTICAL_SPEED,
            corridor_height: CORRIDOR_HEIGHT,
            segment_length_min: SEGMENT_LENGTH_MIN,
            segment_length_max: SEGMENT_LENGTH_MAX,
            center_offset_max: CENTER_OFFSET_MAX,
            scroll_speed: SCROLL_SPEED,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            craft_width: CRAFT_WIDTH,
            craft_height: CRAFT_HEIGHT,
            craft_x: CRAFT_X,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON. Unknown keys are ignored, missing keys use defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Vertical middle of the screen; the tunnel's resting center line
    #[inline]
    pub fn mid_height(&self) -> f32 {
        self.screen_height * 0.5
    }

    /// Horizontal scroll per tick as a world offset
    #[inline]
    pub fn scroll_dx(&self) -> f32 {
        self.scroll_speed as f32
    }

    /// Upper bound on the number of points the tunnel window can hold
    pub fn max_window_len(&self) -> usize {
        (self.screen_width / self.segment_length_min).ceil() as usize + 2
    }

    /// Whether a craft can always fit through a flat corridor placed at the
    /// largest allowed center offset.
    pub fn is_flat_passable(&self) -> bool {
        self.center_offset_max + self.craft_height * 0.5 < self.corridor_height * 0.5
    }

    /// Check every precondition the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gravity", self.gravity),
            ("thrust", self.thrust),
            ("maxVerticalSpeed", self.max_vertical_speed),
            ("corridorHeight", self.corridor_height),
            ("segmentLengthMin", self.segment_length_min),
            ("segmentLengthMax", self.segment_length_max),
            ("screenWidth", self.screen_width),
            ("screenHeight", self.screen_height),
            ("craftWidth", self.craft_width),
            ("craftHeight", self.craft_height),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("centerOffsetMax", self.center_offset_max),
            ("craftX", self.craft_x),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.center_offset_max < 0.0 {
            return Err(ConfigError::Negative {
                field: "centerOffsetMax",
                value: self.center_offset_max,
            });
        }

        if self.scroll_speed == 0 {
            return Err(ConfigError::NotPositive {
                field: "scrollSpeed",
                value: 0.0,
            });
        }
        for (field, value) in [
            ("centerOffsetMax", self.center_offset_max),
            ("segmentLengthMax", self.segment_length_max),
        ] {
            if value > MAX_SAMPLED_SPAN {
                return Err(ConfigError::TooLarge { field, value });
            }
        }
        if self.segment_length_min > self.segment_length_max {
            return Err(ConfigError::SegmentRange {
                min: self.segment_length_min,
                max: self.segment_length_max,
            });
        }
        // Also keeps `last.x + length` strictly above `last.x` anywhere on screen
        if self.screen_width / self.segment_length_min > MAX_SEGMENTS_PER_SCREEN {
            return Err(ConfigError::SegmentTooShort {
                min: self.segment_length_min,
                width: self.screen_width,
            });
        }
        // The tunnel window always spans [<=0, >=width], so any craft x in
        // that range has a covering segment.
        if self.craft_x < 0.0 || self.craft_x >= self.screen_width {
            return Err(ConfigError::CraftOffScreen {
                craft_x: self.craft_x,
                width: self.screen_width,
            });
        }
        if self.craft_height >= self.corridor_height {
            return Err(ConfigError::CraftTallerThanCorridor {
                craft_height: self.craft_height,
                corridor_height: self.corridor_height,
            });
        }

        if !self.is_flat_passable() {
            log::warn!(
                "Tunnel offset {} + craft half-height {} exceeds corridor half-height {}; \
                 some tunnels may be impassable",
                self.center_offset_max,
                self.craft_height * 0.5,
                self.corridor_height * 0.5
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.craft_x, 90.0);
        assert_eq!(config.mid_height(), 120.0);
    }

    #[test]
    fn test_rejects_non_positive_geometry() {
        let config = SimConfig {
            corridor_height: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "corridorHeight",
                ..
            })
        ));

        let config = SimConfig {
            gravity: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "gravity", .. })
        ));

        let config = SimConfig {
            scroll_speed: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "scrollSpeed",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let config = SimConfig {
            thrust: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "thrust", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_segment_range() {
        let config = SimConfig {
            segment_length_min: 150.0,
            segment_length_max: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SegmentRange { .. })
        ));
    }

    #[test]
    fn test_rejects_segments_too_short_to_advance() {
        let config = SimConfig {
            segment_length_min: 1e-5,
            segment_length_max: 1e-5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SegmentTooShort { .. })
        ));
        assert!(crate::sim::Simulation::seeded(config, 1).is_err());

        // Short but within the limit is still accepted
        let config = SimConfig {
            segment_length_min: 0.1,
            segment_length_max: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        let mut sim = crate::sim::Simulation::seeded(config, 1).unwrap();
        sim.step(crate::sim::Action::Thrust);
        assert!(sim.tunnel_points().len() <= sim.config().max_window_len());
    }

    #[test]
    fn test_rejects_unsampleable_spans() {
        let config = SimConfig {
            center_offset_max: f32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge {
                field: "centerOffsetMax",
                ..
            })
        ));
        assert!(crate::sim::Simulation::seeded(config, 1).is_err());

        let config = SimConfig {
            segment_length_max: f32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge {
                field: "segmentLengthMax",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_craft_outside_screen() {
        let config = SimConfig {
            craft_x: 400.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CraftOffScreen { .. })
        ));
    }

    #[test]
    fn test_rejects_craft_taller_than_corridor() {
        let config = SimConfig {
            craft_height: 120.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CraftTallerThanCorridor { .. })
        ));
    }

    #[test]
    fn test_flat_passable() {
        assert!(!SimConfig::default().is_flat_passable());
        let config = SimConfig {
            center_offset_max: 20.0,
            ..Default::default()
        };
        assert!(config.is_flat_passable());
    }

    #[test]
    fn test_json_uses_camel_case_and_defaults() {
        let config =
            SimConfig::from_json_str(r#"{ "gravity": 0.25, "resetSpeedOnThrust": false }"#)
                .unwrap();
        assert_eq!(config.gravity, 0.25);
        assert!(!config.reset_speed_on_thrust);
        assert_eq!(config.corridor_height, CORRIDOR_HEIGHT);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        let err = SimConfig::from_json_str(r#"{ "screenWidth": -1 }"#).unwrap_err();
        assert!(err.to_string().contains("screenWidth"));

        let err = SimConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_max_window_len() {
        // 360 / 80 = 4.5 -> 5 interior points + 2
        assert_eq!(SimConfig::default().max_window_len(), 7);
    }
}

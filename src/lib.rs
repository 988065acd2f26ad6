//! Heli Tunnel - A side-scrolling helicopter-through-a-tunnel simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, tunnel generation, collisions)
//! - `env`: Reinforcement-learning environment adapter over `sim`
//! - `decor`: Stateless decorative geometry for renderers (no gameplay effect)

pub mod decor;
pub mod env;
pub mod sim;

pub use env::{EnvStep, HelicopterEnv, Observation, StepInfo, VecEnv};
pub use sim::{Action, ActionError, ConfigError, SimConfig, Simulation};

/// Default arcade tuning. All distances are in screen pixels, all
/// velocities/accelerations are per tick.
pub mod consts {
    /// Render target size
    pub const SCREEN_WIDTH: f32 = 360.0;
    pub const SCREEN_HEIGHT: f32 = 240.0;

    /// Downward acceleration applied each tick without thrust
    pub const GRAVITY: f32 = 0.5;
    /// Upward acceleration applied each tick with thrust
    pub const THRUST: f32 = 0.3;
    /// Symmetric clamp on vertical velocity
    pub const MAX_VERTICAL_SPEED: f32 = 10.0;
    /// Zero any downward velocity before applying thrust
    pub const RESET_SPEED_ON_THRUST: bool = true;

    /// Craft collision box
    pub const CRAFT_WIDTH: f32 = 32.0;
    pub const CRAFT_HEIGHT: f32 = 16.0;
    /// Fixed horizontal craft position (quarter of the screen)
    pub const CRAFT_X: f32 = SCREEN_WIDTH / 4.0;
    /// Horizontal scroll per tick; also the distance gained per tick
    pub const SCROLL_SPEED: u32 = 4;

    /// Tunnel generation
    pub const CENTER_OFFSET_MAX: f32 = 70.0;
    pub const SEGMENT_LENGTH_MIN: f32 = 80.0;
    pub const SEGMENT_LENGTH_MAX: f32 = 120.0;
    pub const CORRIDOR_HEIGHT: f32 = 100.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
    }
}

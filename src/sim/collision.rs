//! Collision detection against the screen and the tunnel corridor
//!
//! The craft is an axis-aligned box centered on (craft_x, craft_y). Screen y
//! grows downward, so "top" is the smaller y.

use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use super::state::TerminationCause;

/// Axis-aligned craft box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CraftBox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl CraftBox {
    /// Box for a craft centered at `craft_y` on the fixed craft column
    pub fn at(config: &SimConfig, craft_y: f32) -> Self {
        let half_w = config.craft_width * 0.5;
        let half_h = config.craft_height * 0.5;
        Self {
            left: config.craft_x - half_w,
            right: config.craft_x + half_w,
            top: craft_y - half_h,
            bottom: craft_y + half_h,
        }
    }
}

/// Vertical band of the corridor at some x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorSpan {
    pub top: f32,
    pub bottom: f32,
}

impl CorridorSpan {
    pub fn around(center: f32, corridor_height: f32) -> Self {
        let half = corridor_height * 0.5;
        Self {
            top: center - half,
            bottom: center + half,
        }
    }

    /// Whether the box stays inside the band (touching an edge is allowed)
    #[inline]
    pub fn contains(&self, craft: &CraftBox) -> bool {
        craft.top >= self.top && craft.bottom <= self.bottom
    }
}

/// Craft center strictly outside `[0, screen_height]`
#[inline]
pub fn craft_out_of_screen(craft_y: f32, screen_height: f32) -> bool {
    craft_y < 0.0 || craft_y > screen_height
}

/// Check the craft against the screen first, then against the corridor.
///
/// `center` is only evaluated when the craft is still on screen.
pub fn check_collision(
    config: &SimConfig,
    craft_y: f32,
    center: impl FnOnce() -> f32,
) -> Option<TerminationCause> {
    if craft_out_of_screen(craft_y, config.screen_height) {
        return Some(TerminationCause::OutOfScreen);
    }

    let corridor = CorridorSpan::around(center(), config.corridor_height);
    if !corridor.contains(&CraftBox::at(config, craft_y)) {
        return Some(TerminationCause::CorridorWall);
    }

    None
}

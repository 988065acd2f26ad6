//! Procedural tunnel generation
//!
//! The tunnel is a sliding window of centerline points. Points are in screen
//! space: x is the horizontal offset from the left edge of the screen, so the
//! world scrolling left is modelled by decreasing every x.
//!
//! Window invariants after every `reset`/`advance`+`extend`+`prune` cycle:
//! - x strictly increasing
//! - at least two points
//! - first x <= 0 and last x >= screen width

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use crate::lerp;

/// Sliding window of corridor centerline points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tunnel {
    points: Vec<Vec2>,
}

impl Tunnel {
    /// Build a fresh flat tunnel
    pub fn new(config: &SimConfig, rng: &mut impl Rng) -> Self {
        let mut tunnel = Self {
            points: Vec::with_capacity(config.max_window_len()),
        };
        tunnel.reset(config, rng);
        tunnel
    }

    /// Restart with a flat, centered tunnel and fill the visible area
    pub fn reset(&mut self, config: &SimConfig, rng: &mut impl Rng) {
        let mid = config.mid_height();
        self.points.clear();
        self.points.push(Vec2::new(0.0, mid));
        self.points.push(Vec2::new(config.screen_width * 0.5, mid));
        self.extend(config, rng);
        self.prune();
    }

    /// Scroll every point left by `dx`
    pub fn advance(&mut self, dx: f32) {
        for point in &mut self.points {
            point.x -= dx;
        }
    }

    /// Append random segments until the window reaches past the right edge
    pub fn extend(&mut self, config: &SimConfig, rng: &mut impl Rng) {
        let mid = config.mid_height();
        let offset = config.center_offset_max;
        while let Some(last) = self.points.last().copied() {
            if last.x >= config.screen_width {
                break;
            }
            let length = rng.random_range(config.segment_length_min..=config.segment_length_max);
            let center = mid + rng.random_range(-offset..=offset);
            self.points.push(Vec2::new(last.x + length, center));
        }
    }

    /// Drop points once the segment they start is fully off screen
    pub fn prune(&mut self) {
        let behind = self
            .points
            .windows(2)
            .take_while(|pair| pair[1].x < 0.0)
            .count();
        if behind > 0 {
            self.points.drain(..behind);
        }
    }

    /// Interpolated corridor center at `x`, or `None` if no segment covers it
    pub fn center_at(&self, x: f32) -> Option<f32> {
        self.points
            .windows(2)
            .find(|pair| pair[0].x <= x && x <= pair[1].x)
            .map(|pair| {
                let (left, right) = (pair[0], pair[1]);
                let span = right.x - left.x;
                if span <= 0.0 {
                    return left.y;
                }
                lerp(left.y, right.y, (x - left.x) / span)
            })
    }

    /// Current window of centerline points, left to right
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Horizontal extent of the window as (first x, last x)
    pub fn bounds(&self) -> (f32, f32) {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first.x, last.x),
            _ => (f32::NAN, f32::NAN),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

//! Decorative tunnel geometry for renderers
//!
//! Pure functions of their inputs. Nothing here feeds back into collision or
//! any other simulation state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Horizontal spacing of jagged sub-points along a segment
const JAG_STEP: f32 = 12.0;
/// Vertical jitter of each sub-point, inclusive
const JAG_OFFSET: i32 = 2;

/// Upper and lower corridor edges for a centerline window
pub fn corridor_edges(points: &[Vec2], corridor_height: f32) -> (Vec<Vec2>, Vec<Vec2>) {
    let half = corridor_height * 0.5;
    let upper = points.iter().map(|p| Vec2::new(p.x, p.y - half)).collect();
    let lower = points.iter().map(|p| Vec2::new(p.x, p.y + half)).collect();
    (upper, lower)
}

/// Roughen a boundary polyline.
///
/// Every segment is split into `len / 12` pieces whose interior points are
/// jittered by up to 2 pixels. The jitter is seeded by the segment's start y,
/// so it stays stable while the tunnel scrolls. A sine wave of amplitude
/// `wave_amp` travelling with `wave_phase` and a constant `y_offset` are then
/// applied to every point.
pub fn jagged_boundary(
    points: &[Vec2],
    seed: u64,
    y_offset: f32,
    wave_phase: f32,
    wave_amp: f32,
) -> Vec<Vec2> {
    let mut jagged = Vec::with_capacity(points.len() * 4);

    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        jagged.push(start);

        let steps = ((end.x - start.x).max(0.0) / JAG_STEP).floor().max(1.0) as u32;
        let mut rng = Pcg32::seed_from_u64(segment_seed(start.y, seed));
        for step in 1..steps {
            let t = step as f32 / steps as f32;
            let p = start.lerp(end, t);
            let jitter = rng.random_range(-JAG_OFFSET..=JAG_OFFSET) as f32;
            jagged.push(Vec2::new(p.x, p.y + jitter));
        }
    }
    if let Some(&last) = points.last() {
        jagged.push(last);
    }

    for p in &mut jagged {
        p.y += y_offset + ((p.x + wave_phase) / 2.0).sin() * wave_amp;
    }
    jagged
}

#[inline]
fn segment_seed(start_y: f32, seed: u64) -> u64 {
    (f64::from(start_y) + seed as f64).to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centerline() -> Vec<Vec2> {
        vec![
            Vec2::new(-20.0, 120.0),
            Vec2::new(80.0, 150.0),
            Vec2::new(190.0, 90.0),
            Vec2::new(370.0, 110.0),
        ]
    }

    #[test]
    fn test_corridor_edges() {
        let (upper, lower) = corridor_edges(&centerline(), 100.0);
        assert_eq!(upper[0], Vec2::new(-20.0, 70.0));
        assert_eq!(lower[0], Vec2::new(-20.0, 170.0));
        assert_eq!(upper.len(), 4);
        assert_eq!(lower.len(), 4);
    }

    #[test]
    fn test_jagged_keeps_control_points_and_bounds_jitter() {
        let points = centerline();
        let jagged = jagged_boundary(&points, 1, 0.0, 0.0, 0.0);

        for p in &points {
            assert!(jagged.contains(p));
        }
        // 100 / 12 -> 8, 110 / 12 -> 9, 180 / 12 -> 15 pieces
        assert_eq!(jagged.len(), 8 + 9 + 15 + 1);
        for pair in jagged.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
        for p in &jagged {
            let segment = points
                .windows(2)
                .find(|pair| pair[0].x <= p.x && p.x <= pair[1].x)
                .unwrap();
            let t = (p.x - segment[0].x) / (segment[1].x - segment[0].x);
            let base = segment[0].y + (segment[1].y - segment[0].y) * t;
            assert!((p.y - base).abs() <= JAG_OFFSET as f32 + 1e-3);
        }
    }

    #[test]
    fn test_jagged_is_stateless() {
        let points = centerline();
        let a = jagged_boundary(&points, 3, 4.0, 10.0, 8.0);
        let b = jagged_boundary(&points, 3, 4.0, 10.0, 8.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_jitter_is_stable_while_scrolling() {
        let points = centerline();
        let scrolled: Vec<_> = points.iter().map(|p| Vec2::new(p.x - 4.0, p.y)).collect();
        let a = jagged_boundary(&points, 2, 0.0, 0.0, 0.0);
        let b = jagged_boundary(&scrolled, 2, 0.0, 0.0, 0.0);
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(&b) {
            assert!((p.x - 4.0 - q.x).abs() < 1e-3);
            assert!((p.y - q.y).abs() < 1e-3);
        }
    }

    #[test]
    fn test_offset_and_wave() {
        let points = vec![Vec2::new(0.0, 50.0), Vec2::new(10.0, 50.0)];
        // Segment shorter than one jag step: only the endpoints remain
        let jagged = jagged_boundary(&points, 0, 5.0, 0.0, 3.0);
        assert_eq!(jagged.len(), 2);
        assert_eq!(jagged[0], Vec2::new(0.0, 55.0));
        assert!((jagged[1].y - (55.0 + 5.0f32.sin() * 3.0)).abs() < 1e-4);
    }

    #[test]
    fn test_empty_input() {
        assert!(jagged_boundary(&[], 0, 0.0, 0.0, 0.0).is_empty());
    }
}

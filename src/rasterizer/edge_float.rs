//! Debug-only floating-point edge-function rasterizer.
//!
//! Ported from the simpler of the two rasterizer variants this crate's
//! lineage carries: plain `f32` edge functions, no canonical-ordered
//! coefficient derivation and no top-left fill rule. It is not watertight —
//! a pixel whose center lies exactly on a shared edge can be claimed by
//! both neighbors or neither, depending on floating-point rounding — so it
//! is kept only as a differential reference for testing
//! [`super::edge_fixed::FixedPointEdgeRasterizer`] away from shared edges,
//! never reachable from the public API.

use crate::math::Vec3;

/// Evaluates the 2D cross product `(b - a) x (p - a)`; positive when `p` is
/// left of the directed edge `a -> b`.
#[inline]
fn edge_function(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// A rasterized pixel, matching [`super::edge_fixed::Fragment`]'s shape so
/// the two variants' output can be compared directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    pub z: f32,
}

pub struct FloatEdgeRasterizer;

impl FloatEdgeRasterizer {
    pub fn rasterize(v0: Vec3, v1: Vec3, v2: Vec3, mut emit: impl FnMut(Fragment)) {
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        let area = edge_function(v0, v1, v2);
        if area.abs() < f32::EPSILON {
            return;
        }
        let inv_area = 1.0 / area;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);

                let w0 = edge_function(v1, v2, p);
                let w1 = edge_function(v2, v0, p);
                let w2 = edge_function(v0, v1, p);

                let inside = if area > 0.0 {
                    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                } else {
                    w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
                };

                if inside {
                    let b0 = w0 * inv_area;
                    let b1 = w1 * inv_area;
                    let b2 = w2 * inv_area;
                    let z = b0 * v0.z + b1 * v1.z + b2 * v2.z;
                    emit(Fragment { x, y, z });
                }
            }
        }
    }
}

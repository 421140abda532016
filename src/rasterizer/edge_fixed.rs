//! The canonical, watertight rasterizer variant.
//!
//! Grounded directly in the reference renderer's `SetupEdgeEquation` /
//! `RasterizeTriangle`: edge functions with a signed double-area cull, a
//! floating-point depth plane derived from the (pre-offset) edge
//! coefficients, and a half-pixel sampling offset baked into the edge
//! constants so the inner loop can sample at integer `(x, y)`.
//!
//! Two behaviors go beyond that reference to satisfy watertightness: edge
//! coefficients are derived from a canonically (lexicographically) ordered
//! pair of endpoints and sign-corrected back to the triangle's own winding,
//! and each edge additionally carries a top-left classification so a pixel
//! lying exactly on a shared edge is claimed by exactly one of its two
//! neighbors.

use std::cmp::Ordering;

use crate::fixed::Fixed;
use crate::math::Vec3;
use crate::viewport::Viewport;

/// Fractional bits for screen-space fixed-point coordinates: 1/256 sub-pixel
/// precision, comfortably exact for any viewport up to a few thousand pixels
/// wide within `i32`.
pub type ScreenFixed = Fixed<8>;

/// One rasterized pixel: its integer screen position and interpolated depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug)]
struct ScreenVertex {
    x: ScreenFixed,
    y: ScreenFixed,
    z: f32,
}

impl ScreenVertex {
    fn from_vec3(v: Vec3) -> Self {
        Self {
            x: ScreenFixed::from_f32(v.x),
            y: ScreenFixed::from_f32(v.y),
            z: v.z,
        }
    }
}

/// A directed triangle edge's linear coverage function `E(p) = a*p.x + b*p.y + c`.
struct Edge {
    a: ScreenFixed,
    b: ScreenFixed,
    /// Unbiased constant: the exact edge function, used for the double-area
    /// sum and the depth-plane fit.
    c: ScreenFixed,
    /// `c` plus the half-pixel sampling offset, used for the per-pixel
    /// coverage test. Kept as a separate field (rather than computed at the
    /// call site) because it must be folded in before the canonical
    /// sign-correction below, not after.
    c_sample: ScreenFixed,
    top_left: bool,
}

impl Edge {
    /// Builds the edge `va -> vb`.
    ///
    /// The top-left classification is taken from `va`/`vb` exactly as given
    /// (the triangle's own winding), but the coefficient magnitudes are
    /// derived from the lexicographically sorted pair and sign-corrected
    /// back, so that a neighboring triangle traversing the same physical
    /// edge in the opposite direction computes bit-identical `(a, b, c)` up
    /// to that sign correction.
    fn setup(va: ScreenVertex, vb: ScreenVertex) -> Self {
        let top_left = (va.y == vb.y && va.x > vb.x) || (va.y < vb.y);

        let swapped = match (va.x, va.y).cmp(&(vb.x, vb.y)) {
            Ordering::Greater => true,
            _ => false,
        };
        let (lo, hi) = if swapped { (vb, va) } else { (va, vb) };

        let a = hi.y - lo.y;
        let b = lo.x - hi.x;
        let c = -(a * (lo.x + hi.x) + b * (lo.y + hi.y)).half();
        // Folded in on the canonical (pre-swap) triple, not after: `half`
        // rounds ties toward +inf and so is not itself an odd function
        // (`half(-v) != -half(v)` whenever `v` is odd), so computing this
        // offset from the already sign-corrected `(a, b)` would make two
        // neighbors' sampled constants differ by one epsilon instead of
        // being exact negations, letting a shared-edge pixel be claimed by
        // both (or neither) of them.
        let c_sample = c + (a + b).half();

        let (a, b, c, c_sample) = if swapped {
            (-a, -b, -c, -c_sample)
        } else {
            (a, b, c, c_sample)
        };

        Self { a, b, c, c_sample, top_left }
    }

    /// The coverage threshold for this edge: `0` for a top-left edge (test
    /// is `E >= 0`), one epsilon above zero otherwise (test is `E > 0`,
    /// expressed as `E >= epsilon` since fixed-point edge values are exact
    /// multiples of `2^-FRAC`).
    #[inline]
    fn fill_bias(&self) -> ScreenFixed {
        if self.top_left {
            ScreenFixed::ZERO
        } else {
            ScreenFixed::EPSILON
        }
    }
}

/// The fixed-point edge-function rasterizer named as the canonical
/// implementation: watertight under shared edges, used by
/// [`crate::rasterizer::Rasterizer`] for every triangle it draws.
pub struct FixedPointEdgeRasterizer;

impl FixedPointEdgeRasterizer {
    /// Rasterizes one screen-space triangle (`z` in window-space `[0, 1]`
    /// convention already applied by the viewport transform), invoking
    /// `emit` once per covered pixel in scanline order (increasing `y`,
    /// increasing `x` within a row).
    ///
    /// Returns with no emissions if the triangle is back-facing, degenerate
    /// (zero area), or its bounding box doesn't intersect `viewport`.
    pub fn rasterize(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        viewport: &Viewport,
        mut emit: impl FnMut(Fragment),
    ) {
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        let x0 = min_x.max(viewport.x());
        let x1 = max_x.min(viewport.max_x());
        let y0 = min_y.max(viewport.y());
        let y1 = max_y.min(viewport.max_y());
        if x0 > x1 || y0 > y1 {
            return;
        }

        let p0 = ScreenVertex::from_vec3(v0);
        let p1 = ScreenVertex::from_vec3(v1);
        let p2 = ScreenVertex::from_vec3(v2);

        let e01 = Edge::setup(p0, p1);
        let e12 = Edge::setup(p1, p2);
        let e20 = Edge::setup(p2, p0);

        let double_area = e01.c + e12.c + e20.c;
        if double_area <= ScreenFixed::ZERO {
            return;
        }
        let inv_double_area = 1.0 / double_area.to_f32();

        // Depth plane, derived from the un-offset edge coefficients (the
        // half-pixel sampling offset below only applies to the coverage
        // test, not to this continuous plane fit).
        let az = (p0.z * e12.a.to_f32() + p1.z * e20.a.to_f32() + p2.z * e01.a.to_f32())
            * inv_double_area;
        let bz = (p0.z * e12.b.to_f32() + p1.z * e20.b.to_f32() + p2.z * e01.b.to_f32())
            * inv_double_area;
        let cz = (p0.z * e12.c.to_f32() + p1.z * e20.c.to_f32() + p2.z * e01.c.to_f32())
            * inv_double_area;

        let c01 = e01.c_sample;
        let c12 = e12.c_sample;
        let c20 = e20.c_sample;

        let bias01 = e01.fill_bias();
        let bias12 = e12.fill_bias();
        let bias20 = e20.fill_bias();

        let fx0 = ScreenFixed::from_i32(x0);
        let fy0 = ScreenFixed::from_i32(y0);

        let mut row01 = e01.a * fx0 + e01.b * fy0 + c01;
        let mut row12 = e12.a * fx0 + e12.b * fy0 + c12;
        let mut row20 = e20.a * fx0 + e20.b * fy0 + c20;

        for y in y0..=y1 {
            let mut e0 = row01;
            let mut e1 = row12;
            let mut e2 = row20;

            for x in x0..=x1 {
                if e0 >= bias01 && e1 >= bias12 && e2 >= bias20 {
                    let z = az * x as f32 + bz * y as f32 + cz;
                    emit(Fragment { x, y, z });
                }
                e0 = e0 + e01.a;
                e1 = e1 + e12.a;
                e2 = e2 + e20.a;
            }

            row01 = row01 + e01.b;
            row12 = row12 + e12.b;
            row20 = row20 + e20.b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(v0: Vec3, v1: Vec3, v2: Vec3, viewport: &Viewport) -> Vec<Fragment> {
        let mut out = Vec::new();
        FixedPointEdgeRasterizer::rasterize(v0, v1, v2, viewport, |f| out.push(f));
        out
    }

    #[test]
    fn fullscreen_triangle_covers_every_pixel() {
        let viewport = Viewport::new(0, 0, 4, 4);
        let frags = collect(
            Vec3::new(-100.0, -100.0, 0.5),
            Vec3::new(-100.0, 100.0, 0.5),
            Vec3::new(100.0, -100.0, 0.5),
            &viewport,
        );
        assert_eq!(frags.len(), 16);
        assert!(frags.iter().all(|f| (f.z - 0.5).abs() < 1e-4));
    }

    #[test]
    fn reversed_winding_is_culled() {
        let viewport = Viewport::new(0, 0, 4, 4);
        let frags = collect(
            Vec3::new(-100.0, -100.0, 0.5),
            Vec3::new(100.0, -100.0, 0.5),
            Vec3::new(-100.0, 100.0, 0.5),
            &viewport,
        );
        assert!(frags.is_empty());
    }

    #[test]
    fn fragments_never_escape_the_viewport() {
        let viewport = Viewport::new(0, 0, 4, 4);
        let frags = collect(
            Vec3::new(-2.0, 2.0, 0.0),
            Vec3::new(2.0, 6.0, 0.0),
            Vec3::new(2.0, -2.0, 0.0),
            &viewport,
        );
        assert!(!frags.is_empty());
        assert!(frags
            .iter()
            .all(|f| f.x >= 0 && f.x <= 3 && f.y >= 0 && f.y <= 3));
    }

    #[test]
    fn shared_diagonal_is_watertight() {
        let viewport = Viewport::new(0, 0, 8, 8);
        let tl = Vec3::new(0.0, 0.0, 0.0);
        let tr = Vec3::new(8.0, 0.0, 0.0);
        let bl = Vec3::new(0.0, 8.0, 0.0);
        let br = Vec3::new(8.0, 8.0, 0.0);

        // Two front-facing triangles sharing the tr->bl diagonal, traversed
        // in opposite directions by each neighbor.
        let mut hits = vec![0u32; 64];
        let mut mark = |f: Fragment| {
            hits[(f.y * 8 + f.x) as usize] += 1;
        };
        FixedPointEdgeRasterizer::rasterize(tl, bl, tr, &viewport, &mut mark);
        FixedPointEdgeRasterizer::rasterize(tr, bl, br, &viewport, &mut mark);

        assert_eq!(hits.iter().sum::<u32>(), 64);
        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn shared_diagonal_with_fractional_coordinates_is_watertight() {
        // Same rectangle-split-by-diagonal shape as above, but the diagonal's
        // endpoints are nudged by one fixed-point epsilon (1/256 px) so the
        // shared edge's `a.raw() + b.raw()` is odd: the parity that exposes
        // whether the half-pixel offset was folded in before or after the
        // canonical sign correction. The integer-coordinate version above
        // only ever produces even sums and can't catch a regression here.
        let viewport = Viewport::new(0, 0, 8, 8);
        let tl = Vec3::new(0.0, 0.0, 0.0);
        let tr = Vec3::new(8.0, 0.0, 0.0);
        let bl = Vec3::new(0.0, 8.0 + 1.0 / 256.0, 0.0);
        let br = Vec3::new(8.0, 8.0 + 1.0 / 256.0, 0.0);

        let mut hits = vec![0u32; 64];
        let mut mark = |f: Fragment| {
            hits[(f.y * 8 + f.x) as usize] += 1;
        };
        FixedPointEdgeRasterizer::rasterize(tl, bl, tr, &viewport, &mut mark);
        FixedPointEdgeRasterizer::rasterize(tr, bl, br, &viewport, &mut mark);

        assert_eq!(hits.iter().sum::<u32>(), 64);
        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn degenerate_triangle_emits_nothing() {
        let viewport = Viewport::new(0, 0, 8, 8);
        let p = Vec3::new(2.0, 2.0, 0.0);
        assert!(collect(p, p, p, &viewport).is_empty());
    }
}

//! The core rasterization pipeline: object space to a color/depth image.

pub mod edge_fixed;
#[cfg(any(test, feature = "float-debug-rasterizer"))]
pub mod edge_float;

use std::cell::RefCell;
use std::rc::Rc;

use crate::math::{Mat4, Vec3, Vec4};
use crate::rasterizer::edge_fixed::FixedPointEdgeRasterizer;
use crate::renderer_interface::RendererInterface;
use crate::target::RenderTarget;
use crate::viewport::Viewport;

/// Drives triangles from object space through the fixed-function pipeline
/// (MVP transform, homogeneous divide, viewport transform, fixed-point
/// edge-function rasterization, depth test) into a shared [`RenderTarget`].
///
/// Grounded in the reference renderer: `model_view`/`projection` are stored
/// separately and their product is recomputed on every setter call, exactly
/// as `SetModelViewMatrix`/`SetProjectionMatrix` do, so `draw_triangle` never
/// pays for the multiply.
pub struct Rasterizer {
    model_view: Mat4,
    projection: Mat4,
    model_view_projection: Mat4,
    viewport: Viewport,
    target: Rc<RefCell<RenderTarget>>,
}

impl Rasterizer {
    /// Builds a rasterizer with identity model-view/projection matrices and
    /// a `0,0,1,1` viewport; callers are expected to call `set_viewport`
    /// before the first draw.
    pub fn new(target: Rc<RefCell<RenderTarget>>) -> Self {
        Self {
            model_view: Mat4::identity(),
            projection: Mat4::identity(),
            model_view_projection: Mat4::identity(),
            viewport: Viewport::new(0, 0, 1, 1),
            target,
        }
    }

    /// Swaps the render target this rasterizer writes into.
    pub fn set_render_target(&mut self, target: Rc<RefCell<RenderTarget>>) {
        self.target = target;
    }

    #[inline]
    fn recompute_mvp(&mut self) {
        self.model_view_projection = self.projection * self.model_view;
    }

    /// The pipeline entry point for a single triangle, given as three
    /// object-space vertices (`w` typically `1.0`).
    ///
    /// A triangle whose clip-space `w` is zero for some vertex, or whose
    /// vertices are non-finite, produces unspecified fragments but never
    /// panics or reads/writes out of the target's bounds: the homogeneous
    /// divide follows IEEE-754 (producing `inf`/`NaN`, not a trap), and the
    /// bounding-box intersection with the viewport clamps any resulting
    /// `NaN`-tainted box to empty before the inner loop runs.
    pub fn draw_triangle(&mut self, v0: Vec4, v1: Vec4, v2: Vec4) {
        let normal = (v1.to_vec3() - v0.to_vec3())
            .cross(v2.to_vec3() - v0.to_vec3())
            .normalize();
        let normal = normal * 0.5 + Vec3::new(0.5, 0.5, 0.5);
        let color = Vec4::from_vec3(normal, 1.0);

        let clip = [
            self.model_view_projection * v0,
            self.model_view_projection * v1,
            self.model_view_projection * v2,
        ];
        let ndc = clip.map(|c| Vec3::new(c.x / c.w, c.y / c.w, c.z / c.w));
        let screen = ndc.map(|n| self.viewport.transform(n));

        let target = &self.target;
        FixedPointEdgeRasterizer::rasterize(
            screen[0],
            screen[1],
            screen[2],
            &self.viewport,
            |fragment| {
                let mut target = target.borrow_mut();
                let x = fragment.x as u32;
                let y = fragment.y as u32;
                let current_depth = target.depth().get(x, y);
                if fragment.z < current_depth && (0.0..=1.0).contains(&fragment.z) {
                    target.depth_mut().set(x, y, fragment.z);
                    target.color_mut().set(x, y, color);
                }
            },
        );
    }
}

impl RendererInterface for Rasterizer {
    fn clear(&mut self, rgba: Vec4) {
        self.target.borrow_mut().clear(rgba);
    }

    fn set_model_view(&mut self, model_view: Mat4) {
        self.model_view = model_view;
        self.recompute_mvp();
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.recompute_mvp();
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn draw_triangles(&mut self, vertices: &[Vec3], indices: &[u32]) {
        for triple in indices.chunks_exact(3) {
            let v0 = Vec4::from_vec3(vertices[triple[0] as usize], 1.0);
            let v1 = Vec4::from_vec3(vertices[triple[1] as usize], 1.0);
            let v2 = Vec4::from_vec3(vertices[triple[2] as usize], 1.0);
            self.draw_triangle(v0, v1, v2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    fn rasterizer(width: u32, height: u32) -> Rasterizer {
        let target = Rc::new(RefCell::new(RenderTarget::new(width, height)));
        let mut r = Rasterizer::new(target);
        r.set_viewport(Viewport::new(0, 0, width, height));
        r
    }

    #[test]
    fn mvp_is_recomputed_on_every_setter() {
        let mut r = rasterizer(4, 4);
        let scale = Mat4::scaling(2.0, 2.0, 2.0);
        let translate = Mat4::translation(1.0, 0.0, 0.0);
        r.set_model_view(translate);
        r.set_projection(scale);
        let expected = scale * translate;
        // Spot-check via a point transform rather than comparing private fields.
        let v = Vec4::point(1.0, 1.0, 1.0);
        assert_eq!(r.model_view_projection * v, expected * v);
    }

    #[test]
    fn fullscreen_triangle_fills_target() {
        let mut r = rasterizer(4, 4);
        r.clear(Vec4::ZERO);
        r.draw_triangle(
            Vec4::point(-1.0, -1.0, 0.0),
            Vec4::point(3.0, -1.0, 0.0),
            Vec4::point(-1.0, 3.0, 0.0),
        );
        let target = r.target.borrow();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(target.depth().get(x, y), 0.5);
            }
        }
    }

    #[test]
    fn back_facing_triangle_leaves_target_cleared() {
        let mut r = rasterizer(4, 4);
        r.clear(Vec4::ZERO);
        r.draw_triangle(
            Vec4::point(-1.0, -1.0, 0.0),
            Vec4::point(-1.0, 3.0, 0.0),
            Vec4::point(3.0, -1.0, 0.0),
        );
        let target = r.target.borrow();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(target.depth().get(x, y), 1.0);
                assert_eq!(target.color().get(x, y), Vec4::ZERO);
            }
        }
    }

    #[test]
    fn out_of_range_depth_is_discarded() {
        let mut r = rasterizer(4, 4);
        r.clear(Vec4::ZERO);
        r.draw_triangle(
            Vec4::point(-1.0, -1.0, 2.0),
            Vec4::point(3.0, -1.0, 2.0),
            Vec4::point(-1.0, 3.0, 2.0),
        );
        let target = r.target.borrow();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(target.depth().get(x, y), 1.0);
                assert_eq!(target.color().get(x, y), Vec4::ZERO);
            }
        }
    }

    #[test]
    fn depth_ordering_keeps_the_nearer_fragment() {
        let mut r = rasterizer(4, 4);
        r.clear(Vec4::ZERO);
        r.draw_triangle(
            Vec4::point(-1.0, -1.0, 0.75),
            Vec4::point(3.0, -1.0, 0.75),
            Vec4::point(-1.0, 3.0, 0.75),
        );
        r.draw_triangle(
            Vec4::point(-1.0, -1.0, 0.25),
            Vec4::point(3.0, -1.0, 0.25),
            Vec4::point(-1.0, 3.0, 0.25),
        );
        let target = r.target.borrow();
        assert_eq!(target.depth().get(0, 0), 0.25);
    }

    #[test]
    fn draw_triangles_shares_vertices_through_indices() {
        let mut r = rasterizer(4, 4);
        r.clear(Vec4::ZERO);
        let vertices = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(3.0, -1.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.0),
        ];
        let indices = [0u32, 1, 2];
        r.draw_triangles(&vertices, &indices);
        let target = r.target.borrow();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(target.depth().get(x, y), 0.5);
            }
        }
    }

    #[test]
    fn draw_triangles_drops_trailing_partial_triple() {
        let mut r = rasterizer(4, 4);
        r.clear(Vec4::ZERO);
        let vertices = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(3.0, -1.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.0),
        ];
        let indices = [0u32, 1];
        r.draw_triangles(&vertices, &indices);
        let target = r.target.borrow();
        assert!(target.depth().pixels().iter().all(|&d| d == 1.0));
    }
}

//! The renderer-facing contract external callers (a windowing loop, a demo
//! binary) drive a rasterizer through.

use crate::math::{Mat4, Vec3, Vec4};
use crate::viewport::Viewport;

/// The abstract surface a rasterizer is driven through: matrix/viewport
/// state followed by batched triangle submission. A trait rather than a
/// tagged enum, since a single call site only ever holds one concrete
/// implementor at a time.
pub trait RendererInterface {
    /// Clears the back buffer to `rgba` and the depth buffer to the far
    /// plane (`1.0`).
    fn clear(&mut self, rgba: Vec4);

    /// Sets the model-view matrix applied before projection.
    fn set_model_view(&mut self, model_view: Mat4);

    /// Sets the projection matrix.
    fn set_projection(&mut self, projection: Mat4);

    /// Sets the screen-space viewport triangles are rasterized into.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Rasterizes a triangle list: `indices` is read three at a time, each
    /// triple indexing into `vertices` (object-space positions, shared
    /// across triangles) to form one triangle.
    ///
    /// A trailing partial triple (`indices.len()` not a multiple of three)
    /// is silently dropped.
    fn draw_triangles(&mut self, vertices: &[Vec3], indices: &[u32]);
}

//! Paired color/depth render target.

use crate::math::Vec4;
use crate::surface::Surface;

/// A color surface and a depth surface of matching dimensions.
///
/// Mirrors the teacher's `RenderTarget` (`RastaManRenderer`'s back buffer
/// plus z-buffer pair): the rasterizer writes interpolated fragment color and
/// depth into the two surfaces together, and a presentation layer reads the
/// color surface back out between draws.
pub struct RenderTarget {
    color: Surface<Vec4>,
    depth: Surface<f32>,
}

impl RenderTarget {
    /// Creates a target with a cleared color surface (`Vec4::ZERO`) and a
    /// depth surface cleared to `1.0` (the far plane).
    pub fn new(width: u32, height: u32) -> Self {
        let mut depth = Surface::new(width, height);
        depth.clear_to(1.0);
        Self {
            color: Surface::new(width, height),
            depth,
        }
    }

    /// Pairs two already-built surfaces.
    ///
    /// # Panics
    /// Panics if the two surfaces don't share the same dimensions.
    pub fn from_surfaces(color: Surface<Vec4>, depth: Surface<f32>) -> Self {
        assert_eq!(
            (color.width(), color.height()),
            (depth.width(), depth.height()),
            "color and depth surfaces must share dimensions"
        );
        Self { color, depth }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    #[inline]
    pub fn color(&self) -> &Surface<Vec4> {
        &self.color
    }

    #[inline]
    pub fn color_mut(&mut self) -> &mut Surface<Vec4> {
        &mut self.color
    }

    #[inline]
    pub fn depth(&self) -> &Surface<f32> {
        &self.depth
    }

    #[inline]
    pub fn depth_mut(&mut self) -> &mut Surface<f32> {
        &mut self.depth
    }

    /// Clears color to `rgba` and depth to the far plane (`1.0`).
    pub fn clear(&mut self, rgba: Vec4) {
        self.color.clear_to(rgba);
        self.depth.clear_to(1.0);
    }
}

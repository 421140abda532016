// Public API - exposed to library consumers
pub mod fixed;
pub mod math;
pub mod rasterizer;
pub mod renderer_interface;
pub mod surface;
pub mod target;
pub mod viewport;

// Re-export commonly needed types at crate root for convenience, mirroring
// how the teacher surfaces its top-level `Engine`/`Mesh` types.
pub use fixed::Fixed;
pub use math::{Mat4, Vec2, Vec3, Vec4};
pub use rasterizer::Rasterizer;
pub use renderer_interface::RendererInterface;
pub use surface::Surface;
pub use target::RenderTarget;
pub use viewport::Viewport;

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::rasterizer::edge_fixed::FixedPointEdgeRasterizer;
    pub use crate::viewport::Viewport;
}

//! Global render state.
//!
//! Most demos only ever need to clear, enable depth testing and multisampling once, and flip
//! between filled and wireframe rendering. Those operations are exposed on
//! [`GraphicsContext`](crate::context::GraphicsContext); this module holds the types they use.

/// How polygons get rasterized.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PolygonMode {
  /// Filled polygons.
  Fill,
  /// Only the edges of polygons (wireframe).
  Line,
  /// Only the vertices of polygons.
  Point,
}

impl Default for PolygonMode {
  fn default() -> Self {
    PolygonMode::Fill
  }
}

/// Clear color used by every demo.
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.4, 0.4, 0.4, 1.];

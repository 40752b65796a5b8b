//! Render state backend interface.

use crate::render_state::PolygonMode;

/// Global render state on the backend.
pub unsafe trait RenderState {
  /// Set the color used when clearing color buffers.
  unsafe fn set_clear_color(&mut self, color: [f32; 4]);

  /// Clear the color and/or depth buffers of the bound framebuffer.
  unsafe fn clear(&mut self, color: bool, depth: bool);

  /// Enable or disable depth testing.
  unsafe fn set_depth_test(&mut self, enabled: bool);

  /// Enable or disable multisampling.
  unsafe fn set_multisample(&mut self, enabled: bool);

  /// Set how polygons are rasterized.
  unsafe fn set_polygon_mode(&mut self, mode: PolygonMode);

  /// Set the viewport as `[x, y, width, height]`.
  unsafe fn set_viewport(&mut self, viewport: [i32; 4]);
}

//! Graphics context.
//!
//! A graphics context is an object owning a backend. This crate doesn’t create contexts: the
//! windowing crates (such as `ngl-glfw`) do, and implement [`GraphicsContext`] for them.
//!
//! # On context and threads
//!
//! A context must be `!Send` and `!Sync`: it cannot be moved nor shared between threads. Backends
//! typically enforce that by keeping their state behind an `Rc`. Only a single context can exist
//! per thread.

use crate::backend::render_state::RenderState;
use crate::render_state::PolygonMode;

/// Class of graphics context.
pub unsafe trait GraphicsContext: Sized {
  /// Backend type.
  type Backend: ?Sized;

  /// Access the backend.
  fn backend(&mut self) -> &mut Self::Backend;

  /// Set the clear color.
  fn set_clear_color(&mut self, color: [f32; 4])
  where
    Self::Backend: RenderState,
  {
    unsafe { self.backend().set_clear_color(color) }
  }

  /// Clear both the color and depth buffers of the bound framebuffer.
  fn clear(&mut self)
  where
    Self::Backend: RenderState,
  {
    unsafe { self.backend().clear(true, true) }
  }

  /// Enable or disable depth testing.
  fn set_depth_test(&mut self, enabled: bool)
  where
    Self::Backend: RenderState,
  {
    unsafe { self.backend().set_depth_test(enabled) }
  }

  /// Enable or disable multisampling.
  fn set_multisample(&mut self, enabled: bool)
  where
    Self::Backend: RenderState,
  {
    unsafe { self.backend().set_multisample(enabled) }
  }

  /// Switch between filled and wireframe rendering.
  fn set_polygon_mode(&mut self, mode: PolygonMode)
  where
    Self::Backend: RenderState,
  {
    unsafe { self.backend().set_polygon_mode(mode) }
  }

  /// Set the viewport to cover `[0, 0, width, height]`.
  fn set_viewport(&mut self, width: u32, height: u32)
  where
    Self::Backend: RenderState,
  {
    unsafe {
      self
        .backend()
        .set_viewport([0, 0, width as i32, height as i32])
    }
  }
}

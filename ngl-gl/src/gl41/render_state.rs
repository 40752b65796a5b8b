//! Global render state.

use crate::gl41::GL41;
use gl::types::*;
use ngl::backend::render_state::RenderState;
use ngl::render_state::PolygonMode;

unsafe impl RenderState for GL41 {
  unsafe fn set_clear_color(&mut self, color: [f32; 4]) {
    self.state.borrow_mut().set_clear_color(color);
  }

  unsafe fn clear(&mut self, color: bool, depth: bool) {
    let mut bits: GLbitfield = 0;

    if color {
      bits |= gl::COLOR_BUFFER_BIT;
    }

    if depth {
      bits |= gl::DEPTH_BUFFER_BIT;
    }

    if bits != 0 {
      gl::Clear(bits);
    }
  }

  unsafe fn set_depth_test(&mut self, enabled: bool) {
    self.state.borrow_mut().set_depth_test(enabled);
  }

  unsafe fn set_multisample(&mut self, enabled: bool) {
    self.state.borrow_mut().set_multisample(enabled);
  }

  unsafe fn set_polygon_mode(&mut self, mode: PolygonMode) {
    let mode = match mode {
      PolygonMode::Fill => gl::FILL,
      PolygonMode::Line => gl::LINE,
      PolygonMode::Point => gl::POINT,
    };

    self.state.borrow_mut().set_polygon_mode(mode);
  }

  unsafe fn set_viewport(&mut self, viewport: [i32; 4]) {
    self.state.borrow_mut().set_viewport(viewport);
  }
}

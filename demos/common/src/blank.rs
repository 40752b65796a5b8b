//! Empty template: a cleared window with the usual orbit controls and nothing to draw.
//!
//! Start from this file to write a new demo.

use crate::{
  shared::{begin_frame, setup_render_state, Handled, OrbitView},
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::Point3;
use ngl::context::GraphicsContext;

pub struct LocalExample {
  view: OrbitView,
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);

    Ok(LocalExample {
      view: OrbitView::new(Point3::new(0., 1., 4.), 0.05, 350.),
    })
  }

  fn render_frame(
    mut self,
    _: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<LoopFeedback<Self>, DemoError> {
    for action in actions {
      if self.view.handle(&action, context) == Handled::Exit {
        return Ok(LoopFeedback::Exit);
      }
    }

    begin_frame(context, self.view.size());

    Ok(LoopFeedback::Continue(self))
  }
}

//! Multiple render targets, copied onto the screen with framebuffer blits.
//!
//! A screen quad writes a different checker pattern into each color attachment of a framebuffer
//! as large as the window. Keys `1` to `8` pick the attachment copied onto the screen; `A` shows
//! all of them at once in a 4×2 grid.

use crate::{
  shaders::BuiltinShader,
  shared::{begin_frame, setup_render_state, Handled, OrbitView},
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::Point3;
use ngl::{
  context::GraphicsContext,
  framebuffer::{
    max_color_attachments, DepthFormat, Framebuffer, FramebufferBuilder, FramebufferError,
  },
  shader::ShaderLib,
  texture::{Filter, PixelFormat, Wrap},
  vao::{AttribPointer, BindVao, Mode, SimpleVao, VertexData},
};

/// Outputs of the checker program.
const MAX_ATTACHMENTS: usize = 8;

const CHECK_SIZE: f32 = 40.;

/// Two triangles covering the viewport.
const QUAD: [[f32; 2]; 6] = [
  [-1., 1.],
  [-1., -1.],
  [1., -1.],
  [-1., 1.],
  [1., -1.],
  [1., 1.],
];

/// What gets copied onto the screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Selection {
  Attachment(usize),
  Grid,
}

/// Rectangle, as `[x0, y0, x1, y1]`, of the `index`-th cell of a 4×2 grid covering a `width` by
/// `height` area. The first four cells make the bottom row.
fn grid_cell(index: usize, width: u32, height: u32) -> [i32; 4] {
  let (w4, h2) = ((width / 4) as i32, (height / 2) as i32);
  let col = (index % 4) as i32;

  if index < 4 {
    [w4 * col, 0, w4 * col + w4, h2]
  } else {
    [w4 * col, h2, w4 * col + w4, height as i32]
  }
}

fn build_framebuffer(
  backend: &mut Backend,
  [width, height]: [u32; 2],
  attachments: usize,
) -> Result<Framebuffer<Backend>, FramebufferError> {
  (0..attachments)
    .fold(FramebufferBuilder::new(width, height), |builder, _| {
      builder.color(PixelFormat::Rgb8, Filter::Nearest, Wrap::ClampToEdge)
    })
    .depth(DepthFormat::Depth24Stencil8)
    .build(backend)
}

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  quad: SimpleVao<Backend>,
  framebuffer: Framebuffer<Backend>,
  attachments: usize,
  selection: Selection,
  last_attachment: usize,
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);
    let backend = context.backend();
    let view = OrbitView::new(Point3::new(0., 0., 1.), 0.01, 350.);

    let max = max_color_attachments(backend);
    let attachments = max.min(MAX_ATTACHMENTS);
    log::info!("{} color attachments supported, using {}", max, attachments);

    let mut shaders = ShaderLib::new();
    BuiltinShader::Checker.load(&mut shaders, backend)?;

    let mut quad = SimpleVao::new(backend, Mode::Triangle)?;

    {
      let mut quad = quad.bind(backend);
      quad.set_data(VertexData::new(&QUAD))?;
      quad.set_vertex_attribute_pointer(AttribPointer::floats(0, 2, 0, 0))?;
    }

    let framebuffer = build_framebuffer(backend, view.size(), attachments)?;

    Ok(LocalExample {
      view,
      shaders,
      quad,
      framebuffer,
      attachments,
      selection: Selection::Attachment(0),
      last_attachment: 0,
    })
  }

  fn render_frame(
    mut self,
    _: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<LoopFeedback<Self>, DemoError> {
    for action in actions {
      match action {
        InputAction::Key(c @ '1'..='8') => {
          let index = c as usize - '1' as usize;

          if index < self.attachments {
            self.selection = Selection::Attachment(index);
            self.last_attachment = index;
          } else {
            log::warn!("no color attachment {}", index);
          }
        }

        InputAction::Key('a') => {
          self.selection = match self.selection {
            Selection::Grid => Selection::Attachment(self.last_attachment),
            Selection::Attachment(_) => Selection::Grid,
          };
        }

        _ => (),
      }

      if self.view.handle(&action, context) == Handled::Exit {
        return Ok(LoopFeedback::Exit);
      }
    }

    let [width, height] = self.view.size();

    if self.framebuffer.size() != [width, height] && width > 0 && height > 0 {
      log::debug!("resizing render targets to {}×{}", width, height);
      self.framebuffer =
        build_framebuffer(context.backend(), [width, height], self.attachments)?;
    }

    begin_frame(context, [width, height]);

    self.framebuffer.bind(context.backend());
    context.clear();

    let backend = context.backend();
    self.framebuffer.set_draw_buffers(backend, self.attachments)?;

    self
      .shaders
      .use_program(backend, BuiltinShader::Checker.name())?;
    self.shaders.set_uniform(backend, "checkSize", CHECK_SIZE)?;
    self.shaders.set_uniform(backend, "width", width as i32)?;
    self.shaders.set_uniform(backend, "height", height as i32)?;
    self.quad.bind(backend).draw()?;

    Framebuffer::bind_default(backend);

    match self.selection {
      Selection::Attachment(index) => {
        let all = [0, 0, width as i32, height as i32];
        self
          .framebuffer
          .blit_to_default(backend, index, all, all, Filter::Nearest)?;
      }

      Selection::Grid => {
        for index in 0..self.attachments {
          let cell = grid_cell(index, width, height);
          self
            .framebuffer
            .blit_to_default(backend, index, cell, cell, Filter::Nearest)?;
        }
      }
    }

    Ok(LoopFeedback::Continue(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn grid_cells() {
    assert_eq!(grid_cell(0, 1024, 720), [0, 0, 256, 360]);
    assert_eq!(grid_cell(3, 1024, 720), [768, 0, 1024, 360]);
    assert_eq!(grid_cell(4, 1024, 720), [0, 360, 256, 720]);
    assert_eq!(grid_cell(7, 1024, 720), [768, 360, 1024, 720]);
  }

  #[test]
  fn odd_heights_reach_the_top() {
    assert_eq!(grid_cell(5, 1000, 721), [250, 360, 500, 721]);
  }
}

//! An icosahedron drawn from a `simpleIndexVAO`: positions and colours interleaved in one buffer,
//! faces given by 16-bit indices.

use crate::{
  shaders::BuiltinShader,
  shared::{begin_frame, load_mvp, setup_render_state, Handled, OrbitView, ICOSAHEDRON_COLOURS},
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::Point3;
use ngl::{
  context::GraphicsContext,
  mesh::icosahedron_indexed,
  shader::ShaderLib,
  vao::{AbstractVao, AttribPointer, BindVao, IndexVertexData, Mode, VertexData},
  vao_factory::{names, VaoFactory},
};
use std::mem;

const STRIDE: usize = mem::size_of::<[f32; 6]>();

/// Position then colour, for each vertex.
fn interleave(positions: &[[f32; 3]], colours: &[[f32; 3]]) -> Vec<[f32; 6]> {
  positions
    .iter()
    .zip(colours)
    .map(|(p, c)| [p[0], p[1], p[2], c[0], c[1], c[2]])
    .collect()
}

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  vao: Box<dyn AbstractVao<Backend>>,
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);
    let backend = context.backend();

    let mut shaders = ShaderLib::new();
    BuiltinShader::VertexColour.load(&mut shaders, backend)?;

    let (positions, indices) = icosahedron_indexed();
    let vertices = interleave(positions, &ICOSAHEDRON_COLOURS);

    let mut vao = VaoFactory::new().create_vao(backend, names::SIMPLE_INDEX, Mode::Triangle)?;

    {
      let mut vao = vao.bind(backend);
      vao.set_data(IndexVertexData::new(VertexData::new(&vertices), indices))?;
      vao.set_vertex_attribute_pointer(AttribPointer::floats(0, 3, STRIDE, 0))?;
      vao.set_vertex_attribute_pointer(AttribPointer::floats(
        1,
        3,
        STRIDE,
        mem::size_of::<[f32; 3]>(),
      ))?;
    }

    log::info!("{} built with {} indices", vao.name(), vao.num_indices());

    Ok(LocalExample {
      view: OrbitView::new(Point3::new(0., 1., 2.), 0.01, 350.),
      shaders,
      vao,
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
    let backend = context.backend();

    self
      .shaders
      .use_program(backend, BuiltinShader::VertexColour.name())?;
    load_mvp(
      &mut self.shaders,
      backend,
      self.view.mouse_tx(),
      self.view.view,
      self.view.project(),
    )?;

    self.vao.bind(backend).draw()?;

    Ok(LoopFeedback::Continue(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn interleaving() {
    let (positions, indices) = icosahedron_indexed();
    let vertices = interleave(positions, &ICOSAHEDRON_COLOURS);

    assert_eq!(vertices.len(), 12);
    assert_eq!(indices.len(), 60);
    assert_eq!(&vertices[1][..3], &positions[1][..]);
    assert_eq!(&vertices[1][3..], &[1., 0.55, 0.][..]);
    assert_eq!(STRIDE, 24);
  }
}

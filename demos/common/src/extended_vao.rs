//! Registering a new kind of VAO in a factory.
//!
//! The icosahedron is stored in a [`MultiBufferIndexVao`]: positions in slot `0`, colours in slot
//! `1` and the faces in the index buffer. Three copies show partial draws: the faces uncovered so
//! far, the whole solid, and the current face alone over a wireframe of the solid.

use crate::{
  multi_buffer_index_vao::{creator, MultiBufferIndexVao},
  shaders::BuiltinShader,
  shared::{
    begin_frame, load_mvp, setup_render_state, Handled, OrbitView, Ticker, ICOSAHEDRON_COLOURS,
  },
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::{Matrix4, Point3};
use ngl::{
  context::GraphicsContext,
  mesh::icosahedron_indexed,
  render_state::PolygonMode,
  shader::ShaderLib,
  transform::Transform,
  vao::{AbstractVao, AttribPointer, BindVao, DrawRange, Mode, VertexData},
  vao_factory::VaoFactory,
};

/// Move the face cursor by three faces, going back to the first one once `num_indices / 3` is
/// reached.
fn step(index: usize, num_indices: usize) -> usize {
  let index = index + 3;

  if index >= num_indices / 3 {
    0
  } else {
    index
  }
}

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  vao: Box<dyn AbstractVao<Backend>>,
  ticker: Ticker,
  index: usize,
  polygon: PolygonMode,
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

    let mut factory = VaoFactory::new();
    factory.register_creator(MultiBufferIndexVao::<Backend>::NAME, creator::<Backend>);
    log::info!("available VAOs: {}", factory.list_creators().join(", "));

    let (positions, indices) = icosahedron_indexed();
    let mut vao =
      factory.create_vao(backend, MultiBufferIndexVao::<Backend>::NAME, Mode::Triangle)?;

    {
      let mut vao = vao.bind(backend);
      vao.set_data(VertexData::new(positions))?;
      vao.set_vertex_attribute_pointer(AttribPointer::floats(0, 3, 0, 0))?;
      vao.set_data(VertexData::new(&ICOSAHEDRON_COLOURS))?;
      vao.set_vertex_attribute_pointer(AttribPointer::floats(1, 3, 0, 0))?;
      vao.set_indices(indices)?;
    }

    Ok(LocalExample {
      view: OrbitView::new(Point3::new(0., 1., 3.), 0.05, 350.),
      shaders,
      vao,
      ticker: Ticker::new(0.16),
      index: 0,
      polygon: PolygonMode::Fill,
    })
  }

  fn render_frame(
    mut self,
    time: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<LoopFeedback<Self>, DemoError> {
    for action in actions {
      match self.view.handle(&action, context) {
        Handled::Exit => return Ok(LoopFeedback::Exit),
        Handled::Polygon(mode) => self.polygon = mode,
        _ => (),
      }
    }

    for _ in 0..self.ticker.ticks(time) {
      self.index = step(self.index, self.vao.num_indices());
    }

    begin_frame(context, self.view.size());

    let mouse_tx = self.view.mouse_tx();
    let mut tx = Transform::new();
    let first = self.index * 3;

    self
      .shaders
      .use_program(context.backend(), BuiltinShader::VertexColour.name())?;

    // faces uncovered so far
    tx.set_position(-1.2, 0., 0.);
    self.draw(context.backend(), &tx, mouse_tx, DrawRange::new(0, first))?;

    tx.set_position(0., 0., 0.);
    self.draw(context.backend(), &tx, mouse_tx, DrawRange::all())?;

    // current face, then the whole solid in wireframe around it
    tx.set_position(1.2, 0., 0.);
    self.draw(context.backend(), &tx, mouse_tx, DrawRange::new(first, 3))?;
    context.set_polygon_mode(PolygonMode::Line);
    self.draw(context.backend(), &tx, mouse_tx, DrawRange::all())?;
    context.set_polygon_mode(self.polygon);

    Ok(LoopFeedback::Continue(self))
  }
}

impl LocalExample {
  fn draw(
    &mut self,
    backend: &mut Backend,
    tx: &Transform,
    mouse_tx: Matrix4<f32>,
    range: DrawRange,
  ) -> Result<(), DemoError> {
    load_mvp(
      &mut self.shaders,
      backend,
      tx.matrix() * mouse_tx,
      self.view.view,
      self.view.project(),
    )?;

    self.vao.bind(backend).draw_range(range)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stepping_wraps() {
    let mut index = 0;
    let mut seen = Vec::new();

    for _ in 0..8 {
      index = step(index, 60);
      seen.push(index);
    }

    assert_eq!(seen, vec![3, 6, 9, 12, 15, 18, 0, 3]);
  }

  #[test]
  fn every_step_stays_drawable() {
    let mut index = 0;

    for _ in 0..20 {
      index = step(index, 60);
      // both partial draws stay within the 60 indices
      assert!(index * 3 + 3 <= 60);
    }
  }
}

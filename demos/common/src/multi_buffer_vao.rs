//! Positions and normals packed one after the other in a single buffer of a `multiBufferVAO`.
//!
//! The buffer holds the 15 positions first, then the 15 normals, so the normal attribute starts
//! at byte `15 · 12`.

use crate::{
  shaders::BuiltinShader,
  shared::{
    begin_frame, face_normals, gold_phong, load_matrices, setup_render_state, Handled, OrbitView,
    BOID,
  },
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::Point3;
use ngl::{
  context::GraphicsContext,
  mesh::Vertex,
  shader::ShaderLib,
  vao::{AbstractVao, AttribPointer, BindVao, Mode, VertexData},
  vao_factory::{names, VaoFactory},
};
use std::mem;

const VERTEX_COUNT: usize = 15;
const FACES: [[usize; 3]; 5] = [[2, 1, 0], [3, 4, 5], [6, 7, 8], [11, 10, 9], [14, 13, 12]];
const LIGHT: [f32; 4] = [-2., 5., 2., 0.];

/// The boid with its last face repeated, followed by the flat normals.
fn packed_boid() -> Vec<[f32; 3]> {
  let mut vertices = BOID.to_vec();
  vertices.extend_from_slice(&[[0., 1., 1.], [0., 0., 1.5], [0.5, 0., 1.]]);

  let normals = face_normals(&vertices, &FACES);
  vertices.extend(normals);
  vertices
}

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  boid: Box<dyn AbstractVao<Backend>>,
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);
    let backend = context.backend();
    let view = OrbitView::new(Point3::new(0., 1., -4.), 0.01, 350.);

    let mut shaders = ShaderLib::new();
    BuiltinShader::Phong.load(&mut shaders, backend)?;
    gold_phong(&mut shaders, backend, LIGHT, view.eye)?;

    let data = packed_boid();
    let normal_offset = VERTEX_COUNT * mem::size_of::<[f32; 3]>();

    let factory = VaoFactory::new();
    let mut boid = factory.create_vao(backend, names::MULTI_BUFFER, Mode::Triangle)?;

    {
      let mut vao = boid.bind(backend);

      // only the first half is made of vertices
      vao.set_data_at(0, VertexData::new(&data).with_size(VERTEX_COUNT))?;
      vao.set_vertex_attribute_pointer(AttribPointer::floats(Vertex::POSITION, 3, 0, 0))?;
      vao.set_vertex_attribute_pointer(AttribPointer::floats(
        Vertex::NORMAL,
        3,
        0,
        normal_offset,
      ))?;
    }

    log::info!(
      "{} vertices, normals at byte {}",
      boid.num_indices(),
      normal_offset
    );

    Ok(LocalExample {
      view,
      shaders,
      boid,
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
      .use_program(backend, BuiltinShader::Phong.name())?;
    load_matrices(
      &mut self.shaders,
      backend,
      self.view.mouse_tx(),
      self.view.view,
      self.view.project(),
    )?;

    self.boid.bind(backend).draw()?;

    Ok(LoopFeedback::Continue(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn packing() {
    let data = packed_boid();

    assert_eq!(data.len(), 2 * VERTEX_COUNT);
    assert_eq!(&data[..12], &BOID[..]);

    // normals follow the vertices, three per face
    let normals = &data[VERTEX_COUNT..];
    assert_eq!(normals[0], normals[2]);
    assert_eq!(normals[9], normals[12]);
    assert!(normals[0][0] < 0.);
  }
}

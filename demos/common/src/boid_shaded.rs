//! The boid again, phong shaded in gold.
//!
//! Positions and normals live in two buffers of a `multiBufferVAO`: positions in slot `0`, flat
//! face normals in slot `1`.

use crate::{
  shaders::BuiltinShader,
  shared::{
    begin_frame, face_normals, gold_phong, load_matrices, setup_render_state, Handled, OrbitView,
    BOID, BOID_FACES,
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

const LIGHT: [f32; 4] = [-2., 3., 2., 0.];

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
    let view = OrbitView::new(Point3::new(0., 1., 4.), 0.01, 350.);

    let mut shaders = ShaderLib::new();
    BuiltinShader::Phong.load(&mut shaders, backend)?;
    gold_phong(&mut shaders, backend, LIGHT, view.eye)?;

    let normals = face_normals(&BOID, &BOID_FACES);

    let factory = VaoFactory::new();
    let mut boid = factory.create_vao(backend, names::MULTI_BUFFER, Mode::Triangle)?;

    {
      let mut vao = boid.bind(backend);

      vao.set_data_at(0, VertexData::new(&BOID))?;
      vao.set_vertex_attribute_pointer(AttribPointer::floats(Vertex::POSITION, 3, 0, 0))?;

      vao.set_data_at(1, VertexData::new(&normals))?;
      vao.set_vertex_attribute_pointer(AttribPointer::floats(Vertex::NORMAL, 3, 0, 0))?;
    }

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

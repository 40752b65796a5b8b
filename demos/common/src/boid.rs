//! A boid, made of four triangles, drawn in white from a `simpleVAO`.
//!
//! The VAO is created by name through a [`VaoFactory`], the way every other kind of VAO is.

use crate::{
  shaders::BuiltinShader,
  shared::{begin_frame, load_mvp, setup_render_state, Handled, OrbitView, BOID},
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::Point3;
use ngl::{
  context::GraphicsContext,
  shader::ShaderLib,
  vao::{AbstractVao, AttribPointer, BindVao, Mode, VertexData},
  vao_factory::{names, VaoFactory},
};

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

    let mut shaders = ShaderLib::new();
    BuiltinShader::Colour.load(&mut shaders, backend)?;
    shaders.use_program(backend, BuiltinShader::Colour.name())?;
    shaders.set_uniform(backend, "Colour", [1f32; 4])?;

    let factory = VaoFactory::new();
    let mut boid = factory.create_vao(backend, names::SIMPLE, Mode::Triangle)?;

    {
      let mut vao = boid.bind(backend);
      vao.set_data(VertexData::new(&BOID))?;
      vao.set_vertex_attribute_pointer(AttribPointer::floats(0, 3, 0, 0))?;
    }

    Ok(LocalExample {
      view: OrbitView::new(Point3::new(0., 1., 4.), 0.01, 350.),
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
      .use_program(backend, BuiltinShader::Colour.name())?;
    load_mvp(
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

//! A textured sphere in a `simpleVAO` drawn as a triangle strip.
//!
//! <https://paulbourke.net/geometry/circlesphere/>

use crate::{
  shaders::BuiltinShader,
  shared::{begin_frame, load_mvp, setup_render_state, Handled, OrbitView},
  Backend, DemoError, Example, Features, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::Point3;
use ngl::{
  context::GraphicsContext,
  mesh,
  shader::ShaderLib,
  texture::{Sampling, Texture2D},
  vao::{BindVao, SimpleVao},
};

const TEXTURE: &str = "earth.png";

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  sphere: SimpleVao<Backend>,
  texture: Texture2D<Backend>,
}

impl Example for LocalExample {
  fn features() -> Features {
    Features::none().texture(TEXTURE)
  }

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);
    let backend = context.backend();

    let mut shaders = ShaderLib::new();
    BuiltinShader::Texture.load(&mut shaders, backend)?;
    shaders.use_program(backend, BuiltinShader::Texture.name())?;
    shaders.set_uniform(backend, "tex", 0i32)?;

    let image = platform.fetch_texture(TEXTURE).map_err(DemoError::platform)?;
    let texture = Texture2D::from_image(backend, image, Sampling::default())?;

    let sphere = mesh::sphere(1., 100).create_vao(backend)?;

    Ok(LocalExample {
      view: OrbitView::new(Point3::new(0., 1., 4.), 0.05, 350.),
      shaders,
      sphere,
      texture,
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
      .use_program(backend, BuiltinShader::Texture.name())?;
    load_mvp(
      &mut self.shaders,
      backend,
      self.view.mouse_tx(),
      self.view.view,
      self.view.project(),
    )?;

    self.texture.bind(backend, 0);
    self.sphere.bind(backend).draw()?;

    Ok(LoopFeedback::Continue(self))
  }
}

//! Render to texture.
//!
//! A spinning teapot is rendered with phong shading into the color attachment of a framebuffer,
//! which then textures a plane and a sphere drawn on screen.

use crate::{
  shaders::BuiltinShader,
  shared::{
    begin_frame, gold_phong, load_matrices, load_mvp, setup_render_state, Handled, OrbitView,
    Ticker,
  },
  Backend, DemoError, Example, Features, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::{Point3, Vector3};
use ngl::{
  context::GraphicsContext,
  framebuffer::{DepthFormat, Framebuffer, FramebufferBuilder},
  math::{look_at, perspective},
  primitives::Primitives,
  render_state::DEFAULT_CLEAR_COLOR,
  shader::ShaderLib,
  texture::{Filter, PixelFormat, Wrap},
  transform::Transform,
};

const TEXTURE_SIZE: u32 = 1024;

const TEXTURE_CLEAR_COLOR: [f32; 4] = [0., 0.4, 0.5, 1.];

const LIGHT: [f32; 4] = [-2., 5., 2., 0.];

/// Seconds between two rotation steps of one degree.
const ROTATION_PERIOD: f32 = 0.06;

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  primitives: Primitives<Backend>,
  framebuffer: Framebuffer<Backend>,
  ticker: Ticker,
  rotation: f32,
}

impl Example for LocalExample {
  fn features() -> Features {
    Features::none().meshes()
  }

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);
    let backend = context.backend();
    let view = OrbitView::new(Point3::new(2., 2., 2.), 0.1, 100.);

    let mut shaders = ShaderLib::new();
    BuiltinShader::Phong.load(&mut shaders, backend)?;
    BuiltinShader::Texture.load(&mut shaders, backend)?;

    shaders.use_program(backend, BuiltinShader::Texture.name())?;
    shaders.set_uniform(backend, "tex", 0i32)?;
    gold_phong(&mut shaders, backend, LIGHT, view.eye)?;

    let framebuffer = FramebufferBuilder::new(TEXTURE_SIZE, TEXTURE_SIZE)
      .color(PixelFormat::Rgba8, Filter::Linear, Wrap::ClampToEdge)
      .depth(DepthFormat::Depth24)
      .build(backend)?;

    let mut primitives = Primitives::new();
    primitives.load_default_primitives(backend, platform.mesh_root())?;
    primitives.create_triangle_plane(backend, "plane", 2., 2., 20, 20, Vector3::unit_y())?;
    primitives.create_sphere(backend, "sphere", 0.4, 80)?;

    Ok(LocalExample {
      view,
      shaders,
      primitives,
      framebuffer,
      ticker: Ticker::new(ROTATION_PERIOD),
      rotation: 0.,
    })
  }

  fn render_frame(
    mut self,
    time: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<LoopFeedback<Self>, DemoError> {
    for action in actions {
      if self.view.handle(&action, context) == Handled::Exit {
        return Ok(LoopFeedback::Exit);
      }
    }

    self.rotation = (self.rotation + self.ticker.ticks(time) as f32) % 360.;

    self.render_to_texture(context)?;
    self.render_scene(context)?;

    Ok(LoopFeedback::Continue(self))
  }
}

impl LocalExample {
  fn render_to_texture(
    &mut self,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<(), DemoError> {
    self.framebuffer.bind(context.backend());
    context.set_clear_color(TEXTURE_CLEAR_COLOR);
    context.set_viewport(TEXTURE_SIZE, TEXTURE_SIZE);
    context.clear();

    let backend = context.backend();
    let mut tx = Transform::new();
    tx.set_rotation(self.rotation, self.rotation, self.rotation);

    self
      .shaders
      .use_program(backend, BuiltinShader::Phong.name())?;
    load_matrices(
      &mut self.shaders,
      backend,
      tx.matrix(),
      look_at(self.view.eye, Point3::new(0., 0., 0.), Vector3::unit_y()),
      perspective(45., 1., 0.1, 100.),
    )?;
    self.primitives.draw(backend, "teapot")?;

    Framebuffer::bind_default(backend);

    Ok(())
  }

  fn render_scene(
    &mut self,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<(), DemoError> {
    context.set_clear_color(DEFAULT_CLEAR_COLOR);
    begin_frame(context, self.view.size());

    let backend = context.backend();
    let mouse_tx = self.view.mouse_tx();
    let project = self.view.project();

    self
      .shaders
      .use_program(backend, BuiltinShader::Texture.name())?;
    self.framebuffer.bind_color_texture(backend, 0, 0)?;

    load_mvp(&mut self.shaders, backend, mouse_tx, self.view.view, project)?;
    self.primitives.draw(backend, "plane")?;

    let mut tx = Transform::new();
    tx.set_position(0., 1., 0.);
    load_mvp(
      &mut self.shaders,
      backend,
      mouse_tx * tx.matrix(),
      self.view.view,
      project,
    )?;
    self.primitives.draw(backend, "sphere")?;

    Ok(())
  }
}

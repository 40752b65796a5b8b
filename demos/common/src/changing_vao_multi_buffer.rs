//! The random lines of [`changing_vao`](crate::changing_vao), rewriting slot `0` of a
//! `multiBufferVAO` instead.

use crate::{
  changing_vao::{random_lines, PERIOD},
  shaders::BuiltinShader,
  shared::{begin_frame, load_mvp, seeded_rng, setup_render_state, Handled, OrbitView, Ticker},
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::Point3;
use ngl::{
  context::GraphicsContext,
  shader::ShaderLib,
  vao::{AttribPointer, BindVao, BufferUsage, Mode, MultiBufferVao, VertexData},
};
use rand::rngs::StdRng;

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  vao: MultiBufferVao<Backend>,
  ticker: Ticker,
  rng: StdRng,
  points: Vec<[f32; 3]>,
}

impl Example for LocalExample {
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);
    let backend = context.backend();

    let mut shaders = ShaderLib::new();
    BuiltinShader::Colour.load(&mut shaders, backend)?;

    let vao = MultiBufferVao::new(backend, Mode::Line)?;

    let mut rng = seeded_rng(platform);
    let points = random_lines(&mut rng);

    Ok(LocalExample {
      view: OrbitView::new(Point3::new(0., 1., 40.), 0.01, 350.),
      shaders,
      vao,
      ticker: Ticker::new(PERIOD),
      rng,
      points,
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

    if self.ticker.ticks(time) > 0 {
      self.points = random_lines(&mut self.rng);
    }

    begin_frame(context, self.view.size());
    let backend = context.backend();

    self
      .shaders
      .use_program(backend, BuiltinShader::Colour.name())?;
    self.shaders.set_uniform(backend, "Colour", [1f32; 4])?;
    load_mvp(
      &mut self.shaders,
      backend,
      self.view.mouse_tx(),
      self.view.view,
      self.view.project(),
    )?;

    let data = VertexData::new(&self.points).with_usage(BufferUsage::DynamicDraw);

    let mut vao = self.vao.bind(backend);
    // always the same slot, so no buffer gets appended
    vao.set_data_at(0, data)?;
    vao.set_vertex_attribute_pointer(AttribPointer::floats(0, 3, 0, 0))?;
    vao.draw()?;
    drop(vao);

    log::debug!(
      "{} buffer(s), {} vertices",
      self.vao.buffer_count(),
      self.points.len()
    );

    Ok(LoopFeedback::Continue(self))
  }
}

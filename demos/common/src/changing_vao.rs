//! A cloud of random lines, regenerated every 220 ms and uploaded again every frame into the same
//! `simpleVAO`.

use crate::{
  shaders::BuiltinShader,
  shared::{begin_frame, load_mvp, seeded_rng, setup_render_state, Handled, OrbitView, Ticker},
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::Point3;
use ngl::{
  context::GraphicsContext,
  shader::ShaderLib,
  vao::{AbstractVao, AttribPointer, BindVao, BufferUsage, Mode, VertexData},
  vao_factory::{names, VaoFactory},
};
use rand::{rngs::StdRng, Rng};

/// Seconds between two clouds.
pub(crate) const PERIOD: f32 = 0.22;

/// A random number of lines, as pairs of points in a cube of side 10.
pub(crate) fn random_lines(rng: &mut impl Rng) -> Vec<[f32; 3]> {
  let lines = 100 + rng.gen_range(0..12000);

  (0..lines * 2)
    .map(|_| {
      [
        rng.gen_range(-1f32..1.) * 5.,
        rng.gen_range(-1f32..1.) * 5.,
        rng.gen_range(-1f32..1.) * 5.,
      ]
    })
    .collect()
}

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  vao: Box<dyn AbstractVao<Backend>>,
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

    let vao = VaoFactory::new().create_vao(backend, names::SIMPLE, Mode::Line)?;

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
    log::debug!("uploading {} bytes", data.bytes().len());

    let mut vao = self.vao.bind(backend);
    vao.set_data(data)?;
    vao.set_vertex_attribute_pointer(AttribPointer::floats(0, 3, 0, 0))?;
    vao.draw()?;
    drop(vao);

    Ok(LoopFeedback::Continue(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;

  #[test]
  fn lines_come_in_pairs_of_points() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..10 {
      let points = random_lines(&mut rng);

      assert_eq!(points.len() % 2, 0);
      assert!(points.len() >= 200 && points.len() < 2 * 12100);
      assert!(points.iter().flatten().all(|c| c.abs() <= 5.));
    }
  }

  #[test]
  fn seeded_clouds_are_reproducible() {
    let a = random_lines(&mut StdRng::seed_from_u64(7));
    let b = random_lines(&mut StdRng::seed_from_u64(7));

    assert_eq!(a, b);
  }
}

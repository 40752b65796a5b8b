//! Cook-Torrance shading of a 7×7 grid of spheres: metalness grows along rows and roughness along
//! columns. Four white lights, shown as small spheres, sit above the corners of the grid.

use crate::{
  shaders::BuiltinShader,
  shared::{
    begin_frame, load_matrices, load_mvp, setup_render_state, upload_lights, Handled, OrbitView,
    LIGHT_COUNT,
  },
  Backend, DemoError, Example, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::{Point3, Vector3};
use ngl::{
  context::GraphicsContext, primitives::Primitives, shader::ShaderLib, transform::Transform,
};

const GRID: usize = 7;

const LIGHT_POSITIONS: [[f32; 3]; LIGHT_COUNT] = [
  [-10., 4., -10.],
  [10., 4., -10.],
  [-10., 4., 10.],
  [10., 4., 10.],
];

const LIGHT_COLOURS: [[f32; 3]; LIGHT_COUNT] = [[300.; 3]; LIGHT_COUNT];

/// Material and position of a sphere of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
  metallic: f32,
  roughness: f32,
  position: [f32; 3],
}

fn cell(row: usize, col: usize) -> Cell {
  let last = (GRID - 1) as f32;
  let (row, col) = (row as f32, col as f32);

  Cell {
    metallic: row / last,
    roughness: (col / last).max(0.05),
    position: [(col - 3.) * 2.5, -1., (row - 3.) * 2.5],
  }
}

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  primitives: Primitives<Backend>,
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);
    let backend = context.backend();
    let view = OrbitView::new(Point3::new(0., 5., 13.), 0.05, 350.);

    let mut shaders = ShaderLib::new();
    BuiltinShader::Colour.load(&mut shaders, backend)?;
    BuiltinShader::Pbr.load(&mut shaders, backend)?;

    shaders.use_program(backend, BuiltinShader::Pbr.name())?;
    shaders.print_registered_uniforms(backend, BuiltinShader::Pbr.name())?;
    shaders.set_uniform(backend, "albedo", [0.5f32, 0., 0.])?;
    shaders.set_uniform(backend, "ao", 1f32)?;
    shaders.set_uniform(backend, "camPos", view.eye)?;
    shaders.set_uniform(backend, "exposure", 1f32)?;

    let mut primitives = Primitives::new();
    primitives.create_sphere(backend, "sphere", 0.5, 40)?;
    primitives.create_triangle_plane(backend, "floor", 20., 20., 10, 10, Vector3::unit_y())?;

    Ok(LocalExample {
      view,
      shaders,
      primitives,
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

    let mouse_tx = self.view.mouse_tx();
    let project = self.view.project();
    let mut tx = Transform::new();

    self
      .shaders
      .use_program(backend, BuiltinShader::Colour.name())?;

    self
      .shaders
      .set_uniform(backend, "Colour", [0.8f32, 0.8, 0.8, 1.])?;
    tx.set_position(0., -1.5, 0.);
    load_mvp(
      &mut self.shaders,
      backend,
      mouse_tx * tx.matrix(),
      self.view.view,
      project,
    )?;
    self.primitives.draw(backend, "floor")?;

    self.shaders.set_uniform(backend, "Colour", [1f32; 4])?;
    for &[x, y, z] in LIGHT_POSITIONS.iter() {
      tx.set_position(x, y, z);
      load_mvp(
        &mut self.shaders,
        backend,
        mouse_tx * tx.matrix(),
        self.view.view,
        project,
      )?;
      self.primitives.draw(backend, "sphere")?;
    }

    self.shaders.use_program(backend, BuiltinShader::Pbr.name())?;
    upload_lights(&mut self.shaders, backend, &LIGHT_POSITIONS, &LIGHT_COLOURS)?;

    for row in 0..GRID {
      for col in 0..GRID {
        let cell = cell(row, col);
        let [x, y, z] = cell.position;

        self.shaders.set_uniform(backend, "metallic", cell.metallic)?;
        self.shaders.set_uniform(backend, "roughness", cell.roughness)?;

        tx.set_position(x, y, z);
        load_matrices(
          &mut self.shaders,
          backend,
          mouse_tx * tx.matrix(),
          self.view.view,
          project,
        )?;
        self.primitives.draw(backend, "sphere")?;
      }
    }

    Ok(LoopFeedback::Continue(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn grid_corners() {
    assert_eq!(
      cell(0, 0),
      Cell {
        metallic: 0.,
        roughness: 0.05,
        position: [-7.5, -1., -7.5]
      }
    );
    assert_eq!(
      cell(6, 6),
      Cell {
        metallic: 1.,
        roughness: 1.,
        position: [7.5, -1., 7.5]
      }
    );
  }

  #[test]
  fn roughness_grows_along_columns() {
    let roughness: Vec<_> = (0..GRID).map(|col| cell(3, col).roughness).collect();

    assert!(roughness.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(cell(3, 3).position, [0., -1., 0.]);
  }
}

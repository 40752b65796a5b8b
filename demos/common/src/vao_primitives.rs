//! Every built-in primitive, and the meshes found in the mesh directory, shaded by a diffuse light.

use crate::{
  shaders::BuiltinShader,
  shared::{begin_frame, load_matrices, setup_render_state, Handled, OrbitView},
  Backend, DemoError, Example, Features, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::{Point3, Vector3};
use ngl::{
  context::GraphicsContext, primitives::Primitives, shader::ShaderLib, transform::Transform,
};

/// A primitive to draw, with its placement and colour.
struct Item {
  name: &'static str,
  position: [f32; 3],
  scale: [f32; 3],
  rotation: [f32; 3],
  colour: [f32; 4],
}

const fn item(
  name: &'static str,
  position: [f32; 3],
  scale: [f32; 3],
  rotation: [f32; 3],
  colour: [f32; 4],
) -> Item {
  Item {
    name,
    position,
    scale,
    rotation,
    colour,
  }
}

const YELLOW: [f32; 4] = [1., 1., 0., 1.];

#[rustfmt::skip]
const SCENE: [Item; 17] = [
  item("ground", [0., -0.5, 0.], [10., 1., 10.], [0., 0., 0.], [1., 1., 1., 1.]),
  item("teapot", [0., 0., 0.], [1., 1., 1.], [0., 0., 0.], [1., 0., 0., 1.]),
  item("cube", [-1., -0.2, 0.], [0.5, 0.5, 0.5], [0., 45., 0.], [0., 1., 0., 1.]),
  item("sphere", [1., -0.2, 0.], [0.5, 0.5, 0.5], [0., 0., 0.], [0., 0., 1., 1.]),
  item("bunny", [2., -0.5, 0.], [0.1, 0.1, 0.1], [0., -90., 0.], [1., 0., 1., 1.]),
  item("buddah", [3., -0.5, 0.], [0.1, 0.1, 0.1], [0., -90., 0.], [0., 1., 1., 1.]),
  item("dragon", [-1., -0.2, -1.], [0.1, 0.1, 0.1], [0., -90., 0.], YELLOW),
  item("troll", [1., 0.1, -1.], [1., 1., 1.], [0., -90., 0.], [1., 0., 0., 1.]),
  item("tetrahedron", [-1., 0.5, -2.], [0.5, 0.5, 0.5], [0., 0., 0.], YELLOW),
  item("octahedron", [1., 0.5, -2.], [0.5, 0.5, 0.5], [0., 0., 0.], YELLOW),
  item("icosahedron", [-2.5, 0.5, -2.], [0.5, 0.5, 0.5], [0., 0., 0.], YELLOW),
  item("dodecahedron", [2.5, 0.5, -2.], [0.5, 0.5, 0.5], [0., 0., 0.], YELLOW),
  item("cone", [0., 0., -3.], [1., 1., 1.], [-90., 0., 0.], YELLOW),
  item("capsule", [-1., 0., -3.], [1., 1., 1.], [0., 0., 0.], YELLOW),
  item("cylinder", [1., 0., -3.], [1., 1., 1.], [0., 0., 0.], YELLOW),
  item("torus", [2., 0., -3.], [1., 1., 1.], [0., 0., 0.], YELLOW),
  item("disk", [-2., 0., -3.], [1., 1., 1.], [0., 0., 0.], YELLOW),
];

fn create_primitives(
  primitives: &mut Primitives<Backend>,
  backend: &mut Backend,
) -> Result<(), DemoError> {
  primitives.create_triangle_plane(backend, "ground", 10., 10., 20, 20, Vector3::unit_y())?;
  primitives.create_sphere(backend, "sphere", 0.3, 32)?;
  primitives.create_cone(backend, "cone", 0.5, 1., 20, 20)?;
  primitives.create_capsule(backend, "capsule", 0.2, 0.4, 20)?;
  primitives.create_cylinder(backend, "cylinder", 0.2, 0.4, 20, 20)?;
  primitives.create_torus(backend, "torus", 0.1, 0.3, 20, 20)?;
  primitives.create_disk(backend, "disk", 0.5, 20)?;

  Ok(())
}

pub struct LocalExample {
  view: OrbitView,
  shaders: ShaderLib<Backend>,
  primitives: Primitives<Backend>,
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

    let mut shaders = ShaderLib::new();
    BuiltinShader::Diffuse.load(&mut shaders, backend)?;
    shaders.use_program(backend, BuiltinShader::Diffuse.name())?;
    shaders.set_uniform(backend, "lightPos", [1f32, 1., 1.])?;
    shaders.set_uniform(backend, "lightDiffuse", [1f32; 4])?;

    let mut primitives = Primitives::new();
    primitives.load_default_primitives(backend, platform.mesh_root())?;
    create_primitives(&mut primitives, backend)?;

    Ok(LocalExample {
      view: OrbitView::new(Point3::new(0., 1., 4.), 0.01, 350.),
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

    self
      .shaders
      .use_program(backend, BuiltinShader::Diffuse.name())?;

    let mouse_tx = self.view.mouse_tx();
    let project = self.view.project();
    let mut tx = Transform::new();

    for item in SCENE.iter() {
      let [x, y, z] = item.position;
      let [sx, sy, sz] = item.scale;
      let [rx, ry, rz] = item.rotation;

      tx.reset();
      tx.set_position(x, y, z);
      tx.set_scale(sx, sy, sz);
      tx.set_rotation(rx, ry, rz);

      self.shaders.set_uniform(backend, "Colour", item.colour)?;
      load_matrices(
        &mut self.shaders,
        backend,
        mouse_tx * tx.matrix(),
        self.view.view,
        project,
      )?;
      self.primitives.draw(backend, item.name)?;
    }

    Ok(LoopFeedback::Continue(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use ngl::primitives::DEFAULT_MESHES;

  #[test]
  fn scene_only_names_known_primitives() {
    let created = ["ground", "sphere", "cone", "capsule", "cylinder", "torus", "disk"];
    let solids = ["tetrahedron", "octahedron", "icosahedron", "dodecahedron", "cube"];

    for item in SCENE.iter() {
      assert!(
        created.contains(&item.name)
          || solids.contains(&item.name)
          || DEFAULT_MESHES.iter().any(|(name, _)| *name == item.name),
        "{}",
        item.name
      );
    }
  }
}

//! Teapots with random materials from a texture pack, seen through a first person camera.
//!
//! Keys:
//!
//! - Arrows move the camera; dragging with the primary button turns it.
//! - `R` picks a new layout.
//! - `1` to `4` switch the lights on and off.

use crate::{
  shaders::BuiltinShader,
  shared::{
    begin_frame, load_matrices, load_mvp, seeded_rng, setup_render_state, upload_lights, Handled,
    OrbitView, LIGHT_COUNT,
  },
  Backend, DemoError, Example, Features, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::{Point3, Vector3};
use ngl::{
  camera::{CameraMovement, FirstPersonCamera},
  context::GraphicsContext,
  math::aspect,
  primitives::Primitives,
  shader::ShaderLib,
  texture_pack::{LoadedTexturePack, TexturePack},
  transform::Transform,
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

const PACK: &str = "texturepack.json";

const FLOOR_MATERIAL: &str = "greasy";

const LIGHT_POSITIONS: [[f32; 3]; LIGHT_COUNT] = [
  [-5., 4., -5.],
  [5., 4., -5.],
  [-5., 4., 5.],
  [5., 4., 5.],
];

const LIGHT_POWER: f32 = 250.;

/// Seconds of travel a single arrow key event is worth.
const KEY_STEP: f32 = 0.1;

const SAMPLERS: [(&str, i32); 5] = [
  ("albedoMap", 0),
  ("normalMap", 1),
  ("metallicMap", 2),
  ("roughnessMap", 3),
  ("aoMap", 4),
];

/// Teapot coordinates along each axis: from -10 up to 10 excluded, every 1.6.
fn grid() -> Vec<f32> {
  (0..)
    .map(|i| -10. + 1.6 * i as f32)
    .take_while(|x| *x < 10.)
    .collect()
}

/// Column-major rotation of texture coordinates.
fn texture_rotation(degrees: f32) -> [[f32; 2]; 2] {
  let (s, c) = degrees.to_radians().sin_cos();
  [[c, s], [-s, c]]
}

fn light_colours(on: &[bool; LIGHT_COUNT]) -> [[f32; 3]; LIGHT_COUNT] {
  let mut colours = [[0.; 3]; LIGHT_COUNT];

  for (colour, on) in colours.iter_mut().zip(on) {
    if *on {
      *colour = [LIGHT_POWER; 3];
    }
  }

  colours
}

pub struct LocalExample {
  view: OrbitView,
  camera: FirstPersonCamera,
  shaders: ShaderLib<Backend>,
  primitives: Primitives<Backend>,
  pack: LoadedTexturePack<Backend>,
  materials: Vec<String>,
  floor: String,
  rng: StdRng,
  seed: u64,
  lights: [bool; LIGHT_COUNT],
  dragging: bool,
  cursor: Option<[f32; 2]>,
}

impl Example for LocalExample {
  fn features() -> Features {
    Features::none().meshes().texture_pack(PACK)
  }

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    setup_render_state(context);
    let backend = context.backend();

    let root = platform
      .texture_root()
      .ok_or(DemoError::MissingAsset("texture directory"))?;
    let description = TexturePack::from_path(root.join(PACK))?;
    let pack = description.load(backend, root);

    let materials: Vec<_> = description
      .materials()
      .iter()
      .map(|m| m.material.clone())
      .collect();
    let floor = match materials.iter().find(|m| *m == FLOOR_MATERIAL) {
      Some(m) => m.clone(),
      None => materials
        .first()
        .cloned()
        .ok_or(DemoError::MissingAsset("texture pack material"))?,
    };

    let mut shaders = ShaderLib::new();
    BuiltinShader::Colour.load(&mut shaders, backend)?;
    BuiltinShader::PbrTexture.load(&mut shaders, backend)?;

    shaders.use_program(backend, BuiltinShader::PbrTexture.name())?;
    for &(sampler, unit) in SAMPLERS.iter() {
      shaders.set_uniform(backend, sampler, unit)?;
    }
    shaders.set_uniform(backend, "exposure", 1f32)?;
    shaders.print_registered_uniforms(backend, BuiltinShader::PbrTexture.name())?;

    let mut primitives = Primitives::new();
    primitives.load_default_primitives(backend, platform.mesh_root())?;
    primitives.create_sphere(backend, "sphere", 0.5, 40)?;
    primitives.create_triangle_plane(backend, "floor", 30., 30., 10, 10, Vector3::unit_y())?;

    let eye = Point3::new(0., 5., 13.);
    let mut camera = FirstPersonCamera::new(eye, Point3::new(0., 0., 0.), Vector3::unit_y(), 45.);
    camera.set_clip_planes(0.05, 350.);

    let mut rng = seeded_rng(platform);
    let seed = rng.gen();

    Ok(LocalExample {
      view: OrbitView::new(eye, 0.05, 350.),
      camera,
      shaders,
      primitives,
      pack,
      materials,
      floor,
      rng,
      seed,
      lights: [true; LIGHT_COUNT],
      dragging: false,
      cursor: None,
    })
  }

  fn render_frame(
    mut self,
    _: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<LoopFeedback<Self>, DemoError> {
    for action in actions {
      match action {
        InputAction::Forward => self.camera.process_key(CameraMovement::Forward, KEY_STEP),
        InputAction::Backward => self.camera.process_key(CameraMovement::Backward, KEY_STEP),
        InputAction::Left => self.camera.process_key(CameraMovement::Left, KEY_STEP),
        InputAction::Right => self.camera.process_key(CameraMovement::Right, KEY_STEP),

        InputAction::Key('r') => {
          self.seed = self.rng.gen();
          log::info!("new layout seed: {}", self.seed);
        }

        InputAction::Key(c @ '1'..='4') => {
          let light = c as usize - '1' as usize;
          self.lights[light] = !self.lights[light];
          log::debug!("light {} on: {}", light + 1, self.lights[light]);
        }

        InputAction::PrimaryPressed => self.dragging = true,
        InputAction::PrimaryReleased => self.dragging = false,

        InputAction::CursorMoved { x, y } => {
          if let (true, Some([px, py])) = (self.dragging, self.cursor) {
            self.camera.process_mouse_movement(x - px, py - y);
          }

          self.cursor = Some([x, y]);
        }

        _ => (),
      }

      if self.view.handle(&action, context) == Handled::Exit {
        return Ok(LoopFeedback::Exit);
      }
    }

    begin_frame(context, self.view.size());
    let backend = context.backend();

    let [w, h] = self.view.size();
    let view = self.camera.view();
    let project = self.camera.projection(aspect(w, h));
    let mut tx = Transform::new();

    // lights
    self
      .shaders
      .use_program(backend, BuiltinShader::Colour.name())?;
    self.shaders.set_uniform(backend, "Colour", [1f32; 4])?;

    for &[x, y, z] in LIGHT_POSITIONS.iter() {
      tx.set_position(x, y, z);
      load_mvp(
        &mut self.shaders,
        backend,
        self.view.mouse_tx() * tx.matrix(),
        view,
        project,
      )?;
      self.primitives.draw(backend, "sphere")?;
    }

    self
      .shaders
      .use_program(backend, BuiltinShader::PbrTexture.name())?;
    upload_lights(
      &mut self.shaders,
      backend,
      &LIGHT_POSITIONS,
      &light_colours(&self.lights),
    )?;
    self
      .shaders
      .set_uniform(backend, "camPos", self.camera.eye())?;

    // the same seed gives the same layout every frame
    let mut layout = StdRng::seed_from_u64(self.seed);
    let grid = grid();

    for &z in grid.iter() {
      for &x in grid.iter() {
        if let Some(material) = self.materials.choose(&mut layout) {
          self.pack.activate(backend, material)?;
        }

        tx.reset();
        tx.set_position(x, 0., z);
        tx.set_rotation(0., layout.gen_range(0f32..360.), 0.);

        self.shaders.set_uniform(
          backend,
          "textureRotation",
          texture_rotation(layout.gen_range(-180f32..180.)),
        )?;
        load_matrices(&mut self.shaders, backend, tx.matrix(), view, project)?;
        self.primitives.draw(backend, "teapot")?;
      }
    }

    self.pack.activate(backend, &self.floor)?;
    tx.reset();
    tx.set_position(0., -0.5, 0.);
    self
      .shaders
      .set_uniform(backend, "textureRotation", texture_rotation(0.))?;
    load_matrices(&mut self.shaders, backend, tx.matrix(), view, project)?;
    self.primitives.draw(backend, "floor")?;

    Ok(LoopFeedback::Continue(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn grid_spans_thirteen_teapots() {
    let grid = grid();

    assert_eq!(grid.len(), 13);
    assert_eq!(grid[0], -10.);
    assert!((grid[12] - 9.2).abs() < 1e-4);
  }

  #[test]
  fn texture_rotations() {
    assert_eq!(texture_rotation(0.), [[1., 0.], [0., 1.]]);

    let [[c, s], [ms, c2]] = texture_rotation(90.);
    assert!(c.abs() < 1e-6 && c2.abs() < 1e-6);
    assert!((s - 1.).abs() < 1e-6);
    assert!((ms + 1.).abs() < 1e-6);
  }

  #[test]
  fn switched_off_lights_are_black() {
    let colours = light_colours(&[true, false, true, false]);

    assert_eq!(colours[0], [250.; 3]);
    assert_eq!(colours[1], [0.; 3]);
    assert_eq!(colours[2], [250.; 3]);
  }
}

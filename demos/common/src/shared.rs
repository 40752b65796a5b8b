use crate::{shaders::BuiltinShader, Backend, InputAction, PlatformServices};
use cgmath::{Matrix4, Point3, Vector3};
use ngl::{
  camera::MouseOrbit,
  context::GraphicsContext,
  math::{aspect, look_at, normal_matrix, perspective},
  mesh::calc_normal,
  render_state::{PolygonMode, DEFAULT_CLEAR_COLOR},
  shader::{ShaderError, ShaderLib},
};
use rand::{rngs::StdRng, SeedableRng};
use std::iter;

/// Size of the window before the first resize event.
pub const DEFAULT_SIZE: [u32; 2] = [1024, 720];

/// Render state every demo starts with.
pub fn setup_render_state(context: &mut impl GraphicsContext<Backend = Backend>) {
  context.set_clear_color(DEFAULT_CLEAR_COLOR);
  context.set_depth_test(true);
  context.set_multisample(true);
}

/// Cover the whole window and clear it.
pub fn begin_frame(context: &mut impl GraphicsContext<Backend = Backend>, [w, h]: [u32; 2]) {
  context.set_viewport(w, h);
  context.clear();
}

/// What [`OrbitView::handle`] did with an action.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Handled {
  /// The demo must exit.
  Exit,
  /// The polygon mode changed.
  Polygon(PolygonMode),
  /// The view consumed the action.
  Done,
  /// The action is left to the demo.
  Ignored,
}

/// A camera looking at the origin, with the scene spun and moved by the mouse.
#[derive(Clone, Debug)]
pub struct OrbitView {
  pub orbit: MouseOrbit,
  pub eye: Point3<f32>,
  pub view: Matrix4<f32>,
  near: f32,
  far: f32,
  size: [u32; 2],
}

impl OrbitView {
  pub fn new(eye: Point3<f32>, near: f32, far: f32) -> Self {
    OrbitView {
      orbit: MouseOrbit::new(),
      eye,
      view: look_at(eye, Point3::new(0., 0., 0.), Vector3::unit_y()),
      near,
      far,
      size: DEFAULT_SIZE,
    }
  }

  /// Window size, as last reported.
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Projection matrix for the current window size.
  pub fn project(&self) -> Matrix4<f32> {
    perspective(45., aspect(self.size[0], self.size[1]), self.near, self.far)
  }

  /// Rotation and translation applied by the mouse.
  pub fn mouse_tx(&self) -> Matrix4<f32> {
    self.orbit.matrix()
  }

  /// Update the view from an action, without touching the graphics state.
  pub fn apply(&mut self, action: &InputAction) -> Handled {
    match *action {
      InputAction::Quit => return Handled::Exit,
      InputAction::Wireframe => return Handled::Polygon(PolygonMode::Line),
      InputAction::Fill => return Handled::Polygon(PolygonMode::Fill),
      InputAction::Reset => self.orbit.reset(),
      InputAction::PrimaryPressed => self.orbit.start_rotation(),
      InputAction::PrimaryReleased => self.orbit.stop_rotation(),
      InputAction::SecondaryPressed => self.orbit.start_translation(),
      InputAction::SecondaryReleased => self.orbit.stop_translation(),

      InputAction::CursorMoved { x, y } => {
        self.orbit.cursor_moved(x, y);
      }

      InputAction::VScroll { amount } => self.orbit.scrolled(amount),
      InputAction::Resized { width, height } => self.size = [width, height],
      _ => return Handled::Ignored,
    }

    Handled::Done
  }

  /// Update the view from an action and switch the polygon mode when asked to.
  pub fn handle(
    &mut self,
    action: &InputAction,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Handled {
    let handled = self.apply(action);

    if let Handled::Polygon(mode) = handled {
      context.set_polygon_mode(mode);
    }

    handled
  }
}

/// Random generator seeded by the platform, or from entropy when no seed is given.
pub fn seeded_rng(platform: &impl PlatformServices) -> StdRng {
  match platform.seed() {
    Some(seed) => {
      log::info!("random seed: {}", seed);
      StdRng::seed_from_u64(seed)
    }

    None => StdRng::from_entropy(),
  }
}

/// Counts fixed periods elapsed between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ticker {
  period: f32,
  last: f32,
}

impl Ticker {
  /// A ticker with a period in seconds.
  pub fn new(period: f32) -> Self {
    Ticker { period, last: 0. }
  }

  /// Number of whole periods elapsed since the last tick.
  pub fn ticks(&mut self, time: f32) -> u32 {
    if time < self.last {
      self.last = time;
      return 0;
    }

    let n = ((time - self.last) / self.period).floor() as u32;
    self.last += n as f32 * self.period;
    n
  }
}

/// The boid: four triangles.
#[rustfmt::skip]
pub const BOID: [[f32; 3]; 12] = [
  [0., 1., 1.], [0., 0., -1.], [-0.5, 0., 1.],
  [0., 1., 1.], [0., 0., -1.], [0.5, 0., 1.],
  [0., 1., 1.], [0., 0., 1.5], [-0.5, 0., 1.],
  [0., 1., 1.], [0., 0., 1.5], [0.5, 0., 1.],
];

/// Triangles of [`BOID`], wound so that [`calc_normal`] points outwards.
pub const BOID_FACES: [[usize; 3]; 4] = [[2, 1, 0], [3, 4, 5], [6, 7, 8], [11, 10, 9]];

/// Flat normal of each face, repeated for its three vertices.
pub fn face_normals(vertices: &[[f32; 3]], faces: &[[usize; 3]]) -> Vec<[f32; 3]> {
  faces
    .iter()
    .flat_map(|&[a, b, c]| {
      let n: [f32; 3] =
        calc_normal(vertices[a].into(), vertices[b].into(), vertices[c].into()).into();
      iter::repeat(n).take(3)
    })
    .collect()
}

/// One colour per vertex of [`ngl::mesh::icosahedron_indexed`].
#[rustfmt::skip]
pub const ICOSAHEDRON_COLOURS: [[f32; 3]; 12] = [
  [1., 0., 0.], [1., 0.55, 0.], [1., 0., 1.], [0., 1., 0.],
  [0., 0., 1.], [0.29, 0.51, 0.], [0.5, 0., 0.5], [1., 1., 1.],
  [0., 1., 1.], [0., 0., 0.], [0.12, 0.56, 1.], [0.86, 0.08, 0.24],
];

/// Load a gold material and a white light into the phong program, and make it current.
pub fn gold_phong(
  shaders: &mut ShaderLib<Backend>,
  backend: &mut Backend,
  light: [f32; 4],
  viewer: Point3<f32>,
) -> Result<(), ShaderError> {
  shaders.use_program(backend, BuiltinShader::Phong.name())?;

  shaders.set_uniform(backend, "material.ambient", [0.274725f32, 0.1995, 0.0745, 0.])?;
  shaders.set_uniform(backend, "material.diffuse", [0.75164f32, 0.60648, 0.22648, 0.])?;
  shaders.set_uniform(backend, "material.specular", [0.628281f32, 0.555802, 0.3666065, 0.])?;
  shaders.set_uniform(backend, "material.shininess", 51.2f32)?;

  shaders.set_uniform(backend, "light.position", light)?;
  shaders.set_uniform(backend, "light.ambient", [0f32, 0., 0., 1.])?;
  shaders.set_uniform(backend, "light.diffuse", [1f32; 4])?;
  shaders.set_uniform(backend, "light.specular", [0.8f32, 0.8, 0.8, 1.])?;

  shaders.set_uniform(backend, "viewerPos", viewer)
}

/// Load `MVP`, `M` and `normalMatrix` into the current program.
pub fn load_matrices(
  shaders: &mut ShaderLib<Backend>,
  backend: &mut Backend,
  model: Matrix4<f32>,
  view: Matrix4<f32>,
  project: Matrix4<f32>,
) -> Result<(), ShaderError> {
  shaders.set_uniform(backend, "MVP", project * view * model)?;
  shaders.set_uniform(backend, "M", model)?;
  shaders.set_uniform(backend, "normalMatrix", normal_matrix(&model))
}

/// Load `MVP` only, for the unlit programs.
pub fn load_mvp(
  shaders: &mut ShaderLib<Backend>,
  backend: &mut Backend,
  model: Matrix4<f32>,
  view: Matrix4<f32>,
  project: Matrix4<f32>,
) -> Result<(), ShaderError> {
  shaders.set_uniform(backend, "MVP", project * view * model)
}

/// Number of lights in the PBR programs.
pub const LIGHT_COUNT: usize = 4;

/// Content of the `Lights` uniform block of the PBR programs (std140: four `vec4` positions, then
/// four `vec4` colours).
pub fn light_block(
  positions: &[[f32; 3]; LIGHT_COUNT],
  colours: &[[f32; 3]; LIGHT_COUNT],
) -> [[f32; 4]; 2 * LIGHT_COUNT] {
  let mut block = [[0.; 4]; 2 * LIGHT_COUNT];

  for (i, ([x, y, z], [r, g, b])) in positions.iter().zip(colours).enumerate() {
    block[i] = [*x, *y, *z, 1.];
    block[LIGHT_COUNT + i] = [*r, *g, *b, 1.];
  }

  block
}

/// Upload the `Lights` block of the current PBR program.
pub fn upload_lights(
  shaders: &mut ShaderLib<Backend>,
  backend: &mut Backend,
  positions: &[[f32; 3]; LIGHT_COUNT],
  colours: &[[f32; 3]; LIGHT_COUNT],
) -> Result<(), ShaderError> {
  let block = light_block(positions, colours);
  shaders.set_uniform_buffer(backend, "Lights", bytemuck::cast_slice(&block))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tickers_count_whole_periods() {
    let mut ticker = Ticker::new(0.25);

    assert_eq!(ticker.ticks(0.1), 0);
    assert_eq!(ticker.ticks(0.3), 1);
    assert_eq!(ticker.ticks(0.8), 2);
    assert_eq!(ticker.ticks(0.8), 0);
    assert_eq!(ticker.ticks(1.), 1);
  }

  #[test]
  fn tickers_survive_time_going_back() {
    let mut ticker = Ticker::new(0.25);

    assert_eq!(ticker.ticks(2.), 8);
    assert_eq!(ticker.ticks(0.), 0);
    assert_eq!(ticker.ticks(0.5), 2);
  }

  #[test]
  fn orbit_view_actions() {
    let mut view = OrbitView::new(Point3::new(0., 1., 4.), 0.1, 100.);

    assert_eq!(view.apply(&InputAction::Quit), Handled::Exit);
    assert_eq!(
      view.apply(&InputAction::Wireframe),
      Handled::Polygon(PolygonMode::Line)
    );
    assert_eq!(view.apply(&InputAction::Key('r')), Handled::Ignored);

    view.apply(&InputAction::CursorMoved { x: 10., y: 10. });
    view.apply(&InputAction::PrimaryPressed);
    view.apply(&InputAction::CursorMoved { x: 30., y: 10. });
    view.apply(&InputAction::PrimaryReleased);
    assert_eq!(view.orbit.spin_y, 10.);

    view.apply(&InputAction::Reset);
    assert_eq!(view.orbit.spin_y, 0.);

    view.apply(&InputAction::Resized {
      width: 800,
      height: 600,
    });
    assert_eq!(view.size(), [800, 600]);
  }

  #[test]
  fn boid_normals_point_outwards() {
    let normals = face_normals(&BOID, &BOID_FACES);

    assert_eq!(normals.len(), BOID.len());
    assert_eq!(normals[0], normals[2]);

    // left and right sides of the back
    assert!(normals[0][0] < 0. && normals[0][1] > 0.);
    assert!(normals[3][0] > 0. && normals[3][1] > 0.);

    for [x, y, z] in normals {
      assert!(((x * x + y * y + z * z).sqrt() - 1.).abs() < 1e-5);
    }
  }

  #[test]
  fn light_block_layout() {
    let block = light_block(
      &[[1., 2., 3.], [0.; 3], [0.; 3], [4., 5., 6.]],
      &[[300.; 3], [0.; 3], [0.; 3], [7.; 3]],
    );

    assert_eq!(block[0], [1., 2., 3., 1.]);
    assert_eq!(block[3], [4., 5., 6., 1.]);
    assert_eq!(block[4], [300., 300., 300., 1.]);
    assert_eq!(block[7], [7., 7., 7., 1.]);
    assert_eq!(bytemuck::cast_slice::<_, u8>(&block).len(), 128);
  }
}

//! Cameras.
//!
//! Two ways of looking at a scene:
//!
//! - [`MouseOrbit`] spins and moves the whole scene with the mouse: left drag rotates, right drag
//!   pans and the wheel zooms. Its matrix is applied on top of the model matrices.
//! - [`FirstPersonCamera`] moves the eye itself, driven by the arrow keys and the mouse.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Vector3};

/// Scene rotation and translation driven by the mouse.
#[derive(Clone, Debug, PartialEq)]
pub struct MouseOrbit {
  /// Rotation around the X axis, in degrees.
  pub spin_x: f32,
  /// Rotation around the Y axis, in degrees.
  pub spin_y: f32,
  /// Translation of the scene.
  pub position: Vector3<f32>,
  /// Degrees of rotation per pixel of drag.
  pub rotation_factor: f32,
  /// Translation per pixel of drag.
  pub increment: f32,
  /// Translation per wheel step.
  pub zoom: f32,
  rotating: bool,
  translating: bool,
  last_rotation: [f32; 2],
  last_translation: [f32; 2],
  cursor: [f32; 2],
}

impl Default for MouseOrbit {
  fn default() -> Self {
    MouseOrbit {
      spin_x: 0.,
      spin_y: 0.,
      position: Vector3::new(0., 0., 0.),
      rotation_factor: 0.5,
      increment: 0.01,
      zoom: 0.1,
      rotating: false,
      translating: false,
      last_rotation: [0., 0.],
      last_translation: [0., 0.],
      cursor: [0., 0.],
    }
  }
}

impl MouseOrbit {
  /// Orbit with the default factors.
  pub fn new() -> Self {
    Self::default()
  }

  /// Start rotating from the current cursor position.
  pub fn start_rotation(&mut self) {
    self.rotating = true;
    self.last_rotation = self.cursor;
  }

  /// Stop rotating.
  pub fn stop_rotation(&mut self) {
    self.rotating = false;
  }

  /// Start translating from the current cursor position.
  pub fn start_translation(&mut self) {
    self.translating = true;
    self.last_translation = self.cursor;
  }

  /// Stop translating.
  pub fn stop_translation(&mut self) {
    self.translating = false;
  }

  /// Whether a rotation drag is in progress.
  pub fn is_rotating(&self) -> bool {
    self.rotating
  }

  /// Feed a new cursor position. Returns whether the orbit changed.
  pub fn cursor_moved(&mut self, x: f32, y: f32) -> bool {
    self.cursor = [x, y];

    if self.rotating {
      let [ox, oy] = self.last_rotation;
      self.spin_x += self.rotation_factor * (y - oy);
      self.spin_y += self.rotation_factor * (x - ox);
      self.last_rotation = self.cursor;
      true
    } else if self.translating {
      let [ox, oy] = self.last_translation;
      self.position.x += self.increment * (x - ox);
      self.position.y -= self.increment * (y - oy);
      self.last_translation = self.cursor;
      true
    } else {
      false
    }
  }

  /// Zoom by a wheel amount.
  pub fn scrolled(&mut self, amount: f32) {
    self.position.z += self.zoom * amount;
  }

  /// Bring spins and translation back to zero.
  pub fn reset(&mut self) {
    self.spin_x = 0.;
    self.spin_y = 0.;
    self.position = Vector3::new(0., 0., 0.);
  }

  /// Rotation `Ry · Rx` with the translation set to the orbit position.
  pub fn matrix(&self) -> Matrix4<f32> {
    let mut m = Matrix4::from_angle_y(Deg(self.spin_y)) * Matrix4::from_angle_x(Deg(self.spin_x));
    m.w = self.position.extend(1.);
    m
  }
}

/// Direction of a first person move.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CameraMovement {
  /// Along the view direction.
  Forward,
  /// Against the view direction.
  Backward,
  /// To the left.
  Left,
  /// To the right.
  Right,
}

/// A first person camera.
///
/// The view direction is kept as yaw and pitch angles, in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct FirstPersonCamera {
  eye: Point3<f32>,
  front: Vector3<f32>,
  up: Vector3<f32>,
  right: Vector3<f32>,
  world_up: Vector3<f32>,
  yaw: f32,
  pitch: f32,
  zoom: f32,
  near: f32,
  far: f32,
  /// Units per second.
  pub speed: f32,
  /// Degrees per pixel of mouse movement.
  pub sensitivity: f32,
}

impl FirstPersonCamera {
  /// Create a camera at `eye` looking at `look`, with a vertical field of view in degrees.
  pub fn new(eye: Point3<f32>, look: Point3<f32>, up: Vector3<f32>, fov: f32) -> Self {
    let front = (look - eye).normalize();
    let yaw = front.z.atan2(front.x).to_degrees();
    let pitch = front.y.asin().to_degrees();

    let mut camera = FirstPersonCamera {
      eye,
      front,
      up,
      right: front.cross(up).normalize(),
      world_up: up,
      yaw,
      pitch,
      zoom: fov,
      near: 0.05,
      far: 350.,
      speed: 2.5,
      sensitivity: 0.1,
    };

    camera.update_vectors();
    camera
  }

  /// Set the near and far planes.
  pub fn set_clip_planes(&mut self, near: f32, far: f32) {
    self.near = near;
    self.far = far;
  }

  /// Position of the eye.
  pub fn eye(&self) -> Point3<f32> {
    self.eye
  }

  /// View direction.
  pub fn front(&self) -> Vector3<f32> {
    self.front
  }

  /// Field of view, in degrees.
  pub fn zoom(&self) -> f32 {
    self.zoom
  }

  /// Move along `direction` for `dt` seconds.
  pub fn process_key(&mut self, direction: CameraMovement, dt: f32) {
    match direction {
      CameraMovement::Forward => self.move_by(1., 0., dt),
      CameraMovement::Backward => self.move_by(-1., 0., dt),
      CameraMovement::Left => self.move_by(0., -1., dt),
      CameraMovement::Right => self.move_by(0., 1., dt),
    }
  }

  /// Move `forward` steps along the view direction and `sideways` steps to the right, scaled by
  /// the speed and `dt`.
  pub fn move_by(&mut self, forward: f32, sideways: f32, dt: f32) {
    let velocity = self.speed * dt;
    self.eye += self.front * velocity * forward;
    self.eye += self.right * velocity * sideways;
  }

  /// Turn the camera by a mouse movement, in pixels. The pitch is clamped to ±89°.
  pub fn process_mouse_movement(&mut self, dx: f32, dy: f32) {
    self.yaw += dx * self.sensitivity;
    self.pitch = (self.pitch + dy * self.sensitivity).max(-89.).min(89.);
    self.update_vectors();
  }

  /// Change the field of view by a wheel amount. It stays within `[1, 45]` degrees.
  pub fn process_mouse_scroll(&mut self, dy: f32) {
    self.zoom = (self.zoom - dy).max(1.).min(45.);
  }

  /// View matrix.
  pub fn view(&self) -> Matrix4<f32> {
    Matrix4::look_at_rh(self.eye, self.eye + self.front, self.up)
  }

  /// Projection matrix for an aspect ratio.
  pub fn projection(&self, aspect: f32) -> Matrix4<f32> {
    crate::math::perspective(self.zoom, aspect, self.near, self.far)
  }

  fn update_vectors(&mut self) {
    let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());

    self.front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
      .normalize();
    self.right = self.front.cross(self.world_up).normalize();
    self.up = self.right.cross(self.front).normalize();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{SquareMatrix, Vector4};

  #[test]
  fn dragging_rotates() {
    let mut orbit = MouseOrbit::new();
    orbit.cursor_moved(100., 100.);
    orbit.start_rotation();

    assert!(orbit.cursor_moved(110., 90.));
    assert_eq!(orbit.spin_x, -5.);
    assert_eq!(orbit.spin_y, 5.);

    orbit.stop_rotation();
    assert!(!orbit.cursor_moved(0., 0.));
    assert_eq!(orbit.spin_y, 5.);
  }

  #[test]
  fn dragging_translates() {
    let mut orbit = MouseOrbit::new();
    orbit.cursor_moved(0., 0.);
    orbit.start_translation();
    orbit.cursor_moved(100., 50.);

    assert!((orbit.position.x - 1.).abs() < 1e-6);
    assert!((orbit.position.y + 0.5).abs() < 1e-6);
  }

  #[test]
  fn scrolling_and_reset() {
    let mut orbit = MouseOrbit::new();
    orbit.scrolled(1.);
    orbit.scrolled(1.);
    assert!((orbit.position.z - 0.2).abs() < 1e-6);

    orbit.spin_x = 30.;
    orbit.reset();
    assert_eq!(orbit, MouseOrbit::new());
    assert_eq!(orbit.matrix(), Matrix4::identity());
  }

  #[test]
  fn orbit_matrix_translation() {
    let mut orbit = MouseOrbit::new();
    orbit.spin_y = 90.;
    orbit.position = Vector3::new(0., 0., -1.);

    let p = orbit.matrix() * Vector4::new(1., 0., 0., 1.);
    assert!(p.x.abs() < 1e-6);
    assert!((p.z + 2.).abs() < 1e-6);
  }

  #[test]
  fn first_person_moves() {
    let mut camera = FirstPersonCamera::new(
      Point3::new(0., 0., 5.),
      Point3::new(0., 0., 0.),
      Vector3::unit_y(),
      45.,
    );

    camera.process_key(CameraMovement::Forward, 1.);
    assert!((camera.eye().z - 2.5).abs() < 1e-5);

    camera.process_key(CameraMovement::Right, 1.);
    assert!((camera.eye().x - 2.5).abs() < 1e-5);
  }

  #[test]
  fn pitch_and_zoom_are_clamped() {
    let mut camera = FirstPersonCamera::new(
      Point3::new(0., 0., 5.),
      Point3::new(0., 0., 0.),
      Vector3::unit_y(),
      45.,
    );

    camera.process_mouse_movement(0., 10_000.);
    assert!(camera.front().y < 1.);
    assert!((camera.front().y - 89f32.to_radians().sin()).abs() < 1e-5);

    camera.process_mouse_scroll(-10.);
    assert_eq!(camera.zoom(), 45.);
    camera.process_mouse_scroll(100.);
    assert_eq!(camera.zoom(), 1.);
  }
}

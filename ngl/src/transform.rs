//! Affine transforms.

use cgmath::{Deg, Matrix4, Vector3};
use std::cell::Cell;

/// Position, rotation and scale of an object.
///
/// Rotations are Euler angles in degrees. The matrix is `T · Rz · Ry · Rx · S`: scale first, then
/// rotate about X, Y and Z in that order, then translate. It is computed lazily and cached until the
/// next change.
#[derive(Clone, Debug)]
pub struct Transform {
  position: Vector3<f32>,
  rotation: Vector3<f32>,
  scale: Vector3<f32>,
  matrix: Cell<Option<Matrix4<f32>>>,
}

impl Default for Transform {
  fn default() -> Self {
    Transform {
      position: Vector3::new(0., 0., 0.),
      rotation: Vector3::new(0., 0., 0.),
      scale: Vector3::new(1., 1., 1.),
      matrix: Cell::new(None),
    }
  }
}

impl Transform {
  /// Identity transform.
  pub fn new() -> Self {
    Self::default()
  }

  /// Position.
  pub fn position(&self) -> Vector3<f32> {
    self.position
  }

  /// Euler rotation, in degrees.
  pub fn rotation(&self) -> Vector3<f32> {
    self.rotation
  }

  /// Scale.
  pub fn scale(&self) -> Vector3<f32> {
    self.scale
  }

  /// Set the position.
  pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
    self.position = Vector3::new(x, y, z);
    self.matrix.set(None);
  }

  /// Set the Euler rotation, in degrees.
  pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
    self.rotation = Vector3::new(x, y, z);
    self.matrix.set(None);
  }

  /// Set the scale.
  pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
    self.scale = Vector3::new(x, y, z);
    self.matrix.set(None);
  }

  /// Reset to the identity.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  /// Transform matrix.
  pub fn matrix(&self) -> Matrix4<f32> {
    if let Some(m) = self.matrix.get() {
      return m;
    }

    let m = Matrix4::from_translation(self.position)
      * Matrix4::from_angle_z(Deg(self.rotation.z))
      * Matrix4::from_angle_y(Deg(self.rotation.y))
      * Matrix4::from_angle_x(Deg(self.rotation.x))
      * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);

    self.matrix.set(Some(m));
    m
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{SquareMatrix, Vector4};

  fn close(a: Vector4<f32>, b: Vector4<f32>) -> bool {
    (a - b).x.abs() < 1e-5 && (a - b).y.abs() < 1e-5 && (a - b).z.abs() < 1e-5
  }

  #[test]
  fn identity() {
    assert_eq!(Transform::new().matrix(), Matrix4::identity());
  }

  #[test]
  fn scale_then_rotate_then_translate() {
    let mut tx = Transform::new();
    tx.set_scale(2., 2., 2.);
    tx.set_rotation(0., 90., 0.);
    tx.set_position(0., 1., 0.);

    // (1, 0, 0) scaled to (2, 0, 0), rotated to (0, 0, -2), lifted by 1
    let p = tx.matrix() * Vector4::new(1., 0., 0., 1.);
    assert!(close(p, Vector4::new(0., 1., -2., 1.)));
  }

  #[test]
  fn changes_invalidate_the_cached_matrix() {
    let mut tx = Transform::new();
    let _ = tx.matrix();

    tx.set_position(3., 0., 0.);
    assert_eq!(tx.matrix().w, Vector4::new(3., 0., 0., 1.));

    tx.reset();
    assert_eq!(tx.matrix(), Matrix4::identity());
  }
}

//! Matrix helpers.
//!
//! Thin wrappers around [cgmath] producing the matrices every demo feeds its shaders with.
//!
//! [cgmath]: https://crates.io/crates/cgmath

use cgmath::{Deg, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Vector3};

/// View matrix looking from `eye` at `center` (right-handed).
pub fn look_at(eye: Point3<f32>, center: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
  Matrix4::look_at_rh(eye, center, up)
}

/// Perspective projection; the field of view is vertical and in degrees.
pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
  cgmath::perspective(Deg(fovy), aspect, near, far)
}

/// Aspect ratio of a viewport. A zero height is treated as `1`.
pub fn aspect(width: u32, height: u32) -> f32 {
  width as f32 / height.max(1) as f32
}

/// Upper 3×3 part of a matrix.
pub fn mat3(m: &Matrix4<f32>) -> Matrix3<f32> {
  Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

/// Normal matrix of a model-view matrix: the inverse-transpose of its upper 3×3 part.
///
/// Singular matrices (e.g. a zero scale) yield the identity.
pub fn normal_matrix(mv: &Matrix4<f32>) -> Matrix3<f32> {
  mat3(mv)
    .invert()
    .map(|m| m.transpose())
    .unwrap_or_else(Matrix3::identity)
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{vec3, EuclideanSpace, Rad};

  #[test]
  fn aspect_ratios() {
    assert_eq!(aspect(1024, 512), 2.);
    assert_eq!(aspect(720, 0), 720.);
  }

  #[test]
  fn normal_matrix_of_a_scale() {
    let m = Matrix4::from_nonuniform_scale(2., 4., 1.);
    let n = normal_matrix(&m);

    assert_eq!(n, Matrix3::from_diagonal(vec3(0.5, 0.25, 1.)));
  }

  #[test]
  fn normal_matrix_of_a_rotation_is_the_rotation() {
    let r = Matrix4::from_angle_y(Rad(0.7f32));
    let n = normal_matrix(&r);
    let expected = mat3(&r);

    for c in 0..3 {
      for l in 0..3 {
        assert!((n[c][l] - expected[c][l]).abs() < 1e-6);
      }
    }
  }

  #[test]
  fn singular_matrices() {
    let m = Matrix4::from_scale(0.);
    assert_eq!(normal_matrix(&m), Matrix3::identity());
  }

  #[test]
  fn look_at_origin() {
    let view = look_at(Point3::new(0., 1., 4.), Point3::origin(), Vector3::unit_y());
    let p = view * Point3::origin().to_homogeneous();

    // the origin ends up straight ahead, 17.sqrt() away
    assert!(p.x.abs() < 1e-6);
    assert!((p.z + 17f32.sqrt()).abs() < 1e-5);
  }
}

//! Wavefront OBJ meshes.
//!
//! Parsing is done by the [wavefront_obj] crate. Triangles of every object of the file are
//! flattened into the interleaved [`Vertex`] layout of procedural meshes; missing normals and
//! texture coordinates are zeroed. Points and lines are ignored.
//!
//! [wavefront_obj]: https://crates.io/crates/wavefront_obj

use crate::backend::vertex_array::VertexArray;
use crate::mesh::{Mesh, Vertex};
use crate::vao::{Mode, SimpleVao, VaoError};
use cgmath::{InnerSpace, Point3, Vector3};
use std::{error, fmt, fs, io, path::Path};
use wavefront_obj::obj;

/// Error that can happen when loading an OBJ file.
#[non_exhaustive]
#[derive(Debug)]
pub enum ObjError {
  /// The file couldn’t be read.
  FileNotFound(io::Error),
  /// The file is not a valid OBJ file.
  ParseError {
    /// Line of the error.
    line: usize,
    /// What went wrong.
    message: String,
  },
  /// An index refers to a vertex, normal or texture coordinate that doesn’t exist.
  IndexOutOfRange(usize),
  /// The file contains no triangle.
  Empty,
}

impl fmt::Display for ObjError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ObjError::FileNotFound(ref e) => write!(f, "cannot read OBJ file: {}", e),
      ObjError::ParseError { line, ref message } => {
        write!(f, "OBJ parse error at line {}: {}", line, message)
      }
      ObjError::IndexOutOfRange(index) => write!(f, "OBJ index out of range: {}", index),
      ObjError::Empty => f.write_str("OBJ file has no triangle"),
    }
  }
}

impl error::Error for ObjError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ObjError::FileNotFound(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ObjError {
  fn from(e: io::Error) -> Self {
    ObjError::FileNotFound(e)
  }
}

/// A triangulated OBJ mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Obj {
  vertices: Vec<Vertex>,
}

impl Obj {
  /// Load an OBJ file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ObjError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path)?;
    let obj = Self::parse(&src)?;

    log::info!(
      "loaded {} ({} triangles)",
      path.display(),
      obj.vertices.len() / 3
    );

    Ok(obj)
  }

  /// Parse OBJ source.
  pub fn parse(src: &str) -> Result<Self, ObjError> {
    let set = obj::parse(src.to_owned()).map_err(|e| ObjError::ParseError {
      line: e.line_number,
      message: e.message,
    })?;

    let mut vertices = Vec::new();

    for object in &set.objects {
      for geometry in &object.geometry {
        for shape in &geometry.shapes {
          if let obj::Primitive::Triangle(a, b, c) = &shape.primitive {
            for vtn in [a, b, c].iter() {
              vertices.push(flatten(object, **vtn)?);
            }
          }
        }
      }
    }

    if vertices.is_empty() {
      return Err(ObjError::Empty);
    }

    Ok(Obj { vertices })
  }

  /// Flattened vertices, three per triangle.
  pub fn vertices(&self) -> &[Vertex] {
    &self.vertices
  }

  /// The mesh, drawn as triangles.
  pub fn to_mesh(&self) -> Mesh {
    Mesh::new(self.vertices.clone(), Mode::Triangle)
  }

  /// Sphere enclosing every vertex: the centre of the bounding box, and the distance to the
  /// farthest vertex.
  pub fn bounding_sphere(&self) -> (Point3<f32>, f32) {
    let mut min = Vector3::new(f32::MAX, f32::MAX, f32::MAX);
    let mut max = Vector3::new(f32::MIN, f32::MIN, f32::MIN);

    for v in &self.vertices {
      let [x, y, z] = v.position;
      min = Vector3::new(min.x.min(x), min.y.min(y), min.z.min(z));
      max = Vector3::new(max.x.max(x), max.y.max(y), max.z.max(z));
    }

    let center = (min + max) / 2.;
    let radius = self
      .vertices
      .iter()
      .map(|v| (Vector3::from(v.position) - center).magnitude())
      .fold(0., f32::max);

    (Point3::new(center.x, center.y, center.z), radius)
  }

  /// Upload the mesh into a new [`SimpleVao`].
  pub fn create_vao<B>(&self, backend: &mut B) -> Result<SimpleVao<B>, VaoError>
  where
    B: ?Sized + VertexArray,
  {
    self.to_mesh().create_vao(backend)
  }
}

fn flatten(object: &obj::Object, (v, t, n): obj::VTNIndex) -> Result<Vertex, ObjError> {
  let p = object.vertices.get(v).ok_or(ObjError::IndexOutOfRange(v))?;

  let normal = match n {
    Some(n) => {
      let n = object.normals.get(n).ok_or(ObjError::IndexOutOfRange(n))?;
      [n.x as f32, n.y as f32, n.z as f32]
    }

    None => [0.; 3],
  };

  let uv = match t {
    Some(t) => {
      let t = object.tex_vertices.get(t).ok_or(ObjError::IndexOutOfRange(t))?;
      [t.u as f32, t.v as f32]
    }

    None => [0.; 2],
  };

  Ok(Vertex::new(
    [p.x as f32, p.y as f32, p.z as f32],
    normal,
    uv,
  ))
}

#[cfg(test)]
mod tests {
  use super::*;

  const QUAD: &str = "
o quad
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

  // triangles may start from any of their corners; winding is what must be kept
  fn is_rotation_of(triangle: &[Vertex], corners: [[f32; 3]; 3]) -> bool {
    (0..3).any(|shift| (0..3).all(|i| triangle[(i + shift) % 3].position == corners[i]))
  }

  #[test]
  fn triangles_are_flattened() {
    let obj = Obj::parse(QUAD).unwrap();
    let vertices = obj.vertices();

    assert_eq!(vertices.len(), 6);
    assert!(is_rotation_of(
      &vertices[..3],
      [[-1., -1., 0.], [1., -1., 0.], [1., 1., 0.]]
    ));
    assert!(is_rotation_of(
      &vertices[3..],
      [[-1., -1., 0.], [1., 1., 0.], [-1., 1., 0.]]
    ));

    let corner = vertices[..3]
      .iter()
      .find(|v| v.position == [1., -1., 0.])
      .unwrap();
    assert_eq!(corner.uv, [1., 0.]);
    assert!(vertices.iter().all(|v| v.normal == [0., 0., 1.]));
  }

  #[test]
  fn missing_attributes_are_zeroed() {
    let obj = Obj::parse("o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
    let vertices = obj.vertices();

    assert!(is_rotation_of(
      vertices,
      [[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]]
    ));
    assert!(vertices.iter().all(|v| v.normal == [0.; 3] && v.uv == [0.; 2]));
  }

  #[test]
  fn bounding_spheres() {
    let (center, radius) = Obj::parse(QUAD).unwrap().bounding_sphere();

    assert_eq!(center, Point3::new(0., 0., 0.));
    assert!((radius - 2f32.sqrt()).abs() < 1e-6);
  }

  #[test]
  fn errors() {
    assert!(matches!(Obj::parse("o empty\nv 0 0 0\n"), Err(ObjError::Empty)));
    assert!(matches!(
      Obj::load("does/not/exist.obj"),
      Err(ObjError::FileNotFound(_))
    ));
  }
}

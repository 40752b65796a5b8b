//! Named mesh registry.
//!
//! [`Primitives`] keeps meshes uploaded into VAOs under a name, so that a scene can be drawn with
//! `primitives.draw(backend, "teapot")`.

use crate::backend::vertex_array::VertexArray;
use crate::mesh::{self, Mesh};
use crate::obj::{Obj, ObjError};
use crate::vao::{BindVao, SimpleVao, VaoError};
use cgmath::Vector3;
use std::{collections::HashMap, error, fmt, path::Path};

/// Meshes loaded from `<name>.obj` by [`Primitives::load_default_primitives`], with the radius of
/// the sphere standing in for each of them when its file is missing.
pub const DEFAULT_MESHES: [(&str, f32); 5] = [
  ("teapot", 0.5),
  ("bunny", 5.),
  ("buddah", 5.),
  ("dragon", 5.),
  ("troll", 0.5),
];

/// Error that can happen with primitives.
#[non_exhaustive]
#[derive(Debug)]
pub enum PrimitiveError {
  /// No primitive is registered with that name.
  Unknown(String),
  /// The mesh couldn’t be uploaded or drawn.
  VaoError(VaoError),
  /// The mesh file couldn’t be loaded.
  ObjError(ObjError),
}

impl fmt::Display for PrimitiveError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      PrimitiveError::Unknown(ref name) => write!(f, "unknown primitive: {}", name),
      PrimitiveError::VaoError(ref e) => write!(f, "primitive VAO error: {}", e),
      PrimitiveError::ObjError(ref e) => write!(f, "primitive mesh error: {}", e),
    }
  }
}

impl error::Error for PrimitiveError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      PrimitiveError::VaoError(e) => Some(e),
      PrimitiveError::ObjError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<VaoError> for PrimitiveError {
  fn from(e: VaoError) -> Self {
    PrimitiveError::VaoError(e)
  }
}

impl From<ObjError> for PrimitiveError {
  fn from(e: ObjError) -> Self {
    PrimitiveError::ObjError(e)
  }
}

/// Registry of named meshes.
pub struct Primitives<B>
where
  B: ?Sized + VertexArray,
{
  vaos: HashMap<String, SimpleVao<B>>,
}

impl<B> Default for Primitives<B>
where
  B: ?Sized + VertexArray,
{
  fn default() -> Self {
    Primitives {
      vaos: HashMap::new(),
    }
  }
}

impl<B> Primitives<B>
where
  B: ?Sized + VertexArray,
{
  /// Empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Upload a mesh under a name, replacing any primitive with the same name.
  pub fn add(
    &mut self,
    backend: &mut B,
    name: impl Into<String>,
    mesh: &Mesh,
  ) -> Result<(), PrimitiveError> {
    let name = name.into();
    let vao = mesh.create_vao(backend)?;

    log::debug!("created primitive {} ({} vertices)", name, mesh.len());
    self.vaos.insert(name, vao);

    Ok(())
  }

  /// Load an OBJ file under a name.
  pub fn load_obj(
    &mut self,
    backend: &mut B,
    name: impl Into<String>,
    path: impl AsRef<Path>,
  ) -> Result<(), PrimitiveError> {
    let obj = Obj::load(path)?;
    self.add(backend, name, &obj.to_mesh())
  }

  /// Register the platonic solids and a unit cube, then the meshes of [`DEFAULT_MESHES`] found
  /// under `mesh_dir`.
  ///
  /// A mesh that cannot be loaded is replaced by a sphere, with a warning.
  pub fn load_default_primitives(
    &mut self,
    backend: &mut B,
    mesh_dir: Option<&Path>,
  ) -> Result<(), PrimitiveError> {
    self.add(backend, "tetrahedron", &mesh::tetrahedron())?;
    self.add(backend, "octahedron", &mesh::octahedron())?;
    self.add(backend, "icosahedron", &mesh::icosahedron())?;
    self.add(backend, "dodecahedron", &mesh::dodecahedron())?;
    self.add(backend, "cube", &mesh::cube(1.))?;

    for &(name, radius) in &DEFAULT_MESHES {
      let loaded = match mesh_dir {
        Some(dir) => {
          let path = dir.join(name).with_extension("obj");

          match self.load_obj(backend, name, &path) {
            Ok(()) => true,
            Err(e) => {
              log::warn!("cannot load {}: {}", path.display(), e);
              false
            }
          }
        }

        None => false,
      };

      if !loaded {
        log::warn!("using a sphere in place of {}", name);
        self.add(backend, name, &mesh::sphere(radius, 40))?;
      }
    }

    log::info!("loaded {} default primitives", self.vaos.len());

    Ok(())
  }

  /// Register a sphere.
  pub fn create_sphere(
    &mut self,
    backend: &mut B,
    name: &str,
    radius: f32,
    precision: u32,
  ) -> Result<(), PrimitiveError> {
    self.add(backend, name, &mesh::sphere(radius, precision))
  }

  /// Register a grid of triangles in the XZ plane.
  #[allow(clippy::too_many_arguments)]
  pub fn create_triangle_plane(
    &mut self,
    backend: &mut B,
    name: &str,
    width: f32,
    depth: f32,
    w_steps: u32,
    d_steps: u32,
    normal: Vector3<f32>,
  ) -> Result<(), PrimitiveError> {
    let plane = mesh::triangle_plane(width, depth, w_steps, d_steps, normal);
    self.add(backend, name, &plane)
  }

  /// Register a cone.
  pub fn create_cone(
    &mut self,
    backend: &mut B,
    name: &str,
    base: f32,
    height: f32,
    slices: u32,
    stacks: u32,
  ) -> Result<(), PrimitiveError> {
    self.add(backend, name, &mesh::cone(base, height, slices, stacks))
  }

  /// Register a capsule.
  pub fn create_capsule(
    &mut self,
    backend: &mut B,
    name: &str,
    radius: f32,
    height: f32,
    precision: u32,
  ) -> Result<(), PrimitiveError> {
    self.add(backend, name, &mesh::capsule(radius, height, precision))
  }

  /// Register a cylinder.
  pub fn create_cylinder(
    &mut self,
    backend: &mut B,
    name: &str,
    radius: f32,
    height: f32,
    slices: u32,
    stacks: u32,
  ) -> Result<(), PrimitiveError> {
    self.add(backend, name, &mesh::cylinder(radius, height, slices, stacks))
  }

  /// Register a torus.
  pub fn create_torus(
    &mut self,
    backend: &mut B,
    name: &str,
    minor: f32,
    major: f32,
    sides: u32,
    rings: u32,
  ) -> Result<(), PrimitiveError> {
    self.add(backend, name, &mesh::torus(minor, major, sides, rings))
  }

  /// Register a disk.
  pub fn create_disk(
    &mut self,
    backend: &mut B,
    name: &str,
    radius: f32,
    slices: u32,
  ) -> Result<(), PrimitiveError> {
    self.add(backend, name, &mesh::disk(radius, slices))
  }

  /// Whether a primitive is registered with that name.
  pub fn contains(&self, name: &str) -> bool {
    self.vaos.contains_key(name)
  }

  /// Names of the registered primitives, sorted.
  pub fn names(&self) -> Vec<&str> {
    let mut names: Vec<_> = self.vaos.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  /// Draw a primitive.
  pub fn draw(&mut self, backend: &mut B, name: &str) -> Result<(), PrimitiveError> {
    let vao = match self.vaos.get_mut(name) {
      Some(vao) => vao,
      None => {
        log::error!("primitive {} not found", name);
        return Err(PrimitiveError::Unknown(name.to_owned()));
      }
    };

    vao.bind(backend).draw()?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::{Call, MockBackend};
  use crate::vao::Mode;

  #[test]
  fn default_primitives_fall_back_to_spheres() {
    let mut backend = MockBackend::new();
    let mut primitives = Primitives::new();

    primitives
      .load_default_primitives(&mut backend, Some(Path::new("does/not/exist")))
      .unwrap();

    assert_eq!(
      primitives.names(),
      vec![
        "buddah",
        "bunny",
        "cube",
        "dodecahedron",
        "dragon",
        "icosahedron",
        "octahedron",
        "teapot",
        "tetrahedron",
        "troll"
      ]
    );

    backend.calls.clear();
    primitives.draw(&mut backend, "teapot").unwrap();

    assert!(backend.calls.iter().any(|c| matches!(
      c,
      Call::DrawArrays {
        mode: Mode::TriangleStrip,
        ..
      }
    )));
  }

  #[test]
  fn drawing_generated_meshes() {
    let mut backend = MockBackend::new();
    let mut primitives = Primitives::new();

    primitives.create_disk(&mut backend, "disk", 0.5, 20).unwrap();
    primitives.draw(&mut backend, "disk").unwrap();

    assert!(backend.calls.contains(&Call::DrawArrays {
      mode: Mode::Triangle,
      first: 0,
      count: 60
    }));
  }

  #[test]
  fn unknown_primitives() {
    let mut backend = MockBackend::new();
    let mut primitives = Primitives::<MockBackend>::new();

    assert!(matches!(
      primitives.draw(&mut backend, "teapot"),
      Err(PrimitiveError::Unknown(_))
    ));
  }
}

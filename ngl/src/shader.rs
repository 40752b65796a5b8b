//! Shader programs.
//!
//! Shader programs are loaded into a [`ShaderLib`] under a name. One program is _current_ at a
//! time: it’s the one used for drawing and the one [`ShaderLib::set_uniform`] talks to.
//!
//! Uniforms are set by name with anything convertible to a [`UniformValue`]. Locations are looked
//! up once per program and cached. Setting a uniform the program doesn’t use (because it’s not
//! declared, or because the GLSL compiler optimized it away) is not an error: a warning is
//! logged the first time and the value is ignored.

use crate::backend::shader::Shader;
use cgmath::{Matrix2, Matrix3, Matrix4, Point3, Vector2, Vector3, Vector4};
use std::{collections::HashMap, error, fmt};

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Value of a uniform.
///
/// Matrices are stored column-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
  /// `bool`.
  Bool(bool),
  /// `int`.
  Int(i32),
  /// `float`.
  Float(f32),
  /// `vec2`.
  Vec2([f32; 2]),
  /// `vec3`.
  Vec3([f32; 3]),
  /// `vec4`.
  Vec4([f32; 4]),
  /// `mat2`.
  Mat2([[f32; 2]; 2]),
  /// `mat3`.
  Mat3([[f32; 3]; 3]),
  /// `mat4`.
  Mat4([[f32; 4]; 4]),
}

macro_rules! impl_uniform_value_from {
  ($($t:ty => $v:ident),* $(,)?) => {
    $(
      impl From<$t> for UniformValue {
        fn from(a: $t) -> Self {
          UniformValue::$v(a.into())
        }
      }
    )*
  }
}

impl_uniform_value_from!(
  bool => Bool,
  i32 => Int,
  f32 => Float,
  [f32; 2] => Vec2,
  [f32; 3] => Vec3,
  [f32; 4] => Vec4,
  [[f32; 2]; 2] => Mat2,
  [[f32; 3]; 3] => Mat3,
  [[f32; 4]; 4] => Mat4,
  Vector2<f32> => Vec2,
  Vector3<f32> => Vec3,
  Vector4<f32> => Vec4,
  Matrix2<f32> => Mat2,
  Matrix3<f32> => Mat3,
  Matrix4<f32> => Mat4,
);

impl From<Point3<f32>> for UniformValue {
  fn from(p: Point3<f32>) -> Self {
    UniformValue::Vec3([p.x, p.y, p.z])
  }
}

impl From<(f32, f32, f32)> for UniformValue {
  fn from((x, y, z): (f32, f32, f32)) -> Self {
    UniformValue::Vec3([x, y, z])
  }
}

impl From<(f32, f32, f32, f32)> for UniformValue {
  fn from((x, y, z, w): (f32, f32, f32, f32)) -> Self {
    UniformValue::Vec4([x, y, z, w])
  }
}

/// An active uniform, as reported by the driver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveUniform {
  /// Name.
  pub name: String,
  /// GLSL type name.
  pub type_name: String,
  /// Number of array elements (`1` for non-arrays).
  pub size: i32,
}

/// Shader errors.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ShaderError {
  /// The backend failed to create a resource.
  CannotCreate(String),
  /// A stage failed to compile; the compilation log is attached.
  CompilationFailed(StageType, String),
  /// A program failed to link; the link log is attached.
  LinkFailed(String),
  /// No program is registered with that name.
  UnknownProgram(String),
  /// No program is current.
  NoProgramInUse,
  /// The current program has no such uniform block.
  UnknownUniformBlock(String),
}

impl fmt::Display for ShaderError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ShaderError::CannotCreate(ref e) => write!(f, "cannot create shader resource: {}", e),
      ShaderError::CompilationFailed(ref ty, ref log) => {
        write!(f, "{} compilation failed: {}", ty, log)
      }
      ShaderError::LinkFailed(ref log) => write!(f, "program link failed: {}", log),
      ShaderError::UnknownProgram(ref name) => write!(f, "unknown shader program: {}", name),
      ShaderError::NoProgramInUse => f.write_str("no shader program in use"),
      ShaderError::UnknownUniformBlock(ref name) => write!(f, "unknown uniform block: {}", name),
    }
  }
}

impl error::Error for ShaderError {}

struct ProgramEntry<B>
where
  B: ?Sized + Shader,
{
  repr: B::ProgramRepr,
  locations: HashMap<String, Option<i32>>,
  uniform_buffer: Option<B::UniformBufferRepr>,
}

/// Registry of named shader programs.
pub struct ShaderLib<B>
where
  B: ?Sized + Shader,
{
  programs: HashMap<String, ProgramEntry<B>>,
  current: Option<String>,
}

impl<B> Default for ShaderLib<B>
where
  B: ?Sized + Shader,
{
  fn default() -> Self {
    ShaderLib {
      programs: HashMap::new(),
      current: None,
    }
  }
}

impl<B> ShaderLib<B>
where
  B: ?Sized + Shader,
{
  /// Create an empty library.
  pub fn new() -> Self {
    Self::default()
  }

  /// Compile and link a program from GLSL sources and register it under `name`.
  ///
  /// A program already registered with the same name is replaced.
  pub fn load_shader(
    &mut self,
    backend: &mut B,
    name: &str,
    vertex_src: &str,
    fragment_src: &str,
  ) -> Result<(), ShaderError> {
    let repr = unsafe {
      let vertex = backend.new_stage(StageType::VertexShader, vertex_src)?;
      let fragment = backend.new_stage(StageType::FragmentShader, fragment_src)?;
      backend.new_program(&vertex, &fragment)?
    };

    let entry = ProgramEntry {
      repr,
      locations: HashMap::new(),
      uniform_buffer: None,
    };

    if self.programs.insert(name.to_owned(), entry).is_some() {
      log::warn!("replacing shader program {}", name);

      if self.current.as_deref() == Some(name) {
        self.current = None;
      }
    } else {
      log::info!("loaded shader program {}", name);
    }

    Ok(())
  }

  /// Whether a program is registered with that name.
  pub fn contains(&self, name: &str) -> bool {
    self.programs.contains_key(name)
  }

  /// Name of the current program.
  pub fn current(&self) -> Option<&str> {
    self.current.as_deref()
  }

  /// Make a program current.
  pub fn use_program(&mut self, backend: &mut B, name: &str) -> Result<(), ShaderError> {
    let entry = self.programs.get(name).ok_or_else(|| {
      log::error!("shader program {} not found", name);
      ShaderError::UnknownProgram(name.to_owned())
    })?;

    unsafe { backend.use_program(&entry.repr) };

    if self.current.as_deref() != Some(name) {
      self.current = Some(name.to_owned());
    }

    Ok(())
  }

  fn current_entry(&mut self) -> Result<(&str, &mut ProgramEntry<B>), ShaderError> {
    let name = self.current.as_deref().ok_or(ShaderError::NoProgramInUse)?;
    let entry = self
      .programs
      .get_mut(name)
      .ok_or_else(|| ShaderError::UnknownProgram(name.to_owned()))?;

    Ok((name, entry))
  }

  /// Set a uniform of the current program.
  pub fn set_uniform(
    &mut self,
    backend: &mut B,
    name: &str,
    value: impl Into<UniformValue>,
  ) -> Result<(), ShaderError> {
    let (program, entry) = self.current_entry()?;

    let location = match entry.locations.get(name) {
      Some(location) => *location,

      None => {
        let location = unsafe { backend.uniform_location(&entry.repr, name) };

        if location.is_none() {
          log::warn!("uniform {} is not active in shader program {}", name, program);
        }

        entry.locations.insert(name.to_owned(), location);
        location
      }
    };

    if let Some(location) = location {
      unsafe { backend.set_uniform(location, &value.into()) };
    }

    Ok(())
  }

  /// Upload raw bytes into the uniform block `block` of the current program.
  ///
  /// The bytes must follow the block layout (typically `std140`).
  pub fn set_uniform_buffer(
    &mut self,
    backend: &mut B,
    block: &str,
    bytes: &[u8],
  ) -> Result<(), ShaderError> {
    let (_, entry) = self.current_entry()?;

    let block_index = unsafe { backend.uniform_block_index(&entry.repr, block) }
      .ok_or_else(|| ShaderError::UnknownUniformBlock(block.to_owned()))?;

    if entry.uniform_buffer.is_none() {
      entry.uniform_buffer = Some(unsafe { backend.new_uniform_buffer()? });
    }

    if let Some(ref buffer) = entry.uniform_buffer {
      unsafe { backend.upload_uniform_block(&entry.repr, block_index, 0, buffer, bytes) };
    }

    Ok(())
  }

  /// Active uniforms of a program.
  pub fn registered_uniforms(
    &self,
    backend: &mut B,
    name: &str,
  ) -> Result<Vec<ActiveUniform>, ShaderError> {
    let entry = self
      .programs
      .get(name)
      .ok_or_else(|| ShaderError::UnknownProgram(name.to_owned()))?;

    Ok(unsafe { backend.active_uniforms(&entry.repr) })
  }

  /// Log the active uniforms of a program.
  pub fn print_registered_uniforms(&self, backend: &mut B, name: &str) -> Result<(), ShaderError> {
    let uniforms = self.registered_uniforms(backend, name)?;

    log::info!("registered uniforms for {}", name);
    for uniform in uniforms {
      if uniform.size > 1 {
        log::info!("  {} {}[{}]", uniform.type_name, uniform.name, uniform.size);
      } else {
        log::info!("  {} {}", uniform.type_name, uniform.name);
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::{Call, MockBackend};
  use cgmath::{Matrix4, SquareMatrix};

  const VS: &str = "void main() {}";
  const FS: &str = "void main() {}";

  #[test]
  fn uniform_locations_are_cached() {
    let mut backend = MockBackend::with_uniforms(&["MVP", "Colour"]);
    let mut lib = ShaderLib::new();

    lib.load_shader(&mut backend, "colour", VS, FS).unwrap();
    lib.use_program(&mut backend, "colour").unwrap();
    lib
      .set_uniform(&mut backend, "Colour", [1f32, 1., 1., 1.])
      .unwrap();
    lib
      .set_uniform(&mut backend, "Colour", [1f32, 0., 0., 1.])
      .unwrap();

    let lookups = backend
      .calls
      .iter()
      .filter(|c| **c == Call::UniformLocation("Colour".to_owned()))
      .count();
    assert_eq!(lookups, 1);
    assert_eq!(
      backend.calls.last(),
      Some(&Call::SetUniform(1, UniformValue::Vec4([1., 0., 0., 1.])))
    );
  }

  #[test]
  fn inactive_uniforms_are_skipped() {
    let mut backend = MockBackend::with_uniforms(&["MVP"]);
    let mut lib = ShaderLib::new();

    lib.load_shader(&mut backend, "colour", VS, FS).unwrap();
    lib.use_program(&mut backend, "colour").unwrap();
    lib.set_uniform(&mut backend, "Colour", 1f32).unwrap();
    lib
      .set_uniform(&mut backend, "MVP", Matrix4::<f32>::identity())
      .unwrap();

    let sets: Vec<_> = backend
      .calls
      .iter()
      .filter(|c| matches!(c, Call::SetUniform(..)))
      .collect();
    assert_eq!(sets.len(), 1);
    assert!(matches!(sets[0], Call::SetUniform(0, UniformValue::Mat4(_))));
  }

  #[test]
  fn uniforms_need_a_current_program() {
    let mut backend = MockBackend::new();
    let mut lib = ShaderLib::new();

    assert_eq!(
      lib.set_uniform(&mut backend, "MVP", 1),
      Err(ShaderError::NoProgramInUse)
    );
    assert_eq!(
      lib.use_program(&mut backend, "phong"),
      Err(ShaderError::UnknownProgram("phong".to_owned()))
    );
    assert_eq!(lib.current(), None);
  }

  #[test]
  fn compilation_errors_are_reported() {
    let mut backend = MockBackend::new();
    backend.failing_stage = Some(StageType::FragmentShader);
    let mut lib = ShaderLib::new();

    let r = lib.load_shader(&mut backend, "broken", VS, FS);
    assert!(matches!(
      r,
      Err(ShaderError::CompilationFailed(StageType::FragmentShader, _))
    ));
    assert!(!lib.contains("broken"));
  }

  #[test]
  fn uniform_blocks() {
    let mut backend = MockBackend::with_uniforms(&["MVP", "TransformUBO"]);
    let mut lib = ShaderLib::new();

    lib.load_shader(&mut backend, "pbr", VS, FS).unwrap();
    lib.use_program(&mut backend, "pbr").unwrap();
    lib
      .set_uniform_buffer(&mut backend, "TransformUBO", &[0; 192])
      .unwrap();

    assert_eq!(
      backend.calls.last(),
      Some(&Call::UploadUniformBlock {
        block_index: 1,
        binding: 0,
        len: 192
      })
    );
    assert_eq!(
      lib.set_uniform_buffer(&mut backend, "Lights", &[]),
      Err(ShaderError::UnknownUniformBlock("Lights".to_owned()))
    );
  }

  #[test]
  fn listing_uniforms() {
    let mut backend = MockBackend::with_uniforms(&["MVP", "normalMatrix"]);
    let mut lib = ShaderLib::new();

    lib.load_shader(&mut backend, "phong", VS, FS).unwrap();

    let names: Vec<_> = lib
      .registered_uniforms(&mut backend, "phong")
      .unwrap()
      .into_iter()
      .map(|u| u.name)
      .collect();
    assert_eq!(names, vec!["MVP", "normalMatrix"]);
    assert!(lib.print_registered_uniforms(&mut backend, "nope").is_err());
  }
}

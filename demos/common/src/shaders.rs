//! GLSL programs shared by the demos.
//!
//! Every program reads the mesh attributes at the same locations: position at `0`, texture
//! coordinates or vertex colour at `1` and normal at `2` (see [`ngl::mesh::Vertex`]).

use crate::Backend;
use ngl::shader::{ShaderError, ShaderLib};

/// Built-in programs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BuiltinShader {
  /// Flat `Colour`.
  Colour,
  /// Colour read from attribute `1`.
  VertexColour,
  /// Lambert shading of `Colour` by a point light.
  Diffuse,
  /// Phong shading with a `light` and a `material`.
  Phong,
  /// Texture sampled from unit `0`.
  Texture,
  /// Cook-Torrance shading with uniform material parameters.
  Pbr,
  /// Cook-Torrance shading with the material read from a texture pack.
  PbrTexture,
  /// Screen-space checkers written to eight outputs.
  Checker,
}

impl BuiltinShader {
  /// Name the program is registered with.
  pub fn name(self) -> &'static str {
    match self {
      BuiltinShader::Colour => "Colour",
      BuiltinShader::VertexColour => "VertexColour",
      BuiltinShader::Diffuse => "Diffuse",
      BuiltinShader::Phong => "Phong",
      BuiltinShader::Texture => "Texture",
      BuiltinShader::Pbr => "PBR",
      BuiltinShader::PbrTexture => "PBRTexture",
      BuiltinShader::Checker => "Checker",
    }
  }

  fn sources(self) -> (&'static str, &'static str) {
    match self {
      BuiltinShader::Colour => (
        include_str!("shaders/colour-vs.glsl"),
        include_str!("shaders/colour-fs.glsl"),
      ),
      BuiltinShader::VertexColour => (
        include_str!("shaders/vertex-colour-vs.glsl"),
        include_str!("shaders/vertex-colour-fs.glsl"),
      ),
      BuiltinShader::Diffuse => (
        include_str!("shaders/diffuse-vs.glsl"),
        include_str!("shaders/diffuse-fs.glsl"),
      ),
      BuiltinShader::Phong => (
        include_str!("shaders/phong-vs.glsl"),
        include_str!("shaders/phong-fs.glsl"),
      ),
      BuiltinShader::Texture => (
        include_str!("shaders/texture-vs.glsl"),
        include_str!("shaders/texture-fs.glsl"),
      ),
      BuiltinShader::Pbr => (
        include_str!("shaders/pbr-vs.glsl"),
        include_str!("shaders/pbr-fs.glsl"),
      ),
      BuiltinShader::PbrTexture => (
        include_str!("shaders/pbr-texture-vs.glsl"),
        include_str!("shaders/pbr-texture-fs.glsl"),
      ),
      BuiltinShader::Checker => (
        include_str!("shaders/checker-vs.glsl"),
        include_str!("shaders/checker-fs.glsl"),
      ),
    }
  }

  /// Compile the program and register it in `shaders`.
  pub fn load(self, shaders: &mut ShaderLib<Backend>, backend: &mut Backend) -> Result<(), ShaderError> {
    let (vs, fs) = self.sources();
    shaders.load_shader(backend, self.name(), vs, fs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [BuiltinShader; 8] = [
    BuiltinShader::Colour,
    BuiltinShader::VertexColour,
    BuiltinShader::Diffuse,
    BuiltinShader::Phong,
    BuiltinShader::Texture,
    BuiltinShader::Pbr,
    BuiltinShader::PbrTexture,
    BuiltinShader::Checker,
  ];

  #[test]
  fn sources_target_gl41_core() {
    for shader in ALL.iter() {
      let (vs, fs) = shader.sources();
      assert!(vs.starts_with("#version 410 core"), "{}", shader.name());
      assert!(fs.starts_with("#version 410 core"), "{}", shader.name());
    }
  }

  #[test]
  fn attribute_locations_match_the_mesh_layout() {
    let (vs, _) = BuiltinShader::PbrTexture.sources();

    assert!(vs.contains("layout(location = 0) in vec3 inPosition;"));
    assert!(vs.contains("layout(location = 1) in vec2 inUV;"));
    assert!(vs.contains("layout(location = 2) in vec3 inNormal;"));
  }

  #[test]
  fn checker_writes_eight_outputs() {
    let (_, fs) = BuiltinShader::Checker.sources();
    assert_eq!(fs.matches("out vec4 fragColour").count(), 8);
  }
}

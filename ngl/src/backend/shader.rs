//! Shader backend interface.

use crate::shader::{ActiveUniform, ShaderError, StageType, UniformValue};

/// Shader support on the backend.
pub unsafe trait Shader {
  /// Backend representation of a shader stage.
  type StageRepr;

  /// Backend representation of a linked shader program.
  type ProgramRepr;

  /// Backend representation of a buffer backing a uniform block.
  type UniformBufferRepr;

  /// Compile a shader stage from its source.
  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, ShaderError>;

  /// Link a vertex and a fragment stage into a program.
  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ShaderError>;

  /// Make a program the current one.
  unsafe fn use_program(&mut self, program: &Self::ProgramRepr);

  /// Location of an active uniform, if any.
  unsafe fn uniform_location(&mut self, program: &Self::ProgramRepr, name: &str) -> Option<i32>;

  /// Set a uniform of the current program.
  unsafe fn set_uniform(&mut self, location: i32, value: &UniformValue);

  /// List the active uniforms of a program.
  unsafe fn active_uniforms(&mut self, program: &Self::ProgramRepr) -> Vec<ActiveUniform>;

  /// Index of a uniform block, if active.
  unsafe fn uniform_block_index(&mut self, program: &Self::ProgramRepr, name: &str)
    -> Option<u32>;

  /// Create a buffer to back uniform blocks.
  unsafe fn new_uniform_buffer(&mut self) -> Result<Self::UniformBufferRepr, ShaderError>;

  /// Upload `bytes` into a uniform buffer, bind it at `binding` and route the block at
  /// `block_index` of `program` to that binding.
  unsafe fn upload_uniform_block(
    &mut self,
    program: &Self::ProgramRepr,
    block_index: u32,
    binding: u32,
    buffer: &Self::UniformBufferRepr,
    bytes: &[u8],
  );
}

//! OpenGL shader implementation.

use crate::gl41::{state::GLState, GL41};
use gl::types::*;
use ngl::backend::shader::Shader;
use ngl::shader::{ActiveUniform, ShaderError, StageType, UniformValue};
use std::{
  cell::RefCell,
  ffi::CString,
  os::raw::c_void,
  ptr::{null, null_mut},
  rc::Rc,
};

/// A compiled shader stage.
#[derive(Debug)]
pub struct Stage {
  handle: GLuint,
  ty: StageType,
}

impl Stage {
  /// Type of the stage.
  pub fn ty(&self) -> StageType {
    self.ty
  }
}

impl Drop for Stage {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteShader(self.handle);
    }
  }
}

/// A linked shader program.
#[derive(Debug)]
pub struct Program {
  pub(crate) handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Program {
  /// OpenGL name.
  pub fn handle(&self) -> GLuint {
    self.handle
  }

  fn link(&self) -> Result<(), ShaderError> {
    let handle = self.handle;

    unsafe {
      gl::LinkProgram(handle);

      let mut linked: GLint = gl::FALSE.into();
      gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

      if linked == gl::types::GLint::from(gl::TRUE) {
        Ok(())
      } else {
        let mut log_len: GLint = 0;
        gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut log: Vec<u8> = vec![0; log_len.max(0) as usize];
        gl::GetProgramInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

        Err(ShaderError::LinkFailed(info_log(log)))
      }
    }
  }
}

impl Drop for Program {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().forget_program(self.handle);
      gl::DeleteProgram(self.handle);
    }
  }
}

/// Buffer backing the uniform blocks of a program.
#[derive(Debug)]
pub struct UniformBuffer {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Drop for UniformBuffer {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_buffer(self.handle);
      gl::DeleteBuffers(1, &self.handle);
    }
  }
}

unsafe impl Shader for GL41 {
  type StageRepr = Stage;

  type ProgramRepr = Program;

  type UniformBufferRepr = UniformBuffer;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, ShaderError> {
    let c_src = CString::new(src.as_bytes()).map_err(|_| {
      ShaderError::CompilationFailed(ty, "source contains a nul byte".to_owned())
    })?;

    let handle = gl::CreateShader(opengl_shader_type(ty));

    if handle == 0 {
      return Err(ShaderError::CompilationFailed(
        ty,
        "unable to create shader stage".to_owned(),
      ));
    }

    gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
    gl::CompileShader(handle);

    let mut compiled: GLint = gl::FALSE.into();
    gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

    if compiled == gl::types::GLint::from(gl::TRUE) {
      Ok(Stage { handle, ty })
    } else {
      let mut log_len: GLint = 0;
      gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

      let mut log: Vec<u8> = vec![0; log_len.max(0) as usize];
      gl::GetShaderInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

      gl::DeleteShader(handle);

      Err(ShaderError::CompilationFailed(ty, info_log(log)))
    }
  }

  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ShaderError> {
    let handle = gl::CreateProgram();

    if handle == 0 {
      return Err(ShaderError::CannotCreate(
        "unable to create shader program".to_owned(),
      ));
    }

    gl::AttachShader(handle, vertex.handle);
    gl::AttachShader(handle, fragment.handle);

    let program = Program {
      handle,
      state: self.state.clone(),
    };

    program.link()?;

    // stages can go once linked
    gl::DetachShader(handle, vertex.handle);
    gl::DetachShader(handle, fragment.handle);

    Ok(program)
  }

  unsafe fn use_program(&mut self, program: &Self::ProgramRepr) {
    self.state.borrow_mut().use_program(program.handle);
  }

  unsafe fn uniform_location(&mut self, program: &Self::ProgramRepr, name: &str) -> Option<i32> {
    let c_name = CString::new(name.as_bytes()).ok()?;
    let location = gl::GetUniformLocation(program.handle, c_name.as_ptr() as *const GLchar);

    if location < 0 {
      None
    } else {
      Some(location)
    }
  }

  unsafe fn set_uniform(&mut self, location: i32, value: &UniformValue) {
    debug_assert!(
      self.state.borrow().current_program() != 0,
      "setting a uniform without a program in use"
    );

    match *value {
      UniformValue::Bool(b) => gl::Uniform1i(location, b as GLint),
      UniformValue::Int(i) => gl::Uniform1i(location, i),
      UniformValue::Float(x) => gl::Uniform1f(location, x),
      UniformValue::Vec2(ref v) => gl::Uniform2fv(location, 1, v.as_ptr()),
      UniformValue::Vec3(ref v) => gl::Uniform3fv(location, 1, v.as_ptr()),
      UniformValue::Vec4(ref v) => gl::Uniform4fv(location, 1, v.as_ptr()),
      UniformValue::Mat2(ref m) => {
        gl::UniformMatrix2fv(location, 1, gl::FALSE, m.as_ptr() as *const GLfloat)
      }
      UniformValue::Mat3(ref m) => {
        gl::UniformMatrix3fv(location, 1, gl::FALSE, m.as_ptr() as *const GLfloat)
      }
      UniformValue::Mat4(ref m) => {
        gl::UniformMatrix4fv(location, 1, gl::FALSE, m.as_ptr() as *const GLfloat)
      }
    }
  }

  unsafe fn active_uniforms(&mut self, program: &Self::ProgramRepr) -> Vec<ActiveUniform> {
    let mut count: GLint = 0;
    let mut max_len: GLint = 0;
    gl::GetProgramiv(program.handle, gl::ACTIVE_UNIFORMS, &mut count);
    gl::GetProgramiv(program.handle, gl::ACTIVE_UNIFORM_MAX_LENGTH, &mut max_len);

    (0..count.max(0) as GLuint)
      .map(|index| {
        let mut name: Vec<u8> = vec![0; max_len.max(1) as usize];
        let mut len: GLsizei = 0;
        let mut size: GLint = 0;
        let mut ty: GLenum = 0;

        gl::GetActiveUniform(
          program.handle,
          index,
          max_len,
          &mut len,
          &mut size,
          &mut ty,
          name.as_mut_ptr() as *mut GLchar,
        );

        name.truncate(len.max(0) as usize);

        ActiveUniform {
          name: String::from_utf8_lossy(&name).into_owned(),
          type_name: glsl_type_name(ty).to_owned(),
          size,
        }
      })
      .collect()
  }

  unsafe fn uniform_block_index(
    &mut self,
    program: &Self::ProgramRepr,
    name: &str,
  ) -> Option<u32> {
    let c_name = CString::new(name.as_bytes()).ok()?;
    let index = gl::GetUniformBlockIndex(program.handle, c_name.as_ptr() as *const GLchar);

    if index == gl::INVALID_INDEX {
      None
    } else {
      Some(index)
    }
  }

  unsafe fn new_uniform_buffer(&mut self) -> Result<Self::UniformBufferRepr, ShaderError> {
    let mut handle: GLuint = 0;
    gl::GenBuffers(1, &mut handle);

    if handle == 0 {
      return Err(ShaderError::CannotCreate(
        "unable to create uniform buffer".to_owned(),
      ));
    }

    Ok(UniformBuffer {
      handle,
      state: self.state.clone(),
    })
  }

  unsafe fn upload_uniform_block(
    &mut self,
    program: &Self::ProgramRepr,
    block_index: u32,
    binding: u32,
    buffer: &Self::UniformBufferRepr,
    bytes: &[u8],
  ) {
    gl::BindBuffer(gl::UNIFORM_BUFFER, buffer.handle);
    gl::BufferData(
      gl::UNIFORM_BUFFER,
      bytes.len() as GLsizeiptr,
      bytes.as_ptr() as *const c_void,
      gl::DYNAMIC_DRAW,
    );

    self
      .state
      .borrow_mut()
      .bind_buffer_base(buffer.handle, binding);

    gl::UniformBlockBinding(program.handle, block_index, binding);
  }
}

fn opengl_shader_type(t: StageType) -> GLenum {
  match t {
    StageType::VertexShader => gl::VERTEX_SHADER,
    StageType::FragmentShader => gl::FRAGMENT_SHADER,
  }
}

// drivers null-terminate their logs
fn info_log(mut log: Vec<u8>) -> String {
  while log.last() == Some(&0) {
    log.pop();
  }

  String::from_utf8_lossy(&log).into_owned()
}

fn glsl_type_name(ty: GLenum) -> &'static str {
  match ty {
    gl::FLOAT => "float",
    gl::FLOAT_VEC2 => "vec2",
    gl::FLOAT_VEC3 => "vec3",
    gl::FLOAT_VEC4 => "vec4",
    gl::DOUBLE => "double",
    gl::INT => "int",
    gl::INT_VEC2 => "ivec2",
    gl::INT_VEC3 => "ivec3",
    gl::INT_VEC4 => "ivec4",
    gl::UNSIGNED_INT => "uint",
    gl::UNSIGNED_INT_VEC2 => "uvec2",
    gl::UNSIGNED_INT_VEC3 => "uvec3",
    gl::UNSIGNED_INT_VEC4 => "uvec4",
    gl::BOOL => "bool",
    gl::BOOL_VEC2 => "bvec2",
    gl::BOOL_VEC3 => "bvec3",
    gl::BOOL_VEC4 => "bvec4",
    gl::FLOAT_MAT2 => "mat2",
    gl::FLOAT_MAT3 => "mat3",
    gl::FLOAT_MAT4 => "mat4",
    gl::FLOAT_MAT2x3 => "mat2x3",
    gl::FLOAT_MAT2x4 => "mat2x4",
    gl::FLOAT_MAT3x2 => "mat3x2",
    gl::FLOAT_MAT3x4 => "mat3x4",
    gl::FLOAT_MAT4x2 => "mat4x2",
    gl::FLOAT_MAT4x3 => "mat4x3",
    gl::SAMPLER_1D => "sampler1D",
    gl::SAMPLER_2D => "sampler2D",
    gl::SAMPLER_3D => "sampler3D",
    gl::SAMPLER_CUBE => "samplerCube",
    gl::SAMPLER_2D_SHADOW => "sampler2DShadow",
    gl::SAMPLER_2D_ARRAY => "sampler2DArray",
    gl::INT_SAMPLER_2D => "isampler2D",
    gl::UNSIGNED_INT_SAMPLER_2D => "usampler2D",
    _ => "unknown",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn info_logs_lose_their_nul_bytes() {
    assert_eq!(info_log(b"0:1: error\0".to_vec()), "0:1: error");
    assert_eq!(info_log(Vec::new()), "");
  }

  #[test]
  fn type_names() {
    assert_eq!(glsl_type_name(gl::FLOAT_MAT4), "mat4");
    assert_eq!(glsl_type_name(gl::SAMPLER_2D), "sampler2D");
    assert_eq!(glsl_type_name(0), "unknown");
  }
}

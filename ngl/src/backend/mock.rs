//! Recording backend used by unit tests.
//!
//! Every backend call is pushed into [`MockBackend::calls`] so that tests can assert what would
//! have been sent to a driver. Crates defining their own VAO kinds get it with the `mock`
//! feature.

use crate::backend::framebuffer::Framebuffer;
use crate::backend::render_state::RenderState;
use crate::backend::shader::Shader;
use crate::backend::texture::Texture;
use crate::backend::vertex_array::VertexArray;
use crate::framebuffer::{DepthFormat, FramebufferError};
use crate::render_state::PolygonMode;
use crate::shader::{ActiveUniform, ShaderError, StageType, UniformValue};
use crate::texture::{Filter, PixelFormat, Sampling, TextureError};
use crate::vao::{AttribPointer, BufferUsage, IndexType, MapAccess, Mode, VaoError};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
  NewVertexArray(u32),
  BindVertexArray(u32),
  UnbindVertexArray,
  NewBuffer(u32),
  UploadArray {
    buffer: u32,
    len: usize,
  },
  UploadElement {
    buffer: u32,
    len: usize,
  },
  BindArray(u32),
  AttribPointer(AttribPointer),
  DrawArrays {
    mode: Mode,
    first: usize,
    count: usize,
  },
  DrawElements {
    mode: Mode,
    count: usize,
    index_type: IndexType,
    offset: usize,
  },
  Map(u32),
  Unmap(u32),
  NewStage(StageType),
  NewProgram(u32),
  UseProgram(u32),
  UniformLocation(String),
  SetUniform(i32, UniformValue),
  UploadUniformBlock {
    block_index: u32,
    binding: u32,
    len: usize,
  },
  NewTexture {
    id: u32,
    size: [u32; 2],
    format: PixelFormat,
  },
  BindTexture {
    id: u32,
    unit: u32,
  },
  NewFramebuffer(u32),
  AttachColor {
    framebuffer: u32,
    index: usize,
    texture: u32,
  },
  AttachDepth {
    framebuffer: u32,
    format: DepthFormat,
  },
  BindFramebuffer(Option<u32>),
  DrawBuffers(usize),
  Blit {
    attachment: usize,
    src: [i32; 4],
    dst: [i32; 4],
  },
  ClearColor([f32; 4]),
  Clear,
  DepthTest(bool),
  Multisample(bool),
  PolygonMode(PolygonMode),
  Viewport([i32; 4]),
}

#[derive(Debug, Default)]
pub struct MockBackend {
  pub calls: Vec<Call>,
  next_id: u32,
  storage: HashMap<u32, Vec<u8>>,
  // active uniforms, shared by every program
  uniforms: Vec<String>,
  // sampling of every created texture, by id
  pub samplings: HashMap<u32, Sampling>,
  pub failing_stage: Option<StageType>,
  pub max_color_attachments: usize,
  pub incomplete_framebuffers: bool,
}

impl MockBackend {
  pub fn new() -> Self {
    MockBackend {
      max_color_attachments: 8,
      ..MockBackend::default()
    }
  }

  pub fn with_uniforms(names: &[&str]) -> Self {
    MockBackend {
      uniforms: names.iter().map(|&n| n.to_owned()).collect(),
      ..MockBackend::new()
    }
  }

  pub fn last_id(&self) -> u32 {
    self.next_id
  }

  pub fn drew(&self) -> bool {
    self
      .calls
      .iter()
      .any(|c| matches!(c, Call::DrawArrays { .. } | Call::DrawElements { .. }))
  }

  fn gen_id(&mut self) -> u32 {
    self.next_id += 1;
    self.next_id
  }
}

unsafe impl VertexArray for MockBackend {
  type VertexArrayRepr = u32;

  type BufferRepr = u32;

  unsafe fn new_vertex_array(&mut self) -> Result<Self::VertexArrayRepr, VaoError> {
    let id = self.gen_id();
    self.calls.push(Call::NewVertexArray(id));
    Ok(id)
  }

  unsafe fn bind_vertex_array(&mut self, vao: &Self::VertexArrayRepr) {
    self.calls.push(Call::BindVertexArray(*vao));
  }

  unsafe fn unbind_vertex_array(&mut self) {
    self.calls.push(Call::UnbindVertexArray);
  }

  unsafe fn new_buffer(&mut self) -> Result<Self::BufferRepr, VaoError> {
    let id = self.gen_id();
    self.calls.push(Call::NewBuffer(id));
    Ok(id)
  }

  unsafe fn upload_array_buffer(
    &mut self,
    buffer: &Self::BufferRepr,
    bytes: &[u8],
    _: BufferUsage,
  ) {
    self.storage.insert(*buffer, bytes.to_vec());
    self.calls.push(Call::UploadArray {
      buffer: *buffer,
      len: bytes.len(),
    });
  }

  unsafe fn upload_element_buffer(
    &mut self,
    buffer: &Self::BufferRepr,
    bytes: &[u8],
    _: BufferUsage,
  ) {
    self.storage.insert(*buffer, bytes.to_vec());
    self.calls.push(Call::UploadElement {
      buffer: *buffer,
      len: bytes.len(),
    });
  }

  unsafe fn bind_array_buffer(&mut self, buffer: &Self::BufferRepr) {
    self.calls.push(Call::BindArray(*buffer));
  }

  unsafe fn set_attrib_pointer(&mut self, pointer: &AttribPointer) {
    self.calls.push(Call::AttribPointer(*pointer));
  }

  unsafe fn draw_arrays(&mut self, mode: Mode, first: usize, count: usize) {
    self.calls.push(Call::DrawArrays { mode, first, count });
  }

  unsafe fn draw_elements(
    &mut self,
    mode: Mode,
    count: usize,
    index_type: IndexType,
    byte_offset: usize,
  ) {
    self.calls.push(Call::DrawElements {
      mode,
      count,
      index_type,
      offset: byte_offset,
    });
  }

  unsafe fn buffer_id(buffer: &Self::BufferRepr) -> u32 {
    *buffer
  }

  unsafe fn map_buffer(
    &mut self,
    buffer: &Self::BufferRepr,
    _: MapAccess,
  ) -> Result<*mut u8, VaoError> {
    self.calls.push(Call::Map(*buffer));
    self
      .storage
      .get_mut(buffer)
      .map(|bytes| bytes.as_mut_ptr())
      .ok_or(VaoError::MapFailed(*buffer))
  }

  unsafe fn unmap_buffer(&mut self, buffer: &Self::BufferRepr) {
    self.calls.push(Call::Unmap(*buffer));
  }
}

unsafe impl Shader for MockBackend {
  type StageRepr = StageType;

  type ProgramRepr = u32;

  type UniformBufferRepr = u32;

  unsafe fn new_stage(&mut self, ty: StageType, _: &str) -> Result<Self::StageRepr, ShaderError> {
    self.calls.push(Call::NewStage(ty));

    if self.failing_stage == Some(ty) {
      Err(ShaderError::CompilationFailed(ty, "0:1: syntax error".to_owned()))
    } else {
      Ok(ty)
    }
  }

  unsafe fn new_program(
    &mut self,
    _: &Self::StageRepr,
    _: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ShaderError> {
    let id = self.gen_id();
    self.calls.push(Call::NewProgram(id));
    Ok(id)
  }

  unsafe fn use_program(&mut self, program: &Self::ProgramRepr) {
    self.calls.push(Call::UseProgram(*program));
  }

  unsafe fn uniform_location(&mut self, _: &Self::ProgramRepr, name: &str) -> Option<i32> {
    self.calls.push(Call::UniformLocation(name.to_owned()));
    self
      .uniforms
      .iter()
      .position(|n| n == name)
      .map(|i| i as i32)
  }

  unsafe fn set_uniform(&mut self, location: i32, value: &UniformValue) {
    self.calls.push(Call::SetUniform(location, value.clone()));
  }

  unsafe fn active_uniforms(&mut self, _: &Self::ProgramRepr) -> Vec<ActiveUniform> {
    self
      .uniforms
      .iter()
      .map(|name| ActiveUniform {
        name: name.clone(),
        type_name: "float".to_owned(),
        size: 1,
      })
      .collect()
  }

  unsafe fn uniform_block_index(&mut self, _: &Self::ProgramRepr, name: &str) -> Option<u32> {
    self
      .uniforms
      .iter()
      .position(|n| n == name)
      .map(|i| i as u32)
  }

  unsafe fn new_uniform_buffer(&mut self) -> Result<Self::UniformBufferRepr, ShaderError> {
    Ok(self.gen_id())
  }

  unsafe fn upload_uniform_block(
    &mut self,
    _: &Self::ProgramRepr,
    block_index: u32,
    binding: u32,
    _: &Self::UniformBufferRepr,
    bytes: &[u8],
  ) {
    self.calls.push(Call::UploadUniformBlock {
      block_index,
      binding,
      len: bytes.len(),
    });
  }
}

unsafe impl Texture for MockBackend {
  type TextureRepr = u32;

  unsafe fn new_texture_2d(
    &mut self,
    size: [u32; 2],
    format: PixelFormat,
    texels: Option<&[u8]>,
    sampling: &Sampling,
  ) -> Result<Self::TextureRepr, TextureError> {
    if let Some(texels) = texels {
      let expected = (size[0] * size[1]) as usize * format.bytes_per_pixel();

      if texels.len() != expected {
        return Err(TextureError::BadTexelCount {
          expected,
          found: texels.len(),
        });
      }
    }

    let id = self.gen_id();
    self.samplings.insert(id, *sampling);
    self.calls.push(Call::NewTexture { id, size, format });
    Ok(id)
  }

  unsafe fn bind_texture(&mut self, texture: &Self::TextureRepr, unit: u32) {
    self.calls.push(Call::BindTexture {
      id: *texture,
      unit,
    });
  }
}

unsafe impl Framebuffer for MockBackend {
  type FramebufferRepr = u32;

  type RenderbufferRepr = u32;

  unsafe fn max_color_attachments(&mut self) -> usize {
    self.max_color_attachments
  }

  unsafe fn new_framebuffer(&mut self) -> Result<Self::FramebufferRepr, FramebufferError> {
    let id = self.gen_id();
    self.calls.push(Call::NewFramebuffer(id));
    Ok(id)
  }

  unsafe fn attach_color_texture(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
    index: usize,
    texture: &Self::TextureRepr,
  ) {
    self.calls.push(Call::AttachColor {
      framebuffer: *framebuffer,
      index,
      texture: *texture,
    });
  }

  unsafe fn new_depth_renderbuffer(
    &mut self,
    _: [u32; 2],
    _: DepthFormat,
  ) -> Result<Self::RenderbufferRepr, FramebufferError> {
    Ok(self.gen_id())
  }

  unsafe fn attach_depth_renderbuffer(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
    _: &Self::RenderbufferRepr,
    format: DepthFormat,
  ) {
    self.calls.push(Call::AttachDepth {
      framebuffer: *framebuffer,
      format,
    });
  }

  unsafe fn check_framebuffer(
    &mut self,
    _: &Self::FramebufferRepr,
  ) -> Result<(), FramebufferError> {
    if self.incomplete_framebuffers {
      Err(FramebufferError::Incomplete(
        "incomplete missing attachment".to_owned(),
      ))
    } else {
      Ok(())
    }
  }

  unsafe fn bind_framebuffer(&mut self, framebuffer: Option<&Self::FramebufferRepr>) {
    self.calls.push(Call::BindFramebuffer(framebuffer.copied()));
  }

  unsafe fn set_draw_buffers(&mut self, count: usize) {
    self.calls.push(Call::DrawBuffers(count));
  }

  unsafe fn blit_to_default(
    &mut self,
    _: &Self::FramebufferRepr,
    attachment: usize,
    src: [i32; 4],
    dst: [i32; 4],
    _: Filter,
  ) {
    self.calls.push(Call::Blit {
      attachment,
      src,
      dst,
    });
  }
}

unsafe impl RenderState for MockBackend {
  unsafe fn set_clear_color(&mut self, color: [f32; 4]) {
    self.calls.push(Call::ClearColor(color));
  }

  unsafe fn clear(&mut self, _: bool, _: bool) {
    self.calls.push(Call::Clear);
  }

  unsafe fn set_depth_test(&mut self, enabled: bool) {
    self.calls.push(Call::DepthTest(enabled));
  }

  unsafe fn set_multisample(&mut self, enabled: bool) {
    self.calls.push(Call::Multisample(enabled));
  }

  unsafe fn set_polygon_mode(&mut self, mode: PolygonMode) {
    self.calls.push(Call::PolygonMode(mode));
  }

  unsafe fn set_viewport(&mut self, viewport: [i32; 4]) {
    self.calls.push(Call::Viewport(viewport));
  }
}

//! OpenGL vertex array and buffer implementation.

use crate::gl41::{
  state::{Bind, GLState},
  GL41,
};
use gl::types::*;
use ngl::backend::vertex_array::VertexArray;
use ngl::vao::{AttribPointer, AttribType, BufferUsage, IndexType, MapAccess, Mode, VaoError};
use std::{cell::RefCell, os::raw::c_void, ptr, rc::Rc};

/// OpenGL vertex array object.
///
/// Deleted when dropped.
#[derive(Debug)]
pub struct VertexArrayObject {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl VertexArrayObject {
  /// OpenGL name.
  pub fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for VertexArrayObject {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().forget_vertex_array(self.handle);
      gl::DeleteVertexArrays(1, &self.handle);
    }
  }
}

/// OpenGL buffer, used either as an attribute buffer or as an element buffer.
///
/// Deleted when dropped.
#[derive(Debug)]
pub struct Buffer {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Buffer {
  /// OpenGL name.
  pub fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for Buffer {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_buffer(self.handle);
      gl::DeleteBuffers(1, &self.handle);
    }
  }
}

unsafe impl VertexArray for GL41 {
  type VertexArrayRepr = VertexArrayObject;

  type BufferRepr = Buffer;

  unsafe fn new_vertex_array(&mut self) -> Result<Self::VertexArrayRepr, VaoError> {
    let mut handle: GLuint = 0;
    gl::GenVertexArrays(1, &mut handle);

    if handle == 0 {
      return Err(VaoError::CannotCreate("glGenVertexArrays returned 0".to_owned()));
    }

    Ok(VertexArrayObject {
      handle,
      state: self.state.clone(),
    })
  }

  unsafe fn bind_vertex_array(&mut self, vao: &Self::VertexArrayRepr) {
    self
      .state
      .borrow_mut()
      .bind_vertex_array(vao.handle, Bind::Cached);
  }

  unsafe fn unbind_vertex_array(&mut self) {
    self.state.borrow_mut().unbind_vertex_array();
  }

  unsafe fn new_buffer(&mut self) -> Result<Self::BufferRepr, VaoError> {
    let mut handle: GLuint = 0;
    gl::GenBuffers(1, &mut handle);

    if handle == 0 {
      return Err(VaoError::CannotCreate("glGenBuffers returned 0".to_owned()));
    }

    Ok(Buffer {
      handle,
      state: self.state.clone(),
    })
  }

  unsafe fn upload_array_buffer(
    &mut self,
    buffer: &Self::BufferRepr,
    bytes: &[u8],
    usage: BufferUsage,
  ) {
    self
      .state
      .borrow_mut()
      .bind_array_buffer(buffer.handle, Bind::Cached);

    gl::BufferData(
      gl::ARRAY_BUFFER,
      bytes.len() as GLsizeiptr,
      data_ptr(bytes),
      buffer_usage_to_glenum(usage),
    );
  }

  unsafe fn upload_element_buffer(
    &mut self,
    buffer: &Self::BufferRepr,
    bytes: &[u8],
    usage: BufferUsage,
  ) {
    // forced, so that the binding gets recorded into the vertex array whatever the cache says
    self
      .state
      .borrow_mut()
      .bind_element_array_buffer(buffer.handle, Bind::Forced);

    gl::BufferData(
      gl::ELEMENT_ARRAY_BUFFER,
      bytes.len() as GLsizeiptr,
      data_ptr(bytes),
      buffer_usage_to_glenum(usage),
    );
  }

  unsafe fn bind_array_buffer(&mut self, buffer: &Self::BufferRepr) {
    self
      .state
      .borrow_mut()
      .bind_array_buffer(buffer.handle, Bind::Cached);
  }

  unsafe fn set_attrib_pointer(&mut self, pointer: &AttribPointer) {
    let index = pointer.index as GLuint;
    let size = pointer.size as GLint;
    let ty = attrib_type_to_glenum(pointer.ty);
    let stride = pointer.stride as GLsizei;
    let offset = pointer.offset as *const c_void;

    if pointer.ty == AttribType::Float || pointer.normalized {
      gl::VertexAttribPointer(
        index,
        size,
        ty,
        if pointer.normalized {
          gl::TRUE
        } else {
          gl::FALSE
        },
        stride,
        offset,
      );
    } else {
      gl::VertexAttribIPointer(index, size, ty, stride, offset);
    }

    gl::EnableVertexAttribArray(index);
  }

  unsafe fn draw_arrays(&mut self, mode: Mode, first: usize, count: usize) {
    gl::DrawArrays(mode_to_glenum(mode), first as GLint, count as GLsizei);
  }

  unsafe fn draw_elements(
    &mut self,
    mode: Mode,
    count: usize,
    index_type: IndexType,
    byte_offset: usize,
  ) {
    gl::DrawElements(
      mode_to_glenum(mode),
      count as GLsizei,
      index_type_to_glenum(index_type),
      byte_offset as *const c_void,
    );
  }

  unsafe fn buffer_id(buffer: &Self::BufferRepr) -> u32 {
    buffer.handle
  }

  unsafe fn map_buffer(
    &mut self,
    buffer: &Self::BufferRepr,
    access: MapAccess,
  ) -> Result<*mut u8, VaoError> {
    self
      .state
      .borrow_mut()
      .bind_array_buffer(buffer.handle, Bind::Cached);

    let ptr = gl::MapBuffer(gl::ARRAY_BUFFER, map_access_to_glenum(access)) as *mut u8;

    if ptr.is_null() {
      log::error!("cannot map buffer {}", buffer.handle);
      Err(VaoError::MapFailed(buffer.handle))
    } else {
      Ok(ptr)
    }
  }

  unsafe fn unmap_buffer(&mut self, buffer: &Self::BufferRepr) {
    self
      .state
      .borrow_mut()
      .bind_array_buffer(buffer.handle, Bind::Cached);

    gl::UnmapBuffer(gl::ARRAY_BUFFER);
  }
}

// empty uploads only allocate
fn data_ptr(bytes: &[u8]) -> *const c_void {
  if bytes.is_empty() {
    ptr::null()
  } else {
    bytes.as_ptr() as *const c_void
  }
}

fn buffer_usage_to_glenum(usage: BufferUsage) -> GLenum {
  match usage {
    BufferUsage::StaticDraw => gl::STATIC_DRAW,
    BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
    BufferUsage::StreamDraw => gl::STREAM_DRAW,
  }
}

fn attrib_type_to_glenum(ty: AttribType) -> GLenum {
  match ty {
    AttribType::Float => gl::FLOAT,
    AttribType::Int => gl::INT,
    AttribType::UInt => gl::UNSIGNED_INT,
    AttribType::Short => gl::SHORT,
    AttribType::UShort => gl::UNSIGNED_SHORT,
    AttribType::Byte => gl::BYTE,
    AttribType::UByte => gl::UNSIGNED_BYTE,
  }
}

fn index_type_to_glenum(ty: IndexType) -> GLenum {
  match ty {
    IndexType::U8 => gl::UNSIGNED_BYTE,
    IndexType::U16 => gl::UNSIGNED_SHORT,
    IndexType::U32 => gl::UNSIGNED_INT,
  }
}

fn map_access_to_glenum(access: MapAccess) -> GLenum {
  match access {
    MapAccess::Read => gl::READ_ONLY,
    MapAccess::Write => gl::WRITE_ONLY,
    MapAccess::ReadWrite => gl::READ_WRITE,
  }
}

fn mode_to_glenum(mode: Mode) -> GLenum {
  match mode {
    Mode::Point => gl::POINTS,
    Mode::Line => gl::LINES,
    Mode::LineStrip => gl::LINE_STRIP,
    Mode::LineLoop => gl::LINE_LOOP,
    Mode::Triangle => gl::TRIANGLES,
    Mode::TriangleStrip => gl::TRIANGLE_STRIP,
    Mode::TriangleFan => gl::TRIANGLE_FAN,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn index_types() {
    assert_eq!(index_type_to_glenum(IndexType::U8), gl::UNSIGNED_BYTE);
    assert_eq!(index_type_to_glenum(IndexType::U16), gl::UNSIGNED_SHORT);
    assert_eq!(index_type_to_glenum(IndexType::U32), gl::UNSIGNED_INT);
  }

  #[test]
  fn modes() {
    assert_eq!(mode_to_glenum(Mode::Triangle), gl::TRIANGLES);
    assert_eq!(mode_to_glenum(Mode::TriangleStrip), gl::TRIANGLE_STRIP);
    assert_eq!(mode_to_glenum(Mode::LineLoop), gl::LINE_LOOP);
  }

  #[test]
  fn empty_uploads_pass_null() {
    assert!(data_ptr(&[]).is_null());
    assert!(!data_ptr(&[1, 2]).is_null());
  }
}

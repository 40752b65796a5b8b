//! Vertex array backend interface.
//!
//! A vertex array gathers attribute buffers and, optionally, an index buffer. Buffers are created
//! on their own and uploaded while a vertex array is bound, so that the attribute pointers and the
//! element buffer get recorded into the vertex array state.

use crate::vao::{AttribPointer, BufferUsage, IndexType, MapAccess, Mode, VaoError};

/// Vertex array support on the backend.
pub unsafe trait VertexArray {
  /// Backend representation of a vertex array.
  type VertexArrayRepr;

  /// Backend representation of a buffer (attribute or index).
  type BufferRepr;

  /// Create a new, empty vertex array.
  unsafe fn new_vertex_array(&mut self) -> Result<Self::VertexArrayRepr, VaoError>;

  /// Bind a vertex array; subsequent buffer and attribute commands are recorded into it.
  unsafe fn bind_vertex_array(&mut self, vao: &Self::VertexArrayRepr);

  /// Unbind whatever vertex array is bound.
  unsafe fn unbind_vertex_array(&mut self);

  /// Create a new buffer without any storage.
  unsafe fn new_buffer(&mut self) -> Result<Self::BufferRepr, VaoError>;

  /// Bind a buffer as the current attribute buffer and (re)allocate its storage with `bytes`.
  unsafe fn upload_array_buffer(
    &mut self,
    buffer: &Self::BufferRepr,
    bytes: &[u8],
    usage: BufferUsage,
  );

  /// Bind a buffer as the element buffer of the bound vertex array and upload `bytes` into it.
  unsafe fn upload_element_buffer(
    &mut self,
    buffer: &Self::BufferRepr,
    bytes: &[u8],
    usage: BufferUsage,
  );

  /// Bind a buffer as the current attribute buffer without touching its storage.
  unsafe fn bind_array_buffer(&mut self, buffer: &Self::BufferRepr);

  /// Describe an attribute of the current attribute buffer and enable it.
  unsafe fn set_attrib_pointer(&mut self, pointer: &AttribPointer);

  /// Draw `count` vertices starting at vertex `first`.
  unsafe fn draw_arrays(&mut self, mode: Mode, first: usize, count: usize);

  /// Draw `count` indices read from the element buffer, starting at `byte_offset` bytes.
  unsafe fn draw_elements(
    &mut self,
    mode: Mode,
    count: usize,
    index_type: IndexType,
    byte_offset: usize,
  );

  /// Raw identifier of a buffer, as known by the driver.
  unsafe fn buffer_id(buffer: &Self::BufferRepr) -> u32;

  /// Map a buffer storage in client memory.
  ///
  /// The returned pointer must stay valid until [`VertexArray::unmap_buffer`] is called.
  unsafe fn map_buffer(
    &mut self,
    buffer: &Self::BufferRepr,
    access: MapAccess,
  ) -> Result<*mut u8, VaoError>;

  /// Unmap a buffer previously mapped with [`VertexArray::map_buffer`].
  unsafe fn unmap_buffer(&mut self, buffer: &Self::BufferRepr);
}

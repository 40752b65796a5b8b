//! Vertex array objects.
//!
//! A vertex array object (VAO) bundles one or more attribute buffers and, optionally, an index
//! buffer. This module exposes the [`AbstractVao`] trait, which all kinds of VAOs implement, and
//! three kinds:
//!
//! - [`SimpleVao`]: a single attribute buffer, drawn with consecutive vertices.
//! - [`SimpleIndexVao`]: a single attribute buffer and an index buffer.
//! - [`MultiBufferVao`]: as many attribute buffers as you want, one per attribute for instance.
//!
//! More kinds can be written outside of this crate by composing [`VaoBase`] and [`Buffer`], and
//! registered into a [`VaoFactory`](crate::vao_factory::VaoFactory).
//!
//! # Binding
//!
//! A VAO must be bound before anything is uploaded into it or drawn from it. Binding is done with
//! [`BindVao::bind`], which returns a [`BoundVao`]. All the operations are available on that
//! guard, and dropping it unbinds the VAO:
//!
//! ```ignore
//! let mut vao = SimpleVao::new(backend, Mode::Triangle)?;
//!
//! {
//!   let mut bound = vao.bind(backend);
//!   bound.set_data(VertexData::new(&positions))?;
//!   bound.set_vertex_attribute_pointer(AttribPointer::floats(0, 3, 0, 0))?;
//!   bound.draw()?;
//! } // unbound here
//! ```
//!
//! # Partial draws
//!
//! [`DrawRange`] selects a window of the elements to render. For indexed VAOs, the start element
//! is turned into a byte offset in the index buffer, which depends on the width of the index type
//! (see [`index_byte_offset`]).

pub mod multi_buffer;
pub mod simple;
pub mod simple_index;

pub use self::multi_buffer::MultiBufferVao;
pub use self::simple::SimpleVao;
pub use self::simple_index::SimpleIndexVao;

use crate::backend::vertex_array::VertexArray;
use bytemuck::Pod;
use std::{
  error, fmt,
  ops::{Deref, DerefMut},
  slice,
};

/// Primitive mode.
///
/// Describes how vertices are connected together when drawn.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
  /// A single point per vertex.
  Point,
  /// A line between each pair of vertices.
  Line,
  /// A line between each vertex and the next one.
  LineStrip,
  /// Like [`Mode::LineStrip`], with the last vertex connected back to the first one.
  LineLoop,
  /// A triangle for each triplet of vertices.
  Triangle,
  /// A triangle for each vertex and the two previous ones.
  TriangleStrip,
  /// A triangle for each vertex, the previous one and the first one.
  TriangleFan,
}

/// Hint about how a buffer is going to be updated and used.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BufferUsage {
  /// Uploaded once, drawn many times.
  StaticDraw,
  /// Updated from time to time, drawn many times.
  DynamicDraw,
  /// Updated at nearly every draw.
  StreamDraw,
}

impl Default for BufferUsage {
  fn default() -> Self {
    BufferUsage::StaticDraw
  }
}

/// Type of the elements stored in an index buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IndexType {
  /// 8-bit unsigned integer.
  U8,
  /// 16-bit unsigned integer.
  U16,
  /// 32-bit unsigned integer.
  U32,
}

impl IndexType {
  /// Number of bytes a single index occupies.
  pub fn bytes(self) -> usize {
    match self {
      IndexType::U8 => 1,
      IndexType::U16 => 2,
      IndexType::U32 => 4,
    }
  }

  /// Narrowest index type able to represent `max_index`.
  pub fn fitting(max_index: u32) -> Self {
    if max_index <= u8::MAX as u32 {
      IndexType::U8
    } else if max_index <= u16::MAX as u32 {
      IndexType::U16
    } else {
      IndexType::U32
    }
  }

  /// Largest index representable with this type.
  pub fn max_index(self) -> u32 {
    match self {
      IndexType::U8 => u8::MAX as u32,
      IndexType::U16 => u16::MAX as u32,
      IndexType::U32 => u32::MAX,
    }
  }
}

impl fmt::Display for IndexType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      IndexType::U8 => f.write_str("unsigned byte"),
      IndexType::U16 => f.write_str("unsigned short"),
      IndexType::U32 => f.write_str("unsigned int"),
    }
  }
}

/// Type of the components of a vertex attribute.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AttribType {
  /// 32-bit floating point.
  Float,
  /// 32-bit signed integer.
  Int,
  /// 32-bit unsigned integer.
  UInt,
  /// 16-bit signed integer.
  Short,
  /// 16-bit unsigned integer.
  UShort,
  /// 8-bit signed integer.
  Byte,
  /// 8-bit unsigned integer.
  UByte,
}

impl AttribType {
  /// Number of bytes a single component occupies.
  pub fn bytes(self) -> usize {
    match self {
      AttribType::Float | AttribType::Int | AttribType::UInt => 4,
      AttribType::Short | AttribType::UShort => 2,
      AttribType::Byte | AttribType::UByte => 1,
    }
  }
}

/// Layout of a vertex attribute in the current attribute buffer.
///
/// `stride` and `offset` are expressed in bytes. A `stride` of `0` means tightly packed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AttribPointer {
  /// Attribute location in the shader.
  pub index: u32,
  /// Number of components, in `1..=4`.
  pub size: u8,
  /// Type of the components.
  pub ty: AttribType,
  /// Whether integer components are normalized to `[0, 1]` / `[-1, 1]`.
  pub normalized: bool,
  /// Byte distance between two consecutive attributes.
  pub stride: usize,
  /// Byte offset of the first attribute in the buffer.
  pub offset: usize,
}

impl AttribPointer {
  /// Floating point attribute with `size` components.
  pub fn floats(index: u32, size: u8, stride: usize, offset: usize) -> Self {
    AttribPointer {
      index,
      size,
      ty: AttribType::Float,
      normalized: false,
      stride,
      offset,
    }
  }

  /// Normalize integer components.
  pub fn normalized(self) -> Self {
    AttribPointer {
      normalized: true,
      ..self
    }
  }
}

/// Access requested when mapping a buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MapAccess {
  /// Read only.
  Read,
  /// Write only.
  Write,
  /// Read and write.
  ReadWrite,
}

/// Raw vertex data to upload into an attribute buffer.
///
/// The `size` is the number of elements the data represents. It’s what a full draw renders,
/// unless [`AbstractVao::set_num_indices`] is used afterwards.
#[derive(Clone, Copy, Debug)]
pub struct VertexData<'a> {
  bytes: &'a [u8],
  size: usize,
  usage: BufferUsage,
}

impl<'a> VertexData<'a> {
  /// Vertex data from a slice; the size is the number of items in the slice.
  pub fn new<T>(data: &'a [T]) -> Self
  where
    T: Pod,
  {
    VertexData {
      bytes: bytemuck::cast_slice(data),
      size: data.len(),
      usage: BufferUsage::default(),
    }
  }

  /// Override the number of elements.
  pub fn with_size(self, size: usize) -> Self {
    VertexData { size, ..self }
  }

  /// Override the usage hint.
  pub fn with_usage(self, usage: BufferUsage) -> Self {
    VertexData { usage, ..self }
  }

  /// Raw bytes.
  pub fn bytes(&self) -> &'a [u8] {
    self.bytes
  }

  /// Number of elements.
  pub fn size(&self) -> usize {
    self.size
  }

  /// Usage hint.
  pub fn usage(&self) -> BufferUsage {
    self.usage
  }
}

/// Owned index data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Indices {
  /// 8-bit indices.
  U8(Vec<u8>),
  /// 16-bit indices.
  U16(Vec<u16>),
  /// 32-bit indices.
  U32(Vec<u32>),
}

impl Indices {
  /// Convert indices to the given index type.
  ///
  /// Fails if an index cannot be represented with `index_type`.
  pub fn convert(values: &[u32], index_type: IndexType) -> Result<Self, VaoError> {
    let max = index_type.max_index();

    if let Some(&value) = values.iter().find(|&&v| v > max) {
      return Err(VaoError::IndexOutOfRange { value, index_type });
    }

    let indices = match index_type {
      IndexType::U8 => Indices::U8(values.iter().map(|&v| v as u8).collect()),
      IndexType::U16 => Indices::U16(values.iter().map(|&v| v as u16).collect()),
      IndexType::U32 => Indices::U32(values.to_vec()),
    };

    Ok(indices)
  }

  /// Convert indices to the narrowest index type able to hold all of them.
  pub fn fitting(values: &[u32]) -> Self {
    let max = values.iter().copied().max().unwrap_or(0);

    match IndexType::fitting(max) {
      IndexType::U8 => Indices::U8(values.iter().map(|&v| v as u8).collect()),
      IndexType::U16 => Indices::U16(values.iter().map(|&v| v as u16).collect()),
      IndexType::U32 => Indices::U32(values.to_vec()),
    }
  }

  /// Type of the indices.
  pub fn index_type(&self) -> IndexType {
    match self {
      Indices::U8(_) => IndexType::U8,
      Indices::U16(_) => IndexType::U16,
      Indices::U32(_) => IndexType::U32,
    }
  }

  /// Number of indices.
  pub fn len(&self) -> usize {
    match self {
      Indices::U8(v) => v.len(),
      Indices::U16(v) => v.len(),
      Indices::U32(v) => v.len(),
    }
  }

  /// Whether there is no index at all.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Raw bytes of the indices.
  pub fn as_bytes(&self) -> &[u8] {
    match self {
      Indices::U8(v) => v.as_slice(),
      Indices::U16(v) => bytemuck::cast_slice(v),
      Indices::U32(v) => bytemuck::cast_slice(v),
    }
  }
}

impl From<Vec<u8>> for Indices {
  fn from(v: Vec<u8>) -> Self {
    Indices::U8(v)
  }
}

impl From<Vec<u16>> for Indices {
  fn from(v: Vec<u16>) -> Self {
    Indices::U16(v)
  }
}

impl From<Vec<u32>> for Indices {
  fn from(v: Vec<u32>) -> Self {
    Indices::U32(v)
  }
}

impl<'a> From<&'a [u16]> for Indices {
  fn from(v: &'a [u16]) -> Self {
    Indices::U16(v.to_vec())
  }
}

/// Vertex data along with the indices to draw them with.
///
/// The size of such data is the number of indices.
#[derive(Clone, Debug)]
pub struct IndexVertexData<'a> {
  vertices: VertexData<'a>,
  indices: Indices,
}

impl<'a> IndexVertexData<'a> {
  /// Pair vertices with indices.
  pub fn new(vertices: VertexData<'a>, indices: impl Into<Indices>) -> Self {
    IndexVertexData {
      vertices,
      indices: indices.into(),
    }
  }

  /// Vertex part.
  pub fn vertices(&self) -> &VertexData<'a> {
    &self.vertices
  }

  /// Index part.
  pub fn indices(&self) -> &Indices {
    &self.indices
  }

  /// Number of elements to draw.
  pub fn size(&self) -> usize {
    self.indices.len()
  }
}

/// Anything that can be uploaded with [`AbstractVao::set_data`].
#[derive(Clone, Debug)]
pub enum VaoData<'a> {
  /// Vertex data only.
  Vertices(VertexData<'a>),
  /// Vertex data with indices.
  Indexed(IndexVertexData<'a>),
}

impl<'a> VaoData<'a> {
  /// Human-readable description of the kind of data.
  pub fn kind(&self) -> &'static str {
    match self {
      VaoData::Vertices(_) => "vertex data",
      VaoData::Indexed(_) => "indexed vertex data",
    }
  }
}

impl<'a> From<VertexData<'a>> for VaoData<'a> {
  fn from(data: VertexData<'a>) -> Self {
    VaoData::Vertices(data)
  }
}

impl<'a> From<IndexVertexData<'a>> for VaoData<'a> {
  fn from(data: IndexVertexData<'a>) -> Self {
    VaoData::Indexed(data)
  }
}

/// Window of elements to draw.
///
/// When `count` is `None`, everything from `start` to the end is drawn.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct DrawRange {
  /// First element to draw.
  pub start: usize,
  /// Number of elements to draw.
  pub count: Option<usize>,
}

impl DrawRange {
  /// Draw every element.
  pub fn all() -> Self {
    DrawRange::default()
  }

  /// Draw `count` elements starting at `start`.
  pub fn new(start: usize, count: usize) -> Self {
    DrawRange {
      start,
      count: Some(count),
    }
  }
}

impl From<usize> for DrawRange {
  /// Draw every element starting at `start`.
  fn from(start: usize) -> Self {
    DrawRange { start, count: None }
  }
}

/// Number of elements actually drawn for a given range.
///
/// `0` means nothing is to be drawn. Asking for more elements than available is an error.
pub fn resolve_count(num_indices: usize, range: DrawRange) -> Result<usize, VaoError> {
  match range.count {
    None => Ok(num_indices.saturating_sub(range.start)),

    Some(count) => {
      if range.start.saturating_add(count) > num_indices {
        Err(VaoError::Overflow {
          start: range.start,
          count,
          available: num_indices,
        })
      } else {
        Ok(count)
      }
    }
  }
}

/// Byte offset, in an index buffer, of the `start`-th index.
pub fn index_byte_offset(start: usize, index_type: IndexType) -> usize {
  start * index_type.bytes()
}

/// Errors that might happen when working with VAOs.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VaoError {
  /// The backend failed to create a vertex array or a buffer.
  CannotCreate(String),
  /// The VAO has no data yet.
  NotAllocated,
  /// The kind of data is not supported by that kind of VAO.
  UnsupportedData {
    /// Name of the VAO kind.
    vao: &'static str,
    /// Kind of data that was provided.
    data: &'static str,
  },
  /// That kind of VAO doesn’t support a separate index buffer.
  UnsupportedIndices(&'static str),
  /// No buffer at that slot.
  NoSuchBuffer(usize),
  /// An index doesn’t fit in the chosen index type.
  IndexOutOfRange {
    /// Faulty index.
    value: u32,
    /// Index type it was meant to be stored as.
    index_type: IndexType,
  },
  /// A draw range goes past the number of available elements.
  Overflow {
    /// Requested start.
    start: usize,
    /// Requested count.
    count: usize,
    /// Elements available.
    available: usize,
  },
  /// Mapping a buffer failed.
  MapFailed(u32),
}

impl fmt::Display for VaoError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      VaoError::CannotCreate(ref e) => write!(f, "cannot create vertex array resource: {}", e),
      VaoError::NotAllocated => f.write_str("vertex array not bound or not allocated"),
      VaoError::UnsupportedData { vao, data } => write!(f, "{} doesn’t support {}", vao, data),
      VaoError::UnsupportedIndices(vao) => write!(f, "{} doesn’t support index buffers", vao),
      VaoError::NoSuchBuffer(index) => write!(f, "no buffer at index {}", index),
      VaoError::IndexOutOfRange { value, index_type } => {
        write!(f, "index {} doesn’t fit in {}", value, index_type)
      }
      VaoError::Overflow {
        start,
        count,
        available,
      } => write!(
        f,
        "cannot draw {} elements from {}: only {} available",
        count, start, available
      ),
      VaoError::MapFailed(id) => write!(f, "cannot map buffer {}", id),
    }
  }
}

impl error::Error for VaoError {}

/// A buffer owned by a VAO.
pub struct Buffer<B>
where
  B: ?Sized + VertexArray,
{
  repr: B::BufferRepr,
  len: usize,
}

impl<B> Buffer<B>
where
  B: ?Sized + VertexArray,
{
  /// Create a buffer without storage.
  pub fn empty(backend: &mut B) -> Result<Self, VaoError> {
    let repr = unsafe { backend.new_buffer()? };
    Ok(Buffer { repr, len: 0 })
  }

  /// Create an attribute buffer holding `data`. The VAO it belongs to must be bound.
  pub fn new_array(backend: &mut B, data: &VertexData) -> Result<Self, VaoError> {
    let mut buffer = Self::empty(backend)?;
    buffer.upload_array(backend, data);
    Ok(buffer)
  }

  /// Create an index buffer holding `indices`. The VAO it belongs to must be bound.
  pub fn new_element(backend: &mut B, indices: &Indices, usage: BufferUsage) -> Result<Self, VaoError> {
    let mut buffer = Self::empty(backend)?;
    buffer.upload_element(backend, indices, usage);
    Ok(buffer)
  }

  /// Replace the content of the buffer and leave it bound as the current attribute buffer.
  pub fn upload_array(&mut self, backend: &mut B, data: &VertexData) {
    unsafe { backend.upload_array_buffer(&self.repr, data.bytes(), data.usage()) };
    self.len = data.bytes().len();
  }

  /// Replace the content of the buffer with indices.
  pub fn upload_element(&mut self, backend: &mut B, indices: &Indices, usage: BufferUsage) {
    unsafe { backend.upload_element_buffer(&self.repr, indices.as_bytes(), usage) };
    self.len = indices.as_bytes().len();
  }

  /// Make this buffer the current attribute buffer.
  pub fn bind(&self, backend: &mut B) {
    unsafe { backend.bind_array_buffer(&self.repr) };
  }

  /// Driver identifier of the buffer.
  pub fn id(&self) -> u32 {
    unsafe { B::buffer_id(&self.repr) }
  }

  /// Size of the storage in bytes.
  pub fn len(&self) -> usize {
    self.len
  }

  /// Whether the buffer has no storage.
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Map the buffer storage.
  pub fn map<'a>(
    &'a self,
    backend: &'a mut B,
    access: MapAccess,
  ) -> Result<BufferMapping<'a, B>, VaoError> {
    if self.len == 0 {
      return Err(VaoError::MapFailed(self.id()));
    }

    let ptr = unsafe { backend.map_buffer(&self.repr, access)? };

    Ok(BufferMapping {
      backend,
      buffer: &self.repr,
      ptr,
      len: self.len,
    })
  }
}

/// A mapped buffer.
///
/// The mapping is released when this object is dropped. Writing through a mapping obtained with
/// [`MapAccess::Read`] has no effect on the GPU storage.
pub struct BufferMapping<'a, B>
where
  B: ?Sized + VertexArray,
{
  backend: &'a mut B,
  buffer: &'a B::BufferRepr,
  ptr: *mut u8,
  len: usize,
}

impl<'a, B> Drop for BufferMapping<'a, B>
where
  B: ?Sized + VertexArray,
{
  fn drop(&mut self) {
    unsafe { self.backend.unmap_buffer(self.buffer) };
  }
}

impl<'a, B> Deref for BufferMapping<'a, B>
where
  B: ?Sized + VertexArray,
{
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    unsafe { slice::from_raw_parts(self.ptr, self.len) }
  }
}

impl<'a, B> DerefMut for BufferMapping<'a, B>
where
  B: ?Sized + VertexArray,
{
  fn deref_mut(&mut self) -> &mut Self::Target {
    unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }
  }
}

/// State every kind of VAO carries: the vertex array itself, its mode, its number of elements and
/// whether it has data.
pub struct VaoBase<B>
where
  B: ?Sized + VertexArray,
{
  repr: B::VertexArrayRepr,
  mode: Mode,
  num_indices: usize,
  allocated: bool,
}

impl<B> VaoBase<B>
where
  B: ?Sized + VertexArray,
{
  /// Create the vertex array.
  pub fn new(backend: &mut B, mode: Mode) -> Result<Self, VaoError> {
    let repr = unsafe { backend.new_vertex_array()? };

    Ok(VaoBase {
      repr,
      mode,
      num_indices: 0,
      allocated: false,
    })
  }

  /// Backend vertex array.
  pub fn repr(&self) -> &B::VertexArrayRepr {
    &self.repr
  }

  /// Primitive mode.
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// Change the primitive mode.
  pub fn set_mode(&mut self, mode: Mode) {
    self.mode = mode;
  }

  /// Number of elements drawn by a full draw.
  pub fn num_indices(&self) -> usize {
    self.num_indices
  }

  /// Change the number of elements drawn by a full draw.
  pub fn set_num_indices(&mut self, num_indices: usize) {
    self.num_indices = num_indices;
  }

  /// Whether data was uploaded.
  pub fn is_allocated(&self) -> bool {
    self.allocated
  }

  /// Mark the VAO as having data, or not.
  pub fn set_allocated(&mut self, allocated: bool) {
    self.allocated = allocated;
  }

  /// Fail with [`VaoError::NotAllocated`], logged as an error, when no data was uploaded yet.
  pub fn check_allocated(&self) -> Result<(), VaoError> {
    if self.allocated {
      Ok(())
    } else {
      log::error!("vertex array not bound or not allocated");
      Err(VaoError::NotAllocated)
    }
  }

  fn checked_count(&self, range: DrawRange) -> Result<usize, VaoError> {
    self.check_allocated()?;
    resolve_count(self.num_indices, range)
  }

  /// Draw consecutive vertices.
  pub fn draw_arrays(&self, backend: &mut B, range: DrawRange) -> Result<(), VaoError> {
    let count = self.checked_count(range)?;

    if count > 0 {
      unsafe { backend.draw_arrays(self.mode, range.start, count) };
    }

    Ok(())
  }

  /// Draw indexed vertices from the element buffer.
  pub fn draw_elements(
    &self,
    backend: &mut B,
    range: DrawRange,
    index_type: IndexType,
  ) -> Result<(), VaoError> {
    let count = self.checked_count(range)?;

    if count > 0 {
      let offset = index_byte_offset(range.start, index_type);
      unsafe { backend.draw_elements(self.mode, count, index_type, offset) };
    }

    Ok(())
  }
}

/// Interface every kind of VAO implements.
///
/// Methods taking a backend expect the VAO to be bound; use them through [`BoundVao`].
pub trait AbstractVao<B>
where
  B: ?Sized + VertexArray,
{
  /// Name of this kind of VAO, as registered in factories.
  fn name(&self) -> &'static str;

  /// Shared VAO state.
  fn base(&self) -> &VaoBase<B>;

  /// Shared VAO state.
  fn base_mut(&mut self) -> &mut VaoBase<B>;

  /// Upload data.
  ///
  /// `buffer` selects the buffer slot to write to for kinds supporting several buffers; `None`
  /// lets the VAO pick.
  fn set_data(
    &mut self,
    backend: &mut B,
    data: VaoData,
    buffer: Option<usize>,
  ) -> Result<(), VaoError>;

  /// Upload indices into a separate index buffer.
  fn set_indices(&mut self, backend: &mut B, indices: Indices) -> Result<(), VaoError> {
    let _ = (backend, indices);
    Err(VaoError::UnsupportedIndices(self.name()))
  }

  /// Describe an attribute of the last uploaded buffer.
  fn set_vertex_attribute_pointer(
    &mut self,
    backend: &mut B,
    pointer: AttribPointer,
  ) -> Result<(), VaoError> {
    unsafe { backend.set_attrib_pointer(&pointer) };
    Ok(())
  }

  /// Draw a range of elements.
  fn draw(&self, backend: &mut B, range: DrawRange) -> Result<(), VaoError>;

  /// Buffer at a given slot.
  fn buffer(&self, index: usize) -> Option<&Buffer<B>>;

  /// Release all the buffers; the VAO can be filled again afterwards.
  fn remove(&mut self, backend: &mut B);

  /// Primitive mode.
  fn mode(&self) -> Mode {
    self.base().mode()
  }

  /// Change the primitive mode.
  fn set_mode(&mut self, mode: Mode) {
    self.base_mut().set_mode(mode)
  }

  /// Backend vertex array.
  fn vertex_array<'a>(&'a self) -> &'a B::VertexArrayRepr
  where
    B: 'a,
  {
    self.base().repr()
  }

  /// Number of elements drawn by a full draw.
  fn num_indices(&self) -> usize {
    self.base().num_indices()
  }

  /// Change the number of elements drawn by a full draw.
  fn set_num_indices(&mut self, num_indices: usize) {
    self.base_mut().set_num_indices(num_indices)
  }

  /// Whether data was uploaded.
  fn is_allocated(&self) -> bool {
    self.base().is_allocated()
  }

  /// Driver identifier of the buffer at a given slot.
  fn buffer_id(&self, index: usize) -> Option<u32> {
    self.buffer(index).map(Buffer::id)
  }
}

/// Bind VAOs.
///
/// This is implemented for every [`AbstractVao`], trait objects included.
pub trait BindVao<B>
where
  B: ?Sized + VertexArray,
{
  /// Bind the VAO until the returned guard is dropped.
  fn bind<'a>(&'a mut self, backend: &'a mut B) -> BoundVao<'a, B, Self>
  where
    Self: AbstractVao<B>;
}

impl<B, V> BindVao<B> for V
where
  B: ?Sized + VertexArray,
  V: ?Sized + AbstractVao<B>,
{
  fn bind<'a>(&'a mut self, backend: &'a mut B) -> BoundVao<'a, B, Self> {
    unsafe { backend.bind_vertex_array(self.vertex_array()) };
    BoundVao { vao: self, backend }
  }
}

/// A bound VAO.
///
/// The VAO is unbound when this object is dropped.
pub struct BoundVao<'a, B, V>
where
  B: ?Sized + VertexArray,
  V: ?Sized + AbstractVao<B>,
{
  vao: &'a mut V,
  backend: &'a mut B,
}

impl<'a, B, V> BoundVao<'a, B, V>
where
  B: ?Sized + VertexArray,
  V: ?Sized + AbstractVao<B>,
{
  /// Upload data, letting the VAO pick the buffer slot.
  pub fn set_data<'d>(&mut self, data: impl Into<VaoData<'d>>) -> Result<(), VaoError> {
    self.vao.set_data(self.backend, data.into(), None)
  }

  /// Upload data into a given buffer slot.
  pub fn set_data_at<'d>(
    &mut self,
    index: usize,
    data: impl Into<VaoData<'d>>,
  ) -> Result<(), VaoError> {
    self.vao.set_data(self.backend, data.into(), Some(index))
  }

  /// Upload indices into a separate index buffer.
  pub fn set_indices(&mut self, indices: impl Into<Indices>) -> Result<(), VaoError> {
    self.vao.set_indices(self.backend, indices.into())
  }

  /// Describe an attribute of the last uploaded buffer.
  pub fn set_vertex_attribute_pointer(&mut self, pointer: AttribPointer) -> Result<(), VaoError> {
    self.vao.set_vertex_attribute_pointer(self.backend, pointer)
  }

  /// Change the number of elements drawn by a full draw.
  pub fn set_num_indices(&mut self, num_indices: usize) {
    self.vao.set_num_indices(num_indices)
  }

  /// Number of elements drawn by a full draw.
  pub fn num_indices(&self) -> usize {
    self.vao.num_indices()
  }

  /// Change the primitive mode.
  pub fn set_mode(&mut self, mode: Mode) {
    self.vao.set_mode(mode)
  }

  /// Draw every element.
  pub fn draw(&mut self) -> Result<(), VaoError> {
    self.vao.draw(self.backend, DrawRange::all())
  }

  /// Draw a range of elements.
  pub fn draw_range(&mut self, range: DrawRange) -> Result<(), VaoError> {
    self.vao.draw(self.backend, range)
  }

  /// Map the buffer at a given slot.
  pub fn map_buffer(
    &mut self,
    index: usize,
    access: MapAccess,
  ) -> Result<BufferMapping<'_, B>, VaoError> {
    let buffer = self.vao.buffer(index).ok_or(VaoError::NoSuchBuffer(index))?;
    buffer.map(self.backend, access)
  }

  /// Release all the buffers.
  pub fn remove(&mut self) {
    self.vao.remove(self.backend)
  }

  /// The bound VAO.
  pub fn vao(&self) -> &V {
    self.vao
  }
}

impl<'a, B, V> Drop for BoundVao<'a, B, V>
where
  B: ?Sized + VertexArray,
  V: ?Sized + AbstractVao<B>,
{
  fn drop(&mut self) {
    unsafe { self.backend.unbind_vertex_array() };
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::{Call, MockBackend};

  #[test]
  fn index_type_widths() {
    assert_eq!(IndexType::U8.bytes(), 1);
    assert_eq!(IndexType::U16.bytes(), 2);
    assert_eq!(IndexType::U32.bytes(), 4);
  }

  #[test]
  fn fitting_index_type() {
    assert_eq!(IndexType::fitting(0), IndexType::U8);
    assert_eq!(IndexType::fitting(255), IndexType::U8);
    assert_eq!(IndexType::fitting(256), IndexType::U16);
    assert_eq!(IndexType::fitting(65535), IndexType::U16);
    assert_eq!(IndexType::fitting(65536), IndexType::U32);
  }

  #[test]
  fn converting_indices_checks_range() {
    let indices = Indices::convert(&[0, 1, 300], IndexType::U16).unwrap();
    assert_eq!(indices, Indices::U16(vec![0, 1, 300]));
    assert_eq!(indices.as_bytes().len(), 6);

    assert_eq!(
      Indices::convert(&[0, 1, 300], IndexType::U8),
      Err(VaoError::IndexOutOfRange {
        value: 300,
        index_type: IndexType::U8
      })
    );
  }

  #[test]
  fn fitting_indices() {
    assert_eq!(Indices::fitting(&[0, 4, 2]).index_type(), IndexType::U8);
    assert_eq!(Indices::fitting(&[0, 70000]).index_type(), IndexType::U32);
    assert!(Indices::fitting(&[]).is_empty());
  }

  #[test]
  fn resolving_counts() {
    assert_eq!(resolve_count(60, DrawRange::all()), Ok(60));
    assert_eq!(resolve_count(60, DrawRange::from(12)), Ok(48));
    assert_eq!(resolve_count(60, DrawRange::from(80)), Ok(0));
    assert_eq!(resolve_count(60, DrawRange::new(57, 3)), Ok(3));
    assert_eq!(
      resolve_count(60, DrawRange::new(58, 3)),
      Err(VaoError::Overflow {
        start: 58,
        count: 3,
        available: 60
      })
    );
  }

  #[test]
  fn byte_offsets_follow_index_width() {
    assert_eq!(index_byte_offset(9, IndexType::U8), 9);
    assert_eq!(index_byte_offset(9, IndexType::U16), 18);
    assert_eq!(index_byte_offset(9, IndexType::U32), 36);
  }

  #[test]
  fn vertex_data_size_defaults_to_item_count() {
    let positions = [[0f32; 3]; 5];
    let data = VertexData::new(&positions);

    assert_eq!(data.size(), 5);
    assert_eq!(data.bytes().len(), 60);
    assert_eq!(data.with_size(2).size(), 2);
  }

  #[test]
  fn binding_is_scoped() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleVao::new(&mut backend, Mode::Triangle).unwrap();
    let id = backend.last_id();

    {
      let _bound = vao.bind(&mut backend);
    }

    assert_eq!(
      &backend.calls[backend.calls.len() - 2..],
      &[Call::BindVertexArray(id), Call::UnbindVertexArray]
    );
  }

  #[test]
  fn mapping_a_buffer() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleVao::new(&mut backend, Mode::Point).unwrap();
    let mut bound = vao.bind(&mut backend);

    bound.set_data(VertexData::new(&[1u8, 2, 3, 4])).unwrap();

    {
      let mut mapping = bound.map_buffer(0, MapAccess::ReadWrite).unwrap();
      assert_eq!(&mapping[..], &[1, 2, 3, 4]);
      mapping[0] = 42;
    }

    assert_eq!(
      bound.map_buffer(1, MapAccess::Read).err(),
      Some(VaoError::NoSuchBuffer(1))
    );

    let mapping = bound.map_buffer(0, MapAccess::Read).unwrap();
    assert_eq!(mapping[0], 42);
  }
}

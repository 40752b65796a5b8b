//! VAO with several attribute buffers.

use crate::backend::vertex_array::VertexArray;
use crate::vao::{AbstractVao, Buffer, DrawRange, Mode, VaoBase, VaoData, VaoError, VertexData};

/// A VAO holding any number of attribute buffers.
///
/// Buffers live in slots. Uploading without a slot appends a new buffer; uploading to a slot past
/// the end grows the slot list with empty buffers. The size of the data uploaded into slot `0`
/// sets the number of elements to draw.
pub struct MultiBufferVao<B>
where
  B: ?Sized + VertexArray,
{
  base: VaoBase<B>,
  buffers: Vec<Buffer<B>>,
}

impl<B> MultiBufferVao<B>
where
  B: ?Sized + VertexArray,
{
  /// Name this kind of VAO is registered with.
  pub const NAME: &'static str = "multiBufferVAO";

  /// Create an empty VAO.
  pub fn new(backend: &mut B, mode: Mode) -> Result<Self, VaoError> {
    VaoBase::new(backend, mode).map(|base| MultiBufferVao {
      base,
      buffers: Vec::new(),
    })
  }

  /// Number of buffer slots.
  pub fn buffer_count(&self) -> usize {
    self.buffers.len()
  }
}

/// Upload vertex data into a slot of a buffer list, appending when `index` is `None` and growing
/// the list when `index` is past its end.
///
/// Returns the slot the data was uploaded into.
pub fn upload_into_slot<B>(
  backend: &mut B,
  buffers: &mut Vec<Buffer<B>>,
  data: &VertexData,
  index: Option<usize>,
) -> Result<usize, VaoError>
where
  B: ?Sized + VertexArray,
{
  let index = index.unwrap_or_else(|| buffers.len());

  while buffers.len() < index {
    buffers.push(Buffer::empty(backend)?);
  }

  if let Some(buffer) = buffers.get_mut(index) {
    buffer.upload_array(backend, data);
  } else {
    buffers.push(Buffer::new_array(backend, data)?);
  }

  Ok(index)
}

impl<B> AbstractVao<B> for MultiBufferVao<B>
where
  B: ?Sized + VertexArray,
{
  fn name(&self) -> &'static str {
    Self::NAME
  }

  fn base(&self) -> &VaoBase<B> {
    &self.base
  }

  fn base_mut(&mut self) -> &mut VaoBase<B> {
    &mut self.base
  }

  fn set_data(
    &mut self,
    backend: &mut B,
    data: VaoData,
    buffer: Option<usize>,
  ) -> Result<(), VaoError> {
    let data = match data {
      VaoData::Vertices(data) => data,
      other => {
        return Err(VaoError::UnsupportedData {
          vao: Self::NAME,
          data: other.kind(),
        })
      }
    };

    let index = upload_into_slot(backend, &mut self.buffers, &data, buffer)?;

    if index == 0 {
      self.base.set_num_indices(data.size());
    }

    self.base.set_allocated(true);

    Ok(())
  }

  fn draw(&self, backend: &mut B, range: DrawRange) -> Result<(), VaoError> {
    self.base.draw_arrays(backend, range)
  }

  fn buffer(&self, index: usize) -> Option<&Buffer<B>> {
    self.buffers.get(index)
  }

  fn remove(&mut self, _: &mut B) {
    self.buffers.clear();
    self.base.set_num_indices(0);
    self.base.set_allocated(false);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::{Call, MockBackend};
  use crate::vao::{AttribPointer, BindVao};

  const VERTS: [[f32; 3]; 3] = [[0., 1., 1.], [0., 0., -1.], [-0.5, 0., 1.]];
  const NORMALS: [[f32; 3]; 3] = [[0., 1., 0.]; 3];

  #[test]
  fn appending_buffers() {
    let mut backend = MockBackend::new();
    let mut vao = MultiBufferVao::new(&mut backend, Mode::Triangle).unwrap();

    {
      let mut bound = vao.bind(&mut backend);
      bound.set_data(VertexData::new(&VERTS)).unwrap();
      bound
        .set_vertex_attribute_pointer(AttribPointer::floats(0, 3, 0, 0))
        .unwrap();
      bound.set_data(VertexData::new(&NORMALS)).unwrap();
      bound
        .set_vertex_attribute_pointer(AttribPointer::floats(1, 3, 0, 0))
        .unwrap();
      bound.draw().unwrap();
    }

    assert_eq!(vao.buffer_count(), 2);
    assert_eq!(vao.num_indices(), 3);
    assert_ne!(vao.buffer_id(0), vao.buffer_id(1));

    // each attribute pointer follows the upload of its own buffer
    let normals = vao.buffer_id(1).unwrap();
    let upload = backend
      .calls
      .iter()
      .position(|c| *c == Call::UploadArray { buffer: normals, len: 36 })
      .unwrap();
    assert_eq!(
      backend.calls[upload + 1],
      Call::AttribPointer(AttribPointer::floats(1, 3, 0, 0))
    );
  }

  #[test]
  fn writing_past_the_end_grows_slots() {
    let mut backend = MockBackend::new();
    let mut vao = MultiBufferVao::new(&mut backend, Mode::Point).unwrap();

    vao
      .bind(&mut backend)
      .set_data_at(2, VertexData::new(&VERTS))
      .unwrap();

    assert_eq!(vao.buffer_count(), 3);
    assert_eq!(vao.buffer(0).map(Buffer::len), Some(0));
    assert_eq!(vao.buffer(2).map(Buffer::len), Some(36));
    // only slot 0 sets the element count
    assert_eq!(vao.num_indices(), 0);
  }

  #[test]
  fn overwriting_a_slot() {
    let mut backend = MockBackend::new();
    let mut vao = MultiBufferVao::new(&mut backend, Mode::Line).unwrap();

    {
      let mut bound = vao.bind(&mut backend);
      bound.set_data(VertexData::new(&VERTS)).unwrap();
      bound.set_data_at(0, VertexData::new(&VERTS[..1])).unwrap();
    }

    assert_eq!(vao.buffer_count(), 1);
    assert_eq!(vao.num_indices(), 1);
  }
}

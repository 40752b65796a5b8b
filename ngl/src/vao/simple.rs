//! VAO with a single attribute buffer.

use crate::backend::vertex_array::VertexArray;
use crate::vao::{AbstractVao, Buffer, DrawRange, Mode, VaoBase, VaoData, VaoError};

/// A VAO holding a single attribute buffer.
///
/// Every attribute lives in that buffer, either packed one after the other or interleaved. Vertices
/// are drawn in order.
pub struct SimpleVao<B>
where
  B: ?Sized + VertexArray,
{
  base: VaoBase<B>,
  buffer: Option<Buffer<B>>,
}

impl<B> SimpleVao<B>
where
  B: ?Sized + VertexArray,
{
  /// Name this kind of VAO is registered with.
  pub const NAME: &'static str = "simpleVAO";

  /// Create an empty VAO.
  pub fn new(backend: &mut B, mode: Mode) -> Result<Self, VaoError> {
    VaoBase::new(backend, mode).map(|base| SimpleVao { base, buffer: None })
  }
}

impl<B> AbstractVao<B> for SimpleVao<B>
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

    match buffer {
      Some(index) if index != 0 => return Err(VaoError::NoSuchBuffer(index)),
      _ => (),
    }

    match self.buffer {
      Some(ref mut buffer) => buffer.upload_array(backend, &data),
      None => self.buffer = Some(Buffer::new_array(backend, &data)?),
    }

    self.base.set_num_indices(data.size());
    self.base.set_allocated(true);

    Ok(())
  }

  fn draw(&self, backend: &mut B, range: DrawRange) -> Result<(), VaoError> {
    self.base.draw_arrays(backend, range)
  }

  fn buffer(&self, index: usize) -> Option<&Buffer<B>> {
    if index == 0 {
      self.buffer.as_ref()
    } else {
      None
    }
  }

  fn remove(&mut self, _: &mut B) {
    self.buffer = None;
    self.base.set_num_indices(0);
    self.base.set_allocated(false);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::{Call, MockBackend};
  use crate::vao::{AttribPointer, BindVao, IndexVertexData, VertexData};

  const BOID: [[f32; 3]; 3] = [[0., 1., 1.], [0., 0., -1.], [-0.5, 0., 1.]];

  #[test]
  fn drawing_unallocated_fails() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleVao::new(&mut backend, Mode::Triangle).unwrap();

    assert_eq!(vao.bind(&mut backend).draw(), Err(VaoError::NotAllocated));
    assert!(!backend.drew());
  }

  #[test]
  fn data_sets_the_number_of_indices() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleVao::new(&mut backend, Mode::Triangle).unwrap();

    {
      let mut bound = vao.bind(&mut backend);
      bound.set_data(VertexData::new(&BOID)).unwrap();
      bound
        .set_vertex_attribute_pointer(AttribPointer::floats(0, 3, 0, 0))
        .unwrap();
      bound.draw().unwrap();
    }

    assert_eq!(vao.num_indices(), 3);
    assert!(backend.calls.contains(&Call::DrawArrays {
      mode: Mode::Triangle,
      first: 0,
      count: 3
    }));
  }

  #[test]
  fn reuploading_keeps_the_buffer() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleVao::new(&mut backend, Mode::Line).unwrap();

    {
      let mut bound = vao.bind(&mut backend);
      bound.set_data(VertexData::new(&BOID)).unwrap();
      bound.set_data(VertexData::new(&BOID[..2])).unwrap();
    }

    let id = vao.buffer_id(0).unwrap();
    let uploads: Vec<_> = backend
      .calls
      .iter()
      .filter(|c| matches!(c, Call::UploadArray { .. }))
      .collect();

    assert_eq!(
      uploads,
      vec![
        &Call::UploadArray { buffer: id, len: 36 },
        &Call::UploadArray { buffer: id, len: 24 }
      ]
    );
    assert_eq!(vao.num_indices(), 2);
  }

  #[test]
  fn rejects_indexed_data_and_extra_slots() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleVao::new(&mut backend, Mode::Triangle).unwrap();
    let mut bound = vao.bind(&mut backend);

    let indexed = IndexVertexData::new(VertexData::new(&BOID), vec![0u16, 1, 2]);
    assert_eq!(
      bound.set_data(indexed),
      Err(VaoError::UnsupportedData {
        vao: "simpleVAO",
        data: "indexed vertex data"
      })
    );
    assert_eq!(
      bound.set_data_at(1, VertexData::new(&BOID)),
      Err(VaoError::NoSuchBuffer(1))
    );
    assert_eq!(
      bound.set_indices(vec![0u8, 1, 2]),
      Err(VaoError::UnsupportedIndices("simpleVAO"))
    );
  }

  #[test]
  fn removing_deallocates() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleVao::new(&mut backend, Mode::Triangle).unwrap();

    {
      let mut bound = vao.bind(&mut backend);
      bound.set_data(VertexData::new(&BOID)).unwrap();
      bound.remove();
      assert_eq!(bound.draw(), Err(VaoError::NotAllocated));
    }

    assert_eq!(vao.buffer_id(0), None);
  }
}

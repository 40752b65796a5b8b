//! VAO with a single attribute buffer and an index buffer.

use crate::backend::vertex_array::VertexArray;
use crate::vao::{
  AbstractVao, Buffer, DrawRange, IndexType, Mode, VaoBase, VaoData, VaoError,
};

/// A VAO holding a single attribute buffer and the indices to draw it with.
pub struct SimpleIndexVao<B>
where
  B: ?Sized + VertexArray,
{
  base: VaoBase<B>,
  vertices: Option<Buffer<B>>,
  indices: Option<(Buffer<B>, IndexType)>,
}

impl<B> SimpleIndexVao<B>
where
  B: ?Sized + VertexArray,
{
  /// Name this kind of VAO is registered with.
  pub const NAME: &'static str = "simpleIndexVAO";

  /// Create an empty VAO.
  pub fn new(backend: &mut B, mode: Mode) -> Result<Self, VaoError> {
    VaoBase::new(backend, mode).map(|base| SimpleIndexVao {
      base,
      vertices: None,
      indices: None,
    })
  }

  /// Type of the uploaded indices, if any.
  pub fn index_type(&self) -> Option<IndexType> {
    self.indices.as_ref().map(|(_, ty)| *ty)
  }
}

impl<B> AbstractVao<B> for SimpleIndexVao<B>
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
      VaoData::Indexed(data) => data,
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

    let usage = data.vertices().usage();

    // the index buffer is uploaded last so that the vertex buffer stays the current attribute
    // buffer for the attribute pointers to come
    match self.vertices {
      Some(ref mut buffer) => buffer.upload_array(backend, data.vertices()),
      None => self.vertices = Some(Buffer::new_array(backend, data.vertices())?),
    }

    let index_type = data.indices().index_type();
    match self.indices {
      Some((ref mut buffer, ref mut ty)) => {
        buffer.upload_element(backend, data.indices(), usage);
        *ty = index_type;
      }

      None => {
        let buffer = Buffer::new_element(backend, data.indices(), usage)?;
        self.indices = Some((buffer, index_type));
      }
    }

    self.base.set_num_indices(data.size());
    self.base.set_allocated(true);

    Ok(())
  }

  fn draw(&self, backend: &mut B, range: DrawRange) -> Result<(), VaoError> {
    self.base.check_allocated()?;

    let index_type = self.index_type().ok_or(VaoError::NotAllocated)?;
    self.base.draw_elements(backend, range, index_type)
  }

  fn buffer(&self, index: usize) -> Option<&Buffer<B>> {
    if index == 0 {
      self.vertices.as_ref()
    } else {
      None
    }
  }

  fn remove(&mut self, _: &mut B) {
    self.vertices = None;
    self.indices = None;
    self.base.set_num_indices(0);
    self.base.set_allocated(false);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::{Call, MockBackend};
  use crate::vao::{BindVao, IndexVertexData, Indices, VertexData};

  // interleaved position and color
  const QUAD: [[f32; 6]; 4] = [
    [-1., 0., -1., 1., 0., 0.],
    [1., 0., -1., 0., 1., 0.],
    [1., 0., 1., 0., 0., 1.],
    [-1., 0., 1., 1., 1., 1.],
  ];

  #[test]
  fn indexed_draw_uses_index_count() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleIndexVao::new(&mut backend, Mode::Triangle).unwrap();

    {
      let mut bound = vao.bind(&mut backend);
      let data = IndexVertexData::new(VertexData::new(&QUAD), vec![0u16, 1, 2, 0, 2, 3]);
      bound.set_data(data).unwrap();
      bound.draw().unwrap();
    }

    assert_eq!(vao.num_indices(), 6);
    assert_eq!(vao.index_type(), Some(IndexType::U16));
    assert!(backend.calls.contains(&Call::DrawElements {
      mode: Mode::Triangle,
      count: 6,
      index_type: IndexType::U16,
      offset: 0
    }));
  }

  #[test]
  fn partial_draw_offsets_by_index_width() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleIndexVao::new(&mut backend, Mode::Triangle).unwrap();
    let mut bound = vao.bind(&mut backend);
    let indices = Indices::convert(&[0, 1, 2, 0, 2, 3], IndexType::U32).unwrap();

    bound
      .set_data(IndexVertexData::new(VertexData::new(&QUAD), indices))
      .unwrap();
    bound.draw_range(DrawRange::from(3)).unwrap();
    drop(bound);

    assert_eq!(
      backend.calls.last(),
      Some(&Call::UnbindVertexArray)
    );
    assert!(backend.calls.contains(&Call::DrawElements {
      mode: Mode::Triangle,
      count: 3,
      index_type: IndexType::U32,
      offset: 12
    }));
  }

  #[test]
  fn unallocated_draws() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleIndexVao::new(&mut backend, Mode::Triangle).unwrap();

    assert!(vao.base().check_allocated().is_err());
    assert_eq!(vao.bind(&mut backend).draw(), Err(VaoError::NotAllocated));
    assert!(!backend.drew());
  }

  #[test]
  fn plain_vertices_are_rejected() {
    let mut backend = MockBackend::new();
    let mut vao = SimpleIndexVao::new(&mut backend, Mode::Triangle).unwrap();

    let r = vao.bind(&mut backend).set_data(VertexData::new(&QUAD));
    assert_eq!(
      r,
      Err(VaoError::UnsupportedData {
        vao: "simpleIndexVAO",
        data: "vertex data"
      })
    );
  }
}

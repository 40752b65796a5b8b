//! A VAO kind living outside of ngl: several attribute buffers drawn through one index buffer.
//!
//! It plugs into a [`VaoFactory`](ngl::vao_factory::VaoFactory) with [`creator`].

use ngl::{
  backend::vertex_array::VertexArray,
  vao::{
    multi_buffer::upload_into_slot, AbstractVao, Buffer, BufferUsage, DrawRange, IndexType,
    Indices, Mode, VaoBase, VaoData, VaoError,
  },
};

/// Attribute buffers in slots, like [`MultiBufferVao`](ngl::vao::MultiBufferVao), plus the
/// indices set with [`AbstractVao::set_indices`].
///
/// The number of elements to draw is the number of indices; uploading vertex data leaves it
/// alone.
pub struct MultiBufferIndexVao<B>
where
  B: ?Sized + VertexArray,
{
  base: VaoBase<B>,
  buffers: Vec<Buffer<B>>,
  indices: Option<(Buffer<B>, IndexType)>,
}

impl<B> MultiBufferIndexVao<B>
where
  B: ?Sized + VertexArray,
{
  pub const NAME: &'static str = "multiBufferIndexVAO";

  pub fn new(backend: &mut B, mode: Mode) -> Result<Self, VaoError> {
    VaoBase::new(backend, mode).map(|base| MultiBufferIndexVao {
      base,
      buffers: Vec::new(),
      indices: None,
    })
  }

  /// Number of attribute buffer slots.
  pub fn buffer_count(&self) -> usize {
    self.buffers.len()
  }

  /// Type of the uploaded indices, if any.
  pub fn index_type(&self) -> Option<IndexType> {
    self.indices.as_ref().map(|(_, ty)| *ty)
  }
}

/// Creator to register in a factory under [`MultiBufferIndexVao::NAME`].
pub fn creator<B>(backend: &mut B, mode: Mode) -> Result<Box<dyn AbstractVao<B>>, VaoError>
where
  B: 'static + ?Sized + VertexArray,
{
  MultiBufferIndexVao::new(backend, mode).map(|vao| Box::new(vao) as Box<dyn AbstractVao<B>>)
}

impl<B> AbstractVao<B> for MultiBufferIndexVao<B>
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
    log::debug!(
      "{}: uploaded {} bytes into slot {}",
      Self::NAME,
      data.bytes().len(),
      index
    );

    self.base.set_allocated(true);

    Ok(())
  }

  fn set_indices(&mut self, backend: &mut B, indices: Indices) -> Result<(), VaoError> {
    let index_type = indices.index_type();

    match self.indices {
      Some((ref mut buffer, ref mut ty)) => {
        buffer.upload_element(backend, &indices, BufferUsage::StaticDraw);
        *ty = index_type;
      }

      None => {
        let buffer = Buffer::new_element(backend, &indices, BufferUsage::StaticDraw)?;
        self.indices = Some((buffer, index_type));
      }
    }

    self.base.set_num_indices(indices.len());

    Ok(())
  }

  fn draw(&self, backend: &mut B, range: DrawRange) -> Result<(), VaoError> {
    let index_type = self.index_type().ok_or_else(|| {
      log::error!("{} drawn without indices", Self::NAME);
      VaoError::NotAllocated
    })?;

    self.base.draw_elements(backend, range, index_type)
  }

  fn buffer(&self, index: usize) -> Option<&Buffer<B>> {
    self.buffers.get(index)
  }

  fn remove(&mut self, _: &mut B) {
    self.buffers.clear();
    self.indices = None;
    self.base.set_num_indices(0);
    self.base.set_allocated(false);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Backend;
  use ngl::{
    backend::mock::{Call, MockBackend},
    mesh::icosahedron_indexed,
    vao::{BindVao, IndexVertexData, VertexData},
    vao_factory::VaoFactory,
  };

  const COLOURS: [[f32; 3]; 12] = [[1., 0., 0.]; 12];

  fn icosahedron(backend: &mut MockBackend) -> MultiBufferIndexVao<MockBackend> {
    let (positions, indices) = icosahedron_indexed();
    let mut vao = MultiBufferIndexVao::new(backend, Mode::Triangle).unwrap();

    {
      let mut bound = vao.bind(backend);
      bound.set_data_at(0, VertexData::new(positions)).unwrap();
      bound.set_data_at(1, VertexData::new(&COLOURS)).unwrap();
      bound.set_indices(indices).unwrap();
    }

    vao
  }

  fn draws(backend: &MockBackend) -> Vec<(usize, usize)> {
    backend
      .calls
      .iter()
      .filter_map(|call| match *call {
        Call::DrawElements { count, offset, .. } => Some((count, offset)),
        _ => None,
      })
      .collect()
  }

  #[test]
  fn registering() {
    let mut factory = VaoFactory::<Backend>::new();
    factory.register_creator(MultiBufferIndexVao::<Backend>::NAME, creator::<Backend>);

    assert!(factory.contains("multiBufferIndexVAO"));
    assert_eq!(factory.list_creators().len(), 4);
  }

  #[test]
  fn partial_draws_offset_by_index_width() {
    let mut backend = MockBackend::new();
    let mut vao = icosahedron(&mut backend);

    assert_eq!(vao.buffer_count(), 2);
    assert_eq!(vao.index_type(), Some(IndexType::U16));

    backend.calls.clear();
    {
      let mut bound = vao.bind(&mut backend);
      bound.draw_range(DrawRange::new(0, 3)).unwrap();
      bound.draw_range(DrawRange::new(9, 3)).unwrap();
      bound.draw().unwrap();
    }

    assert_eq!(draws(&backend), vec![(3, 0), (3, 18), (60, 0)]);

    vao.bind(&mut backend).set_indices(vec![0u32, 1, 2, 2, 3, 0]).unwrap();
    backend.calls.clear();
    vao.bind(&mut backend).draw_range(DrawRange::new(3, 3)).unwrap();

    assert_eq!(vao.index_type(), Some(IndexType::U32));
    assert_eq!(draws(&backend), vec![(3, 12)]);
  }

  #[test]
  fn vertex_uploads_keep_the_element_count() {
    let mut backend = MockBackend::new();
    let mut vao = icosahedron(&mut backend);

    assert_eq!(vao.num_indices(), 60);

    vao
      .bind(&mut backend)
      .set_data_at(1, VertexData::new(&COLOURS[..4]))
      .unwrap();

    assert_eq!(vao.num_indices(), 60);
    assert_eq!(vao.buffer_count(), 2);
  }

  #[test]
  fn drawing_without_indices() {
    let mut backend = MockBackend::new();
    let mut vao = MultiBufferIndexVao::new(&mut backend, Mode::Triangle).unwrap();

    {
      let mut bound = vao.bind(&mut backend);
      assert_eq!(bound.draw(), Err(VaoError::NotAllocated));

      bound.set_data(VertexData::new(&COLOURS)).unwrap();
      assert_eq!(bound.draw(), Err(VaoError::NotAllocated));
    }

    assert!(!backend.drew());
  }

  #[test]
  fn indexed_data_is_rejected() {
    let mut backend = MockBackend::new();
    let mut vao = MultiBufferIndexVao::new(&mut backend, Mode::Triangle).unwrap();
    let (positions, indices) = icosahedron_indexed();

    let r = vao
      .bind(&mut backend)
      .set_data(IndexVertexData::new(VertexData::new(positions), indices));

    assert_eq!(
      r,
      Err(VaoError::UnsupportedData {
        vao: "multiBufferIndexVAO",
        data: "indexed vertex data"
      })
    );
  }
}

//! Creating VAOs by name.
//!
//! A [`VaoFactory`] maps names to creator functions. The built-in kinds of VAO are registered at
//! construction; more can be added with [`VaoFactory::register_creator`]:
//!
//! ```ignore
//! let mut factory = VaoFactory::new();
//! factory.register_creator("myVAO", |backend, mode| {
//!   MyVao::new(backend, mode).map(|vao| Box::new(vao) as Box<dyn AbstractVao<_>>)
//! });
//!
//! let vao = factory.create_vao(backend, "myVAO", Mode::Triangle)?;
//! ```

use crate::backend::vertex_array::VertexArray;
use crate::vao::{AbstractVao, Mode, MultiBufferVao, SimpleIndexVao, SimpleVao, VaoError};
use std::{collections::HashMap, error, fmt};

/// Names of the built-in kinds of VAO.
pub mod names {
  /// [`SimpleVao`](crate::vao::SimpleVao).
  pub const SIMPLE: &str = "simpleVAO";
  /// [`SimpleIndexVao`](crate::vao::SimpleIndexVao).
  pub const SIMPLE_INDEX: &str = "simpleIndexVAO";
  /// [`MultiBufferVao`](crate::vao::MultiBufferVao).
  pub const MULTI_BUFFER: &str = "multiBufferVAO";
}

/// A function creating a VAO.
pub type VaoCreator<B> = fn(&mut B, Mode) -> Result<Box<dyn AbstractVao<B>>, VaoError>;

/// Error that can happen when creating a VAO through a factory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FactoryError {
  /// No creator is registered with that name.
  UnknownVao(String),
  /// The creator failed.
  VaoError(VaoError),
}

impl fmt::Display for FactoryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      FactoryError::UnknownVao(ref name) => write!(f, "unknown VAO kind: {}", name),
      FactoryError::VaoError(ref e) => write!(f, "cannot create VAO: {}", e),
    }
  }
}

impl error::Error for FactoryError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      FactoryError::VaoError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<VaoError> for FactoryError {
  fn from(e: VaoError) -> Self {
    FactoryError::VaoError(e)
  }
}

/// Registry of VAO creators.
pub struct VaoFactory<B>
where
  B: ?Sized + VertexArray,
{
  creators: HashMap<String, VaoCreator<B>>,
}

impl<B> VaoFactory<B>
where
  B: 'static + ?Sized + VertexArray,
{
  /// Create a factory with the built-in kinds of VAO registered.
  pub fn new() -> Self {
    let mut factory = VaoFactory {
      creators: HashMap::new(),
    };

    factory.register_creator(names::SIMPLE, |backend, mode| {
      SimpleVao::new(backend, mode).map(|vao| Box::new(vao) as Box<dyn AbstractVao<B>>)
    });
    factory.register_creator(names::SIMPLE_INDEX, |backend, mode| {
      SimpleIndexVao::new(backend, mode).map(|vao| Box::new(vao) as Box<dyn AbstractVao<B>>)
    });
    factory.register_creator(names::MULTI_BUFFER, |backend, mode| {
      MultiBufferVao::new(backend, mode).map(|vao| Box::new(vao) as Box<dyn AbstractVao<B>>)
    });

    factory
  }

  /// Register a creator. A creator already registered with the same name is replaced.
  pub fn register_creator(&mut self, name: impl Into<String>, creator: VaoCreator<B>) {
    let name = name.into();

    if self.creators.insert(name.clone(), creator).is_some() {
      log::warn!("replacing VAO creator {}", name);
    } else {
      log::debug!("registered VAO creator {}", name);
    }
  }

  /// Whether a creator is registered with that name.
  pub fn contains(&self, name: &str) -> bool {
    self.creators.contains_key(name)
  }

  /// Names of all registered creators, sorted.
  pub fn list_creators(&self) -> Vec<&str> {
    let mut names: Vec<_> = self.creators.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  /// Create a VAO by name.
  pub fn create_vao(
    &self,
    backend: &mut B,
    name: &str,
    mode: Mode,
  ) -> Result<Box<dyn AbstractVao<B>>, FactoryError> {
    let creator = self
      .creators
      .get(name)
      .ok_or_else(|| FactoryError::UnknownVao(name.to_owned()))?;

    Ok(creator(backend, mode)?)
  }
}

impl<B> Default for VaoFactory<B>
where
  B: 'static + ?Sized + VertexArray,
{
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::{Call, MockBackend};
  use crate::vao::{BindVao, VertexData};

  #[test]
  fn built_in_kinds_are_registered() {
    let factory = VaoFactory::<MockBackend>::new();

    assert_eq!(
      factory.list_creators(),
      vec!["multiBufferVAO", "simpleIndexVAO", "simpleVAO"]
    );
  }

  #[test]
  fn creating_by_name() {
    let mut backend = MockBackend::new();
    let factory = VaoFactory::<MockBackend>::new();

    let mut vao = factory
      .create_vao(&mut backend, names::SIMPLE, Mode::Line)
      .unwrap();
    assert_eq!(vao.name(), "simpleVAO");
    assert_eq!(vao.mode(), Mode::Line);

    vao
      .bind(&mut backend)
      .set_data(VertexData::new(&[[0f32; 3]; 4]))
      .unwrap();
    vao.bind(&mut backend).draw().unwrap();

    assert!(backend.calls.contains(&Call::DrawArrays {
      mode: Mode::Line,
      first: 0,
      count: 4
    }));
  }

  #[test]
  fn unknown_names() {
    let mut backend = MockBackend::new();
    let factory = VaoFactory::<MockBackend>::new();

    assert_eq!(
      factory
        .create_vao(&mut backend, "nope", Mode::Triangle)
        .err(),
      Some(FactoryError::UnknownVao("nope".to_owned()))
    );
  }

  #[test]
  fn registering_custom_creators() {
    let mut backend = MockBackend::new();
    let mut factory = VaoFactory::<MockBackend>::new();

    // a multi-buffer VAO drawing points, under another name
    factory.register_creator("pointCloud", |backend, _| {
      MultiBufferVao::new(backend, Mode::Point)
        .map(|vao| Box::new(vao) as Box<dyn AbstractVao<MockBackend>>)
    });

    assert!(factory.contains("pointCloud"));

    let vao = factory
      .create_vao(&mut backend, "pointCloud", Mode::Triangle)
      .unwrap();
    assert_eq!(vao.name(), "multiBufferVAO");
    assert_eq!(vao.mode(), Mode::Point);
  }
}

//! ngl demos.
//!
//! This project provides a set of demos that can be run on any platform offering an OpenGL 4.1
//! core context. The demos are platform-agnostic on purpose: the desktop runner (or any other
//! runner) opens the window, adapts its events and drives the demos through the [`Example`] trait.
//!
//! # Demo architecture
//!
//! Demos are simple modules exposed from this crate, each defining a `LocalExample` type. They do
//! not depend on any platform-specific concepts, such as system events or window capacities.
//! Whenever a demo requires user interaction, it uses [`InputAction`], which the runner produces
//! from its own events. Assets (textures, meshes, the OBJ file to view) are reached through
//! [`PlatformServices`], and a demo declares what it needs with [`Example::features`].
//!
//! Demos allocate their ngl resources in [`Example::bootstrap`] and render in
//! [`Example::render_frame`], which consumes the demo and gives it back through [`LoopFeedback`].
//!
//! # Error handling
//!
//! Both entry points return a [`DemoError`], which wraps the errors of every ngl module. The
//! runner logs it and stops the demo.

use image::RgbaImage;
use ngl::{
  context::GraphicsContext, framebuffer::FramebufferError, obj::ObjError,
  primitives::PrimitiveError, shader::ShaderError, texture::TextureError, vao::VaoError,
  vao_factory::FactoryError,
};
use std::{error::Error, fmt, path::Path};

pub mod blank;
pub mod blit;
pub mod boid;
pub mod boid_shaded;
pub mod changing_vao;
pub mod changing_vao_multi_buffer;
pub mod extended_vao;
pub mod multi_buffer_index_vao;
pub mod multi_buffer_vao;
pub mod obj_viewer;
pub mod pbr_texture;
pub mod shaders;
mod shared;
pub mod simple_fbo;
pub mod simple_index_vao;
pub mod simple_pbr;
pub mod sphere;
pub mod vao_primitives;

/// Backend every demo runs with.
pub type Backend = ngl_gl::GL41;

/// Example interface.
pub trait Example: Sized {
  /// Features needed by the demo.
  fn features() -> Features {
    Features::none()
  }

  /// Bootstrap the demo.
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError>;

  /// Render a frame of the demo.
  fn render_frame(
    self,
    time: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<LoopFeedback<Self>, DemoError>;
}

/// A type used to pass “inputs” to demos.
#[derive(Clone, Debug, PartialEq)]
pub enum InputAction {
  /// Quit the application.
  Quit,

  /// Render polygons as wireframes.
  Wireframe,

  /// Render filled polygons.
  Fill,

  /// Reset the view.
  Reset,

  /// A character key was pressed. Digits and letters the demos react to are forwarded this way.
  Key(char),

  /// Primary action. Typically a left click.
  PrimaryPressed,

  /// Primary action released.
  PrimaryReleased,

  /// Secondary action. Typically a right click.
  SecondaryPressed,

  /// Secondary action released.
  SecondaryReleased,

  /// Cursor moved, in window coordinates.
  CursorMoved { x: f32, y: f32 },

  /// Vertical scroll.
  VScroll { amount: f32 },

  /// Framebuffer size changed.
  Resized { width: u32, height: u32 },

  /// Forward direction. Typically used to move the camera forward.
  Forward,

  /// Backward direction.
  Backward,

  /// Left direction.
  Left,

  /// Right direction.
  Right,
}

/// Whether the loop should go on with the stepped demo.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum LoopFeedback<T> {
  Continue(T),
  Exit,
}

/// Services a platform offers to demos.
pub trait PlatformServices {
  /// Error returned when a texture cannot be fetched.
  type FetchError: Error + 'static;

  /// Get one of the textures listed in [`Example::features`].
  fn fetch_texture(&mut self, name: impl AsRef<str>) -> Result<&RgbaImage, Self::FetchError>;

  /// Directory textures and texture packs are read from.
  fn texture_root(&self) -> Option<&Path>;

  /// Directory OBJ meshes are read from.
  fn mesh_root(&self) -> Option<&Path>;

  /// OBJ file to view.
  fn obj_path(&self) -> Option<&Path>;

  /// Texture to apply to the viewed OBJ file.
  fn obj_texture_path(&self) -> Option<&Path>;

  /// Seed for the demos generating random scenes.
  fn seed(&self) -> Option<u64>;
}

/// What a demo needs from the platform.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Features {
  textures: Vec<String>,
  meshes: bool,
  texture_packs: Vec<String>,
}

impl Features {
  /// No feature.
  pub fn none() -> Self {
    Self::default()
  }

  /// Require a texture, by name, relative to the texture root.
  pub fn texture(mut self, name: impl Into<String>) -> Self {
    self.textures.push(name.into());
    self
  }

  /// Require the mesh directory.
  pub fn meshes(mut self) -> Self {
    self.meshes = true;
    self
  }

  /// Require a texture pack file, relative to the texture root.
  pub fn texture_pack(mut self, name: impl Into<String>) -> Self {
    self.texture_packs.push(name.into());
    self
  }

  /// Required textures.
  pub fn textures(&self) -> &[String] {
    &self.textures
  }

  /// Whether the mesh directory is required.
  pub fn needs_meshes(&self) -> bool {
    self.meshes
  }

  /// Required texture packs.
  pub fn texture_packs(&self) -> &[String] {
    &self.texture_packs
  }
}

/// Errors a demo can fail with.
#[non_exhaustive]
#[derive(Debug)]
pub enum DemoError {
  /// VAO error.
  VaoError(VaoError),
  /// VAO factory error.
  FactoryError(FactoryError),
  /// Shader error.
  ShaderError(ShaderError),
  /// Texture or texture pack error.
  TextureError(TextureError),
  /// Framebuffer error.
  FramebufferError(FramebufferError),
  /// Primitive error.
  PrimitiveError(PrimitiveError),
  /// OBJ error.
  ObjError(ObjError),
  /// The platform failed to provide something.
  Platform(Box<dyn Error>),
  /// A required asset was not provided.
  MissingAsset(&'static str),
}

impl DemoError {
  /// Wrap a platform error.
  pub fn platform(e: impl Error + 'static) -> Self {
    DemoError::Platform(Box::new(e))
  }
}

impl fmt::Display for DemoError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      DemoError::VaoError(ref e) => write!(f, "VAO error: {}", e),
      DemoError::FactoryError(ref e) => write!(f, "VAO factory error: {}", e),
      DemoError::ShaderError(ref e) => write!(f, "shader error: {}", e),
      DemoError::TextureError(ref e) => write!(f, "texture error: {}", e),
      DemoError::FramebufferError(ref e) => write!(f, "framebuffer error: {}", e),
      DemoError::PrimitiveError(ref e) => write!(f, "primitive error: {}", e),
      DemoError::ObjError(ref e) => write!(f, "OBJ error: {}", e),
      DemoError::Platform(ref e) => write!(f, "platform error: {}", e),
      DemoError::MissingAsset(what) => write!(f, "missing asset: {}", what),
    }
  }
}

impl Error for DemoError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      DemoError::VaoError(e) => Some(e),
      DemoError::FactoryError(e) => Some(e),
      DemoError::ShaderError(e) => Some(e),
      DemoError::TextureError(e) => Some(e),
      DemoError::FramebufferError(e) => Some(e),
      DemoError::PrimitiveError(e) => Some(e),
      DemoError::ObjError(e) => Some(e),
      DemoError::Platform(e) => Some(e.as_ref()),
      DemoError::MissingAsset(_) => None,
    }
  }
}

macro_rules! impl_demo_error_from {
  ($($t:ty => $v:ident),* $(,)?) => {
    $(
      impl From<$t> for DemoError {
        fn from(e: $t) -> Self {
          DemoError::$v(e)
        }
      }
    )*
  }
}

impl_demo_error_from!(
  VaoError => VaoError,
  FactoryError => FactoryError,
  ShaderError => ShaderError,
  TextureError => TextureError,
  FramebufferError => FramebufferError,
  PrimitiveError => PrimitiveError,
  ObjError => ObjError,
);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn features() {
    let features = Features::none()
      .texture("earth.png")
      .meshes()
      .texture_pack("texturepack.json");

    assert_eq!(features.textures(), &["earth.png".to_owned()]);
    assert!(features.needs_meshes());
    assert_eq!(features.texture_packs(), &["texturepack.json".to_owned()]);
    assert!(!Features::none().needs_meshes());
  }

  #[test]
  fn errors_keep_their_source() {
    let e = DemoError::from(VaoError::NotAllocated);

    assert!(e.source().is_some());
    assert_eq!(
      e.to_string(),
      "VAO error: vertex array not bound or not allocated"
    );
    assert!(DemoError::MissingAsset("OBJ file").source().is_none());
  }
}

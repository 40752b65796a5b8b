//! Texture backend interface.

use crate::texture::{PixelFormat, Sampling, TextureError};

/// 2D texture support on the backend.
pub unsafe trait Texture {
  /// Backend representation of a texture.
  type TextureRepr;

  /// Create a 2D texture.
  ///
  /// When `texels` is `None`, storage is allocated but left uninitialized, which is what
  /// framebuffer attachments want.
  unsafe fn new_texture_2d(
    &mut self,
    size: [u32; 2],
    format: PixelFormat,
    texels: Option<&[u8]>,
    sampling: &Sampling,
  ) -> Result<Self::TextureRepr, TextureError>;

  /// Bind a texture to a texture unit.
  unsafe fn bind_texture(&mut self, texture: &Self::TextureRepr, unit: u32);
}

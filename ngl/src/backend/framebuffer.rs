//! Framebuffer backend interface.

use crate::backend::texture::Texture;
use crate::framebuffer::{DepthFormat, FramebufferError};
use crate::texture::Filter;

/// Framebuffer support on the backend.
pub unsafe trait Framebuffer: Texture {
  /// Backend representation of a framebuffer.
  type FramebufferRepr;

  /// Backend representation of a renderbuffer.
  type RenderbufferRepr;

  /// Maximum number of color attachments a framebuffer can have.
  unsafe fn max_color_attachments(&mut self) -> usize;

  /// Create a new framebuffer without any attachment.
  unsafe fn new_framebuffer(&mut self) -> Result<Self::FramebufferRepr, FramebufferError>;

  /// Attach a texture as the `index`-th color attachment.
  unsafe fn attach_color_texture(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
    index: usize,
    texture: &Self::TextureRepr,
  );

  /// Create a depth (or depth-stencil) renderbuffer.
  unsafe fn new_depth_renderbuffer(
    &mut self,
    size: [u32; 2],
    format: DepthFormat,
  ) -> Result<Self::RenderbufferRepr, FramebufferError>;

  /// Attach a depth (or depth-stencil) renderbuffer.
  unsafe fn attach_depth_renderbuffer(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
    renderbuffer: &Self::RenderbufferRepr,
    format: DepthFormat,
  );

  /// Check the completeness of a framebuffer.
  unsafe fn check_framebuffer(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
  ) -> Result<(), FramebufferError>;

  /// Bind a framebuffer for drawing, or the default one if `None`.
  unsafe fn bind_framebuffer(&mut self, framebuffer: Option<&Self::FramebufferRepr>);

  /// Enable the first `count` color attachments of the bound framebuffer as draw buffers.
  unsafe fn set_draw_buffers(&mut self, count: usize);

  /// Copy a rectangle of a color attachment into the default framebuffer.
  ///
  /// Rectangles are `[x0, y0, x1, y1]`.
  unsafe fn blit_to_default(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
    attachment: usize,
    src: [i32; 4],
    dst: [i32; 4],
    filter: Filter,
  );
}

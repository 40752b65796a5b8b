//! Framebuffers.
//!
//! A framebuffer is an offscreen render target made of color texture attachments and an optional
//! depth (or depth-stencil) renderbuffer. Framebuffers are built with a [`FramebufferBuilder`]:
//!
//! ```ignore
//! let fb = FramebufferBuilder::new(1024, 1024)
//!   .color(PixelFormat::Rgba8, Filter::Nearest, Wrap::ClampToEdge)
//!   .depth(DepthFormat::Depth24)
//!   .build(backend)?;
//! ```
//!
//! Color attachments are textures, so what gets rendered into a framebuffer can be sampled
//! afterwards (see [`Framebuffer::bind_color_texture`]) or copied onto the screen (see
//! [`Framebuffer::blit_to_default`]).

use crate::backend::framebuffer::Framebuffer as FramebufferBackend;
use crate::texture::{Filter, PixelFormat, Sampling, Texture2D, TextureError, Wrap};
use std::{error, fmt};

/// Format of a depth renderbuffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DepthFormat {
  /// 24-bit depth.
  Depth24,
  /// 24-bit depth with an 8-bit stencil.
  Depth24Stencil8,
}

/// Framebuffer errors.
#[non_exhaustive]
#[derive(Debug)]
pub enum FramebufferError {
  /// The backend failed to create the framebuffer or one of its renderbuffers.
  CannotCreate(String),
  /// The framebuffer is incomplete. Carries the name of the status reported by the backend.
  Incomplete(String),
  /// More color attachments were requested than the backend supports.
  TooManyAttachments {
    /// Number of requested attachments.
    requested: usize,
    /// Maximum supported by the backend.
    max: usize,
  },
  /// No color attachment at that index.
  NoSuchAttachment(usize),
  /// A color attachment couldn’t be created.
  TextureError(TextureError),
}

impl fmt::Display for FramebufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      FramebufferError::CannotCreate(ref e) => write!(f, "cannot create framebuffer: {}", e),
      FramebufferError::Incomplete(ref status) => write!(f, "incomplete framebuffer: {}", status),
      FramebufferError::TooManyAttachments { requested, max } => write!(
        f,
        "too many color attachments: {} requested, {} supported",
        requested, max
      ),
      FramebufferError::NoSuchAttachment(index) => write!(f, "no color attachment {}", index),
      FramebufferError::TextureError(ref e) => write!(f, "framebuffer texture error: {}", e),
    }
  }
}

impl error::Error for FramebufferError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      FramebufferError::TextureError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<TextureError> for FramebufferError {
  fn from(e: TextureError) -> Self {
    FramebufferError::TextureError(e)
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ColorSlot {
  format: PixelFormat,
  sampling: Sampling,
}

/// Builder of [`Framebuffer`].
#[derive(Clone, Debug, PartialEq)]
pub struct FramebufferBuilder {
  size: [u32; 2],
  colors: Vec<ColorSlot>,
  depth: Option<DepthFormat>,
}

impl FramebufferBuilder {
  /// Start building a framebuffer of the given size, without any attachment.
  pub fn new(width: u32, height: u32) -> Self {
    FramebufferBuilder {
      size: [width, height],
      colors: Vec::new(),
      depth: None,
    }
  }

  /// Add a color attachment. Attachments are numbered in the order they are added.
  pub fn color(mut self, format: PixelFormat, filter: Filter, wrap: Wrap) -> Self {
    self.colors.push(ColorSlot {
      format,
      sampling: Sampling {
        wrap,
        min_filter: filter,
        mag_filter: filter,
        mipmaps: false,
      },
    });

    self
  }

  /// Add a depth (or depth-stencil) renderbuffer.
  pub fn depth(mut self, format: DepthFormat) -> Self {
    self.depth = Some(format);
    self
  }

  /// Create the framebuffer on the backend.
  ///
  /// The default framebuffer is bound again once done.
  pub fn build<B>(&self, backend: &mut B) -> Result<Framebuffer<B>, FramebufferError>
  where
    B: ?Sized + FramebufferBackend,
  {
    let max = max_color_attachments(backend);

    if self.colors.len() > max {
      return Err(FramebufferError::TooManyAttachments {
        requested: self.colors.len(),
        max,
      });
    }

    let repr = unsafe { backend.new_framebuffer()? };
    unsafe { backend.bind_framebuffer(Some(&repr)) };

    let r = self.attach(backend, &repr);

    unsafe { backend.bind_framebuffer(None) };

    let (colors, depth) = r?;

    log::debug!(
      "created {}×{} framebuffer with {} color attachment(s)",
      self.size[0],
      self.size[1],
      colors.len()
    );

    Ok(Framebuffer {
      repr,
      size: self.size,
      colors,
      _depth: depth,
    })
  }

  #[allow(clippy::type_complexity)]
  fn attach<B>(
    &self,
    backend: &mut B,
    repr: &B::FramebufferRepr,
  ) -> Result<(Vec<Texture2D<B>>, Option<B::RenderbufferRepr>), FramebufferError>
  where
    B: ?Sized + FramebufferBackend,
  {
    let mut colors = Vec::with_capacity(self.colors.len());

    for (index, slot) in self.colors.iter().enumerate() {
      let texture = Texture2D::new(backend, self.size, slot.format, None, slot.sampling)?;
      unsafe { backend.attach_color_texture(repr, index, texture.repr()) };
      colors.push(texture);
    }

    let depth = match self.depth {
      Some(format) => unsafe {
        let renderbuffer = backend.new_depth_renderbuffer(self.size, format)?;
        backend.attach_depth_renderbuffer(repr, &renderbuffer, format);
        Some(renderbuffer)
      },

      None => None,
    };

    unsafe {
      backend.set_draw_buffers(colors.len());
      backend.check_framebuffer(repr)?;
    }

    Ok((colors, depth))
  }
}

/// Maximum number of color attachments a framebuffer can have on that backend.
pub fn max_color_attachments<B>(backend: &mut B) -> usize
where
  B: ?Sized + FramebufferBackend,
{
  unsafe { backend.max_color_attachments() }
}

/// An offscreen render target.
pub struct Framebuffer<B>
where
  B: ?Sized + FramebufferBackend,
{
  repr: B::FramebufferRepr,
  size: [u32; 2],
  colors: Vec<Texture2D<B>>,
  _depth: Option<B::RenderbufferRepr>,
}

impl<B> Framebuffer<B>
where
  B: ?Sized + FramebufferBackend,
{
  /// Bind the framebuffer; subsequent draws render into it.
  pub fn bind(&self, backend: &mut B) {
    unsafe { backend.bind_framebuffer(Some(&self.repr)) }
  }

  /// Bind the default framebuffer back.
  pub fn bind_default(backend: &mut B) {
    unsafe { backend.bind_framebuffer(None) }
  }

  /// Enable the first `count` color attachments as draw buffers. The framebuffer must be bound.
  pub fn set_draw_buffers(&self, backend: &mut B, count: usize) -> Result<(), FramebufferError> {
    if count > self.colors.len() {
      return Err(FramebufferError::NoSuchAttachment(count - 1));
    }

    unsafe { backend.set_draw_buffers(count) };
    Ok(())
  }

  /// Size in pixels.
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Number of color attachments.
  pub fn color_count(&self) -> usize {
    self.colors.len()
  }

  /// Get a color attachment.
  pub fn color_texture(&self, index: usize) -> Option<&Texture2D<B>> {
    self.colors.get(index)
  }

  /// Bind a color attachment to a texture unit for sampling.
  pub fn bind_color_texture(
    &self,
    backend: &mut B,
    index: usize,
    unit: u32,
  ) -> Result<(), FramebufferError> {
    let texture = self
      .colors
      .get(index)
      .ok_or(FramebufferError::NoSuchAttachment(index))?;

    texture.bind(backend, unit);
    Ok(())
  }

  /// Copy a rectangle of a color attachment into a rectangle of the default framebuffer.
  ///
  /// Rectangles are `[x0, y0, x1, y1]`.
  pub fn blit_to_default(
    &self,
    backend: &mut B,
    attachment: usize,
    src: [i32; 4],
    dst: [i32; 4],
    filter: Filter,
  ) -> Result<(), FramebufferError> {
    if attachment >= self.colors.len() {
      return Err(FramebufferError::NoSuchAttachment(attachment));
    }

    unsafe { backend.blit_to_default(&self.repr, attachment, src, dst, filter) };
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::{Call, MockBackend};

  fn two_colors() -> FramebufferBuilder {
    FramebufferBuilder::new(1024, 1024)
      .color(PixelFormat::Rgba8, Filter::Nearest, Wrap::ClampToEdge)
      .color(PixelFormat::Rgb8, Filter::Linear, Wrap::Repeat)
      .depth(DepthFormat::Depth24)
  }

  #[test]
  fn building() {
    let mut backend = MockBackend::new();
    let fb = two_colors().build(&mut backend).unwrap();

    assert_eq!(fb.color_count(), 2);
    assert_eq!(fb.size(), [1024, 1024]);
    assert_eq!(
      backend.calls,
      vec![
        Call::NewFramebuffer(1),
        Call::BindFramebuffer(Some(1)),
        Call::NewTexture {
          id: 2,
          size: [1024, 1024],
          format: PixelFormat::Rgba8
        },
        Call::AttachColor {
          framebuffer: 1,
          index: 0,
          texture: 2
        },
        Call::NewTexture {
          id: 3,
          size: [1024, 1024],
          format: PixelFormat::Rgb8
        },
        Call::AttachColor {
          framebuffer: 1,
          index: 1,
          texture: 3
        },
        Call::AttachDepth {
          framebuffer: 1,
          format: DepthFormat::Depth24
        },
        Call::DrawBuffers(2),
        Call::BindFramebuffer(None),
      ]
    );
  }

  #[test]
  fn attachment_limit() {
    let mut backend = MockBackend::new();
    backend.max_color_attachments = 1;

    assert!(matches!(
      two_colors().build(&mut backend),
      Err(FramebufferError::TooManyAttachments {
        requested: 2,
        max: 1
      })
    ));
    assert!(backend.calls.is_empty());
  }

  #[test]
  fn incomplete_framebuffers() {
    let mut backend = MockBackend::new();
    backend.incomplete_framebuffers = true;

    let r = two_colors().build(&mut backend);

    assert!(matches!(r, Err(FramebufferError::Incomplete(_))));
    // the default framebuffer is restored even on failure
    assert_eq!(backend.calls.last(), Some(&Call::BindFramebuffer(None)));
  }

  #[test]
  fn blitting() {
    let mut backend = MockBackend::new();
    let fb = two_colors().build(&mut backend).unwrap();
    backend.calls.clear();

    fb.blit_to_default(&mut backend, 1, [0, 0, 1024, 1024], [0, 0, 512, 512], Filter::Nearest)
      .unwrap();
    assert!(matches!(
      fb.blit_to_default(&mut backend, 2, [0; 4], [0; 4], Filter::Nearest),
      Err(FramebufferError::NoSuchAttachment(2))
    ));

    assert_eq!(
      backend.calls,
      vec![Call::Blit {
        attachment: 1,
        src: [0, 0, 1024, 1024],
        dst: [0, 0, 512, 512]
      }]
    );
  }

  #[test]
  fn sampling_attachments() {
    let mut backend = MockBackend::new();
    let fb = two_colors().build(&mut backend).unwrap();
    backend.calls.clear();

    fb.bind_color_texture(&mut backend, 0, 0).unwrap();

    assert_eq!(backend.calls, vec![Call::BindTexture { id: 2, unit: 0 }]);
    assert!(fb.bind_color_texture(&mut backend, 5, 0).is_err());
  }
}

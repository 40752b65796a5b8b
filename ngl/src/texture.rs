//! 2D textures.
//!
//! Textures are created from raw texels or from images decoded with the [image] crate. Images are
//! flipped vertically on load so that their first row ends up at the bottom, which is what texture
//! coordinates expect.
//!
//! [image]: https://crates.io/crates/image

use crate::backend::texture::Texture;
use image::{ImageError, RgbaImage};
use std::{error, fmt, io, path::Path};

/// Pixel format of a texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PixelFormat {
  /// 8-bit red, green and blue channels.
  Rgb8,
  /// 8-bit red, green, blue and alpha channels.
  Rgba8,
  /// 16-bit floating point red, green and blue channels.
  Rgb16F,
}

impl PixelFormat {
  /// Number of bytes a single pixel occupies.
  pub fn bytes_per_pixel(self) -> usize {
    match self {
      PixelFormat::Rgb8 => 3,
      PixelFormat::Rgba8 => 4,
      PixelFormat::Rgb16F => 6,
    }
  }
}

/// Texture filtering.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Filter {
  /// Nearest texel.
  Nearest,
  /// Linear interpolation of the nearest texels.
  Linear,
  /// Nearest texel of the nearest mipmap.
  NearestMipmapNearest,
  /// Nearest texel, linearly interpolated between the two nearest mipmaps.
  NearestMipmapLinear,
  /// Linear interpolation in the nearest mipmap.
  LinearMipmapNearest,
  /// Linear interpolation, linearly interpolated between the two nearest mipmaps.
  LinearMipmapLinear,
}

impl Filter {
  /// Whether this filter reads mipmaps.
  pub fn uses_mipmaps(self) -> bool {
    !matches!(self, Filter::Nearest | Filter::Linear)
  }
}

/// Wrapping of texture coordinates outside `[0, 1]`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
  /// Repeat the texture.
  Repeat,
  /// Repeat the texture, mirrored every other time.
  MirroredRepeat,
  /// Clamp to the border texels.
  ClampToEdge,
}

/// How a texture is sampled.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sampling {
  /// Wrapping, for both directions.
  pub wrap: Wrap,
  /// Minification filter.
  pub min_filter: Filter,
  /// Magnification filter.
  pub mag_filter: Filter,
  /// Whether mipmaps get generated after upload.
  pub mipmaps: bool,
}

impl Default for Sampling {
  /// Repeat, trilinear minification, linear magnification, mipmaps.
  fn default() -> Self {
    Sampling {
      wrap: Wrap::Repeat,
      min_filter: Filter::LinearMipmapLinear,
      mag_filter: Filter::Linear,
      mipmaps: true,
    }
  }
}

impl Sampling {
  /// Nearest filtering, clamped, no mipmaps; what render targets typically use.
  pub fn nearest_clamped() -> Self {
    Sampling {
      wrap: Wrap::ClampToEdge,
      min_filter: Filter::Nearest,
      mag_filter: Filter::Nearest,
      mipmaps: false,
    }
  }

  /// Linear filtering, clamped, no mipmaps.
  pub fn linear_clamped() -> Self {
    Sampling {
      wrap: Wrap::ClampToEdge,
      min_filter: Filter::Linear,
      mag_filter: Filter::Linear,
      mipmaps: false,
    }
  }
}

/// Texture errors.
#[non_exhaustive]
#[derive(Debug)]
pub enum TextureError {
  /// The backend failed to create the texture.
  CannotCreate(String),
  /// The number of texels doesn’t match the size and format.
  BadTexelCount {
    /// Expected number of bytes.
    expected: usize,
    /// Provided number of bytes.
    found: usize,
  },
  /// The image couldn’t be opened or decoded.
  ImageError(ImageError),
  /// A texture pack file couldn’t be read.
  CannotReadPack(io::Error),
  /// A texture pack file isn’t valid.
  InvalidPack(serde_json::Error),
  /// No such material in a texture pack.
  UnknownMaterial(String),
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TextureError::CannotCreate(ref e) => write!(f, "cannot create texture: {}", e),
      TextureError::BadTexelCount { expected, found } => write!(
        f,
        "wrong texel count: expected {} bytes, found {}",
        expected, found
      ),
      TextureError::ImageError(ref e) => write!(f, "cannot load image: {}", e),
      TextureError::CannotReadPack(ref e) => write!(f, "cannot read texture pack: {}", e),
      TextureError::InvalidPack(ref e) => write!(f, "invalid texture pack: {}", e),
      TextureError::UnknownMaterial(ref name) => write!(f, "unknown material: {}", name),
    }
  }
}

impl error::Error for TextureError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      TextureError::ImageError(e) => Some(e),
      TextureError::CannotReadPack(e) => Some(e),
      TextureError::InvalidPack(e) => Some(e),
      _ => None,
    }
  }
}

impl From<ImageError> for TextureError {
  fn from(e: ImageError) -> Self {
    TextureError::ImageError(e)
  }
}

/// A 2D texture.
pub struct Texture2D<B>
where
  B: ?Sized + Texture,
{
  repr: B::TextureRepr,
  size: [u32; 2],
  format: PixelFormat,
}

impl<B> Texture2D<B>
where
  B: ?Sized + Texture,
{
  /// Create a texture. With no texels, the storage is left uninitialized.
  pub fn new(
    backend: &mut B,
    size: [u32; 2],
    format: PixelFormat,
    texels: Option<&[u8]>,
    sampling: Sampling,
  ) -> Result<Self, TextureError> {
    if let Some(texels) = texels {
      let expected = size[0] as usize * size[1] as usize * format.bytes_per_pixel();

      if texels.len() != expected {
        return Err(TextureError::BadTexelCount {
          expected,
          found: texels.len(),
        });
      }
    }

    let repr = unsafe { backend.new_texture_2d(size, format, texels, &sampling)? };

    Ok(Texture2D { repr, size, format })
  }

  /// Create a texture from an RGBA image, as is.
  pub fn from_image(
    backend: &mut B,
    image: &RgbaImage,
    sampling: Sampling,
  ) -> Result<Self, TextureError> {
    let size = [image.width(), image.height()];
    Self::new(backend, size, PixelFormat::Rgba8, Some(image.as_raw()), sampling)
  }

  /// Load an image file into a texture.
  pub fn load(
    backend: &mut B,
    path: impl AsRef<Path>,
    sampling: Sampling,
  ) -> Result<Self, TextureError> {
    let path = path.as_ref();
    let image = image::open(path)?.flipv().to_rgba8();

    log::info!(
      "loaded texture {} ({}×{})",
      path.display(),
      image.width(),
      image.height()
    );

    Self::from_image(backend, &image, sampling)
  }

  /// Bind the texture to a texture unit.
  pub fn bind(&self, backend: &mut B, unit: u32) {
    unsafe { backend.bind_texture(&self.repr, unit) }
  }

  /// Size in pixels.
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Pixel format.
  pub fn format(&self) -> PixelFormat {
    self.format
  }

  /// Backend representation.
  pub fn repr(&self) -> &B::TextureRepr {
    &self.repr
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::{Call, MockBackend};

  #[test]
  fn textures_from_images() {
    let mut backend = MockBackend::new();
    let image = RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]));

    let texture = Texture2D::from_image(&mut backend, &image, Sampling::default()).unwrap();
    texture.bind(&mut backend, 3);

    assert_eq!(texture.size(), [4, 2]);
    assert_eq!(
      backend.calls,
      vec![
        Call::NewTexture {
          id: 1,
          size: [4, 2],
          format: PixelFormat::Rgba8
        },
        Call::BindTexture { id: 1, unit: 3 }
      ]
    );
  }

  #[test]
  fn texel_count_is_checked() {
    let mut backend = MockBackend::new();
    let r = Texture2D::new(
      &mut backend,
      [2, 2],
      PixelFormat::Rgb8,
      Some(&[0; 11]),
      Sampling::default(),
    );

    assert!(matches!(
      r,
      Err(TextureError::BadTexelCount {
        expected: 12,
        found: 11
      })
    ));
  }

  #[test]
  fn missing_images() {
    let mut backend = MockBackend::new();
    let r = Texture2D::load(&mut backend, "does/not/exist.png", Sampling::default());

    assert!(matches!(r, Err(TextureError::ImageError(_))));
  }

  #[test]
  fn mipmap_filters() {
    assert!(Filter::LinearMipmapLinear.uses_mipmaps());
    assert!(!Filter::Nearest.uses_mipmaps());
  }
}

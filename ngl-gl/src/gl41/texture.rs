//! OpenGL texture implementation.

use crate::gl41::{state::GLState, GL41};
use gl::types::*;
use ngl::backend::texture::Texture;
use ngl::texture::{Filter, PixelFormat, Sampling, TextureError, Wrap};
use std::{cell::RefCell, os::raw::c_void, ptr, rc::Rc};

/// OpenGL 2D texture.
#[derive(Debug)]
pub struct TextureObject {
  pub(crate) handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl TextureObject {
  /// OpenGL name.
  pub fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for TextureObject {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_texture(self.handle);
      gl::DeleteTextures(1, &self.handle);
    }
  }
}

unsafe impl Texture for GL41 {
  type TextureRepr = TextureObject;

  unsafe fn new_texture_2d(
    &mut self,
    size: [u32; 2],
    format: PixelFormat,
    texels: Option<&[u8]>,
    sampling: &Sampling,
  ) -> Result<Self::TextureRepr, TextureError> {
    let mut handle: GLuint = 0;
    gl::GenTextures(1, &mut handle);

    if handle == 0 {
      return Err(TextureError::CannotCreate(
        "glGenTextures returned 0".to_owned(),
      ));
    }

    // bound on unit 0 while its storage gets created
    self.state.borrow_mut().bind_texture(0, handle);

    let (internal_format, pixel_format, pixel_type) = opengl_pixel_format(format);

    // rows of RGB8 texels are not 4-byte aligned
    gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
    gl::TexImage2D(
      gl::TEXTURE_2D,
      0,
      internal_format as GLint,
      size[0] as GLsizei,
      size[1] as GLsizei,
      0,
      pixel_format,
      pixel_type,
      texels.map_or(ptr::null(), |texels| texels.as_ptr() as *const c_void),
    );

    apply_sampling_to_texture(gl::TEXTURE_2D, sampling);

    if sampling.mipmaps && texels.is_some() {
      gl::GenerateMipmap(gl::TEXTURE_2D);
    } else {
      // a single level keeps the texture complete with mipmapped filters
      gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_BASE_LEVEL, 0);
      gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAX_LEVEL, 0);
    }

    Ok(TextureObject {
      handle,
      state: self.state.clone(),
    })
  }

  unsafe fn bind_texture(&mut self, texture: &Self::TextureRepr, unit: u32) {
    self.state.borrow_mut().bind_texture(unit, texture.handle);
  }
}

/// Internal format, format and type of a pixel format.
pub(crate) fn opengl_pixel_format(format: PixelFormat) -> (GLenum, GLenum, GLenum) {
  match format {
    PixelFormat::Rgb8 => (gl::RGB8, gl::RGB, gl::UNSIGNED_BYTE),
    PixelFormat::Rgba8 => (gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE),
    PixelFormat::Rgb16F => (gl::RGB16F, gl::RGB, gl::HALF_FLOAT),
  }
}

fn apply_sampling_to_texture(target: GLenum, sampling: &Sampling) {
  let wrap = opengl_wrap(sampling.wrap) as GLint;

  unsafe {
    gl::TexParameteri(target, gl::TEXTURE_WRAP_S, wrap);
    gl::TexParameteri(target, gl::TEXTURE_WRAP_T, wrap);
    gl::TexParameteri(
      target,
      gl::TEXTURE_MIN_FILTER,
      opengl_min_filter(sampling.min_filter) as GLint,
    );
    gl::TexParameteri(
      target,
      gl::TEXTURE_MAG_FILTER,
      opengl_mag_filter(sampling.mag_filter) as GLint,
    );
  }
}

fn opengl_wrap(wrap: Wrap) -> GLenum {
  match wrap {
    Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
    Wrap::Repeat => gl::REPEAT,
    Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
  }
}

pub(crate) fn opengl_min_filter(filter: Filter) -> GLenum {
  match filter {
    Filter::Nearest => gl::NEAREST,
    Filter::Linear => gl::LINEAR,
    Filter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
    Filter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
    Filter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
    Filter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
  }
}

/// Magnification never uses mipmaps; only the texel filter is kept.
pub(crate) fn opengl_mag_filter(filter: Filter) -> GLenum {
  match filter {
    Filter::Nearest | Filter::NearestMipmapNearest | Filter::NearestMipmapLinear => gl::NEAREST,
    Filter::Linear | Filter::LinearMipmapNearest | Filter::LinearMipmapLinear => gl::LINEAR,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mag_filters_drop_mipmaps() {
    assert_eq!(opengl_mag_filter(Filter::LinearMipmapLinear), gl::LINEAR);
    assert_eq!(opengl_mag_filter(Filter::NearestMipmapLinear), gl::NEAREST);
    assert_eq!(opengl_min_filter(Filter::LinearMipmapLinear), gl::LINEAR_MIPMAP_LINEAR);
  }

  #[test]
  fn pixel_formats() {
    assert_eq!(
      opengl_pixel_format(PixelFormat::Rgb16F),
      (gl::RGB16F, gl::RGB, gl::HALF_FLOAT)
    );
    assert_eq!(opengl_pixel_format(PixelFormat::Rgba8).0, gl::RGBA8);
  }
}

//! OpenGL framebuffer implementation.

use crate::gl41::{state::GLState, texture::opengl_mag_filter, GL41};
use gl::types::*;
use ngl::backend::framebuffer::Framebuffer as FramebufferBackend;
use ngl::framebuffer::{DepthFormat, FramebufferError};
use ngl::texture::Filter;
use std::{cell::RefCell, rc::Rc};

/// OpenGL framebuffer object.
#[derive(Debug)]
pub struct Framebuffer {
  pub(crate) handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Drop for Framebuffer {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_framebuffer(self.handle);
      gl::DeleteFramebuffers(1, &self.handle);
    }
  }
}

/// OpenGL renderbuffer, used for depth attachments.
#[derive(Debug)]
pub struct Renderbuffer {
  handle: GLuint,
}

impl Drop for Renderbuffer {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteRenderbuffers(1, &self.handle);
    }
  }
}

unsafe impl FramebufferBackend for GL41 {
  type FramebufferRepr = Framebuffer;

  type RenderbufferRepr = Renderbuffer;

  unsafe fn max_color_attachments(&mut self) -> usize {
    let mut max: GLint = 0;
    gl::GetIntegerv(gl::MAX_COLOR_ATTACHMENTS, &mut max);
    max.max(0) as usize
  }

  unsafe fn new_framebuffer(&mut self) -> Result<Self::FramebufferRepr, FramebufferError> {
    let mut handle: GLuint = 0;
    gl::GenFramebuffers(1, &mut handle);

    if handle == 0 {
      return Err(FramebufferError::CannotCreate(
        "glGenFramebuffers returned 0".to_owned(),
      ));
    }

    Ok(Framebuffer {
      handle,
      state: self.state.clone(),
    })
  }

  unsafe fn attach_color_texture(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
    index: usize,
    texture: &Self::TextureRepr,
  ) {
    self.state.borrow_mut().bind_draw_framebuffer(framebuffer.handle);

    gl::FramebufferTexture2D(
      gl::DRAW_FRAMEBUFFER,
      gl::COLOR_ATTACHMENT0 + index as GLenum,
      gl::TEXTURE_2D,
      texture.handle,
      0,
    );
  }

  unsafe fn new_depth_renderbuffer(
    &mut self,
    size: [u32; 2],
    format: DepthFormat,
  ) -> Result<Self::RenderbufferRepr, FramebufferError> {
    let mut handle: GLuint = 0;
    gl::GenRenderbuffers(1, &mut handle);

    if handle == 0 {
      return Err(FramebufferError::CannotCreate(
        "glGenRenderbuffers returned 0".to_owned(),
      ));
    }

    let internal_format = match format {
      DepthFormat::Depth24 => gl::DEPTH_COMPONENT24,
      DepthFormat::Depth24Stencil8 => gl::DEPTH24_STENCIL8,
    };

    gl::BindRenderbuffer(gl::RENDERBUFFER, handle);
    gl::RenderbufferStorage(
      gl::RENDERBUFFER,
      internal_format,
      size[0] as GLsizei,
      size[1] as GLsizei,
    );
    gl::BindRenderbuffer(gl::RENDERBUFFER, 0);

    Ok(Renderbuffer { handle })
  }

  unsafe fn attach_depth_renderbuffer(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
    renderbuffer: &Self::RenderbufferRepr,
    format: DepthFormat,
  ) {
    self.state.borrow_mut().bind_draw_framebuffer(framebuffer.handle);

    let attachment = match format {
      DepthFormat::Depth24 => gl::DEPTH_ATTACHMENT,
      DepthFormat::Depth24Stencil8 => gl::DEPTH_STENCIL_ATTACHMENT,
    };

    gl::FramebufferRenderbuffer(
      gl::DRAW_FRAMEBUFFER,
      attachment,
      gl::RENDERBUFFER,
      renderbuffer.handle,
    );
  }

  unsafe fn check_framebuffer(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
  ) -> Result<(), FramebufferError> {
    self.state.borrow_mut().bind_draw_framebuffer(framebuffer.handle);

    let status = gl::CheckFramebufferStatus(gl::DRAW_FRAMEBUFFER);

    match framebuffer_status_name(status) {
      None => Ok(()),
      Some(reason) => {
        log::error!("framebuffer {} is incomplete: {}", framebuffer.handle, reason);
        Err(FramebufferError::Incomplete(reason.to_owned()))
      }
    }
  }

  unsafe fn bind_framebuffer(&mut self, framebuffer: Option<&Self::FramebufferRepr>) {
    let handle = framebuffer.map_or(0, |fb| fb.handle);
    self.state.borrow_mut().bind_draw_framebuffer(handle);
  }

  unsafe fn set_draw_buffers(&mut self, count: usize) {
    if count == 0 {
      gl::DrawBuffer(gl::NONE);
    } else {
      let color_buffers: Vec<_> =
        (gl::COLOR_ATTACHMENT0..gl::COLOR_ATTACHMENT0 + count as GLenum).collect();

      gl::DrawBuffers(count as GLsizei, color_buffers.as_ptr());
    }
  }

  unsafe fn blit_to_default(
    &mut self,
    framebuffer: &Self::FramebufferRepr,
    attachment: usize,
    src: [i32; 4],
    dst: [i32; 4],
    filter: Filter,
  ) {
    self.state.borrow_mut().bind_draw_framebuffer(0);

    gl::BindFramebuffer(gl::READ_FRAMEBUFFER, framebuffer.handle);
    gl::ReadBuffer(gl::COLOR_ATTACHMENT0 + attachment as GLenum);
    gl::BlitFramebuffer(
      src[0],
      src[1],
      src[2],
      src[3],
      dst[0],
      dst[1],
      dst[2],
      dst[3],
      gl::COLOR_BUFFER_BIT,
      opengl_mag_filter(filter),
    );
    gl::BindFramebuffer(gl::READ_FRAMEBUFFER, 0);
  }
}

/// Name of an incomplete status; `None` when complete.
fn framebuffer_status_name(status: GLenum) -> Option<&'static str> {
  match status {
    gl::FRAMEBUFFER_COMPLETE => None,
    gl::FRAMEBUFFER_UNDEFINED => Some("undefined"),
    gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => Some("incomplete attachment"),
    gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => Some("missing attachment"),
    gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => Some("incomplete draw buffer"),
    gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => Some("incomplete read buffer"),
    gl::FRAMEBUFFER_UNSUPPORTED => Some("unsupported"),
    gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => Some("incomplete multisample"),
    gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => Some("incomplete layer targets"),
    _ => Some("unknown status"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_names() {
    assert_eq!(framebuffer_status_name(gl::FRAMEBUFFER_COMPLETE), None);
    assert_eq!(
      framebuffer_status_name(gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT),
      Some("missing attachment")
    );
    assert_eq!(framebuffer_status_name(0xdead), Some("unknown status"));
  }
}

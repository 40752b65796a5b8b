//! Graphics state.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::marker::PhantomData;

// TLS synchronization barrier for `GLState`.
thread_local!(static TLS_ACQUIRE_GFX_STATE: RefCell<Option<()>> = RefCell::new(Some(())));

/// Cached value.
///
/// A cached value is used to prevent issuing costy GPU commands if we know the target value is
/// already set to what the command tries to set.
#[derive(Debug)]
struct Cached<T>(T)
where
  T: PartialEq;

impl<T> Cached<T>
where
  T: PartialEq,
{
  fn new(initial: T) -> Self {
    Cached(initial)
  }

  fn set(&mut self, value: T) {
    self.0 = value;
  }

  /// A value is invalid if it differs from the cached one.
  fn is_invalid(&self, new_val: &T) -> bool {
    self.0 != *new_val
  }
}

/// The graphics state.
///
/// This type represents the current state of a given graphics context. It acts as a forward-gate
/// to the OpenGL calls the backend issues, adding a small cache layer over it to prevent from
/// issuing the same call (with the same parameters) twice.
#[derive(Debug)]
pub struct GLState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  viewport: Cached<[GLint; 4]>,
  clear_color: Cached<[GLfloat; 4]>,
  depth_test: Cached<bool>,
  multisample: Cached<bool>,
  polygon_mode: Cached<GLenum>,

  // texture
  current_texture_unit: Cached<GLenum>,
  bound_textures: Vec<GLuint>,

  // uniform buffer
  bound_uniform_buffers: Vec<GLuint>,

  // array buffer
  bound_array_buffer: GLuint,

  // element buffer; part of the vertex array state, so only meaningful with a VAO bound
  bound_element_array_buffer: GLuint,

  // framebuffer
  bound_draw_framebuffer: Cached<GLuint>,

  // vertex array
  bound_vertex_array: GLuint,

  // shader program
  current_program: GLuint,
}

impl GLState {
  /// Create a new `GLState`.
  ///
  /// > Note: keep in mind you can create only one per thread.
  pub(crate) fn new() -> Result<Self, StateQueryError> {
    TLS_ACQUIRE_GFX_STATE.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          inner.take();
          Self::get_from_context()
        }

        None => Err(StateQueryError::UnavailableGLState),
      }
    })
  }

  /// Read the state from the current OpenGL context.
  fn get_from_context() -> Result<Self, StateQueryError> {
    unsafe {
      let viewport = Cached::new(get_ctx_viewport()?);
      let clear_color = Cached::new(get_ctx_clear_color()?);
      let depth_test = Cached::new(get_ctx_depth_test()?);
      let multisample = Cached::new(get_ctx_multisample()?);
      let polygon_mode = Cached::new(get_ctx_polygon_mode()?);
      let current_texture_unit = Cached::new(get_ctx_current_texture_unit()?);
      let bound_textures = vec![0; 48]; // 48 is the platform minimal requirement
      let bound_uniform_buffers = vec![0; 36]; // 36 is the platform minimal requirement
      let bound_draw_framebuffer = Cached::new(get_ctx_bound_draw_framebuffer()?);
      let bound_vertex_array = get_ctx_bound_vertex_array()?;
      let current_program = get_ctx_current_program()?;

      Ok(GLState {
        _a: PhantomData,
        viewport,
        clear_color,
        depth_test,
        multisample,
        polygon_mode,
        current_texture_unit,
        bound_textures,
        bound_uniform_buffers,
        bound_array_buffer: 0,
        bound_element_array_buffer: 0,
        bound_draw_framebuffer,
        bound_vertex_array,
        current_program,
      })
    }
  }

  pub(crate) unsafe fn set_viewport(&mut self, viewport: [GLint; 4]) {
    if self.viewport.is_invalid(&viewport) {
      gl::Viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
      self.viewport.set(viewport);
    }
  }

  pub(crate) unsafe fn set_clear_color(&mut self, clear_color: [GLfloat; 4]) {
    if self.clear_color.is_invalid(&clear_color) {
      gl::ClearColor(
        clear_color[0],
        clear_color[1],
        clear_color[2],
        clear_color[3],
      );
      self.clear_color.set(clear_color);
    }
  }

  pub(crate) unsafe fn set_depth_test(&mut self, enabled: bool) {
    if self.depth_test.is_invalid(&enabled) {
      if enabled {
        gl::Enable(gl::DEPTH_TEST);
      } else {
        gl::Disable(gl::DEPTH_TEST);
      }

      self.depth_test.set(enabled);
    }
  }

  pub(crate) unsafe fn set_multisample(&mut self, enabled: bool) {
    if self.multisample.is_invalid(&enabled) {
      if enabled {
        gl::Enable(gl::MULTISAMPLE);
      } else {
        gl::Disable(gl::MULTISAMPLE);
      }

      self.multisample.set(enabled);
    }
  }

  pub(crate) unsafe fn set_polygon_mode(&mut self, mode: GLenum) {
    if self.polygon_mode.is_invalid(&mode) {
      gl::PolygonMode(gl::FRONT_AND_BACK, mode);
      self.polygon_mode.set(mode);
    }
  }

  pub(crate) unsafe fn set_texture_unit(&mut self, unit: u32) {
    let unit = unit as GLenum;

    if self.current_texture_unit.is_invalid(&unit) {
      gl::ActiveTexture(gl::TEXTURE0 + unit);
      self.current_texture_unit.set(unit);
    }
  }

  /// Bind a 2D texture to a texture unit, activating that unit.
  pub(crate) unsafe fn bind_texture(&mut self, unit: u32, handle: GLuint) {
    self.set_texture_unit(unit);

    let unit = unit as usize;

    match self.bound_textures.get(unit).cloned() {
      Some(handle_) if handle != handle_ => {
        gl::BindTexture(gl::TEXTURE_2D, handle);
        self.bound_textures[unit] = handle;
      }

      None => {
        gl::BindTexture(gl::TEXTURE_2D, handle);

        // not enough registered texture units; let’s grow a bit more
        self.bound_textures.resize(unit + 1, 0);
        self.bound_textures[unit] = handle;
      }

      _ => (), // cached
    }
  }

  /// Forget a texture about to be deleted.
  pub(crate) fn unbind_texture(&mut self, handle: GLuint) {
    for t in self.bound_textures.iter_mut().filter(|t| **t == handle) {
      *t = 0;
    }
  }

  pub(crate) unsafe fn bind_buffer_base(&mut self, handle: GLuint, binding: u32) {
    let binding_ = binding as usize;

    match self.bound_uniform_buffers.get(binding_) {
      Some(&handle_) if handle != handle_ => {
        gl::BindBufferBase(gl::UNIFORM_BUFFER, binding as GLuint, handle);
        self.bound_uniform_buffers[binding_] = handle;
      }

      None => {
        gl::BindBufferBase(gl::UNIFORM_BUFFER, binding as GLuint, handle);

        // not enough registered buffer bindings; let’s grow a bit more
        self.bound_uniform_buffers.resize(binding_ + 1, 0);
        self.bound_uniform_buffers[binding_] = handle;
      }

      _ => (), // cached
    }
  }

  pub(crate) unsafe fn bind_array_buffer(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_array_buffer != handle {
      gl::BindBuffer(gl::ARRAY_BUFFER, handle);
      self.bound_array_buffer = handle;
    }
  }

  pub(crate) unsafe fn bind_element_array_buffer(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_element_array_buffer != handle {
      gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, handle);
      self.bound_element_array_buffer = handle;
    }
  }

  pub(crate) unsafe fn unbind_buffer(&mut self, handle: GLuint) {
    if self.bound_array_buffer == handle {
      self.bind_array_buffer(0, Bind::Cached);
    } else if self.bound_element_array_buffer == handle {
      self.bind_element_array_buffer(0, Bind::Cached);
    } else if let Some(handle_) = self
      .bound_uniform_buffers
      .iter_mut()
      .find(|h| **h == handle)
    {
      *handle_ = 0;
    }
  }

  pub(crate) unsafe fn bind_draw_framebuffer(&mut self, handle: GLuint) {
    if self.bound_draw_framebuffer.is_invalid(&handle) {
      gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, handle);
      self.bound_draw_framebuffer.set(handle);
    }
  }

  /// Forget a framebuffer about to be deleted; deleting a bound framebuffer binds the default one.
  pub(crate) fn unbind_framebuffer(&mut self, handle: GLuint) {
    if !self.bound_draw_framebuffer.is_invalid(&handle) {
      self.bound_draw_framebuffer.set(0);
    }
  }

  pub(crate) unsafe fn bind_vertex_array(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_vertex_array != handle {
      gl::BindVertexArray(handle);
      self.bound_vertex_array = handle;

      // the element buffer binding belongs to the vertex array
      self.bound_element_array_buffer = 0;
    }
  }

  pub(crate) unsafe fn unbind_vertex_array(&mut self) {
    self.bind_vertex_array(0, Bind::Cached)
  }

  /// Forget a vertex array about to be deleted.
  pub(crate) fn forget_vertex_array(&mut self, handle: GLuint) {
    if self.bound_vertex_array == handle {
      self.bound_vertex_array = 0;
      self.bound_element_array_buffer = 0;
    }
  }

  pub(crate) unsafe fn use_program(&mut self, handle: GLuint) {
    if self.current_program != handle {
      gl::UseProgram(handle);
      self.current_program = handle;
    }
  }

  pub(crate) fn current_program(&self) -> GLuint {
    self.current_program
  }

  /// Forget a program about to be deleted.
  pub(crate) fn forget_program(&mut self, handle: GLuint) {
    if self.current_program == handle {
      self.current_program = 0;
    }
  }
}

/// Should the binding be cached or forced to the provided value?
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Bind {
  Forced,
  Cached,
}

/// An error that might happen when the context is queried.
#[non_exhaustive]
#[derive(Debug)]
pub enum StateQueryError {
  /// The [`GLState`] object is unavailable.
  ///
  /// That might occur if the current thread doesn’t support allocating a new graphics state. It
  /// might happen if you try to have more than one state on the same thread, for instance.
  UnavailableGLState,
  /// Corrupted depth test state.
  UnknownDepthTestState(GLboolean),
  /// Corrupted multisampling state.
  UnknownMultisampleState(GLboolean),
  /// Corrupted polygon mode.
  UnknownPolygonMode(GLenum),
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnavailableGLState => write!(f, "unavailable graphics state"),
      StateQueryError::UnknownDepthTestState(ref s) => write!(f, "unknown depth test state: {}", s),
      StateQueryError::UnknownMultisampleState(ref s) => {
        write!(f, "unknown multisampling state: {}", s)
      }
      StateQueryError::UnknownPolygonMode(ref m) => write!(f, "unknown polygon mode: {}", m),
    }
  }
}

impl error::Error for StateQueryError {}

unsafe fn get_ctx_viewport() -> Result<[GLint; 4], StateQueryError> {
  let mut data = [0; 4];
  gl::GetIntegerv(gl::VIEWPORT, data.as_mut_ptr());
  Ok(data)
}

unsafe fn get_ctx_clear_color() -> Result<[GLfloat; 4], StateQueryError> {
  let mut data = [0.; 4];
  gl::GetFloatv(gl::COLOR_CLEAR_VALUE, data.as_mut_ptr());
  Ok(data)
}

unsafe fn get_ctx_depth_test() -> Result<bool, StateQueryError> {
  let state = gl::IsEnabled(gl::DEPTH_TEST);

  match state {
    gl::TRUE => Ok(true),
    gl::FALSE => Ok(false),
    _ => Err(StateQueryError::UnknownDepthTestState(state)),
  }
}

unsafe fn get_ctx_multisample() -> Result<bool, StateQueryError> {
  let state = gl::IsEnabled(gl::MULTISAMPLE);

  match state {
    gl::TRUE => Ok(true),
    gl::FALSE => Ok(false),
    _ => Err(StateQueryError::UnknownMultisampleState(state)),
  }
}

unsafe fn get_ctx_polygon_mode() -> Result<GLenum, StateQueryError> {
  // front and back modes are always equal in core profiles
  let mut modes = [gl::FILL as GLint; 2];
  gl::GetIntegerv(gl::POLYGON_MODE, modes.as_mut_ptr());

  let mode = modes[0] as GLenum;
  match mode {
    gl::FILL | gl::LINE | gl::POINT => Ok(mode),
    _ => Err(StateQueryError::UnknownPolygonMode(mode)),
  }
}

unsafe fn get_ctx_current_texture_unit() -> Result<GLenum, StateQueryError> {
  let mut active_texture = gl::TEXTURE0 as GLint;
  gl::GetIntegerv(gl::ACTIVE_TEXTURE, &mut active_texture);
  Ok(active_texture as GLenum - gl::TEXTURE0)
}

unsafe fn get_ctx_bound_draw_framebuffer() -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::DRAW_FRAMEBUFFER_BINDING, &mut bound);
  Ok(bound as GLuint)
}

unsafe fn get_ctx_bound_vertex_array() -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::VERTEX_ARRAY_BINDING, &mut bound);
  Ok(bound as GLuint)
}

unsafe fn get_ctx_current_program() -> Result<GLuint, StateQueryError> {
  let mut used = 0 as GLint;
  gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut used);
  Ok(used as GLuint)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cached_values() {
    let mut viewport = Cached::new([0, 0, 800, 600]);

    assert!(!viewport.is_invalid(&[0, 0, 800, 600]));
    assert!(viewport.is_invalid(&[0, 0, 1024, 720]));

    viewport.set([0, 0, 1024, 720]);
    assert!(!viewport.is_invalid(&[0, 0, 1024, 720]));
  }
}

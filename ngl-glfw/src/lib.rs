//! [GLFW](https://crates.io/crates/glfw) backend for ngl.
//!
//! [`GlfwSurface::new_gl41`] opens a window with an OpenGL 4.1 core context, loads the OpenGL
//! function pointers and acquires the [`GL41`] backend for the current thread.

#![deny(missing_docs)]

use glfw::{self, Context as _, Glfw, InitError, Window, WindowEvent, WindowMode};
use ngl::context::GraphicsContext;
pub use ngl_gl::gl41::StateQueryError;
use ngl_gl::GL41;
use ngl_windowing::{CursorMode, WindowDim, WindowOpt};
use std::{error, fmt, os::raw::c_void, sync::mpsc::Receiver};

/// Error that can be risen while creating a surface.
#[non_exhaustive]
#[derive(Debug)]
pub enum GlfwSurfaceError {
  /// Initialization of the surface went wrong.
  ///
  /// This variant exposes a **glfw** error for further information about what went wrong.
  InitError(InitError),

  /// Window creation failed.
  WindowCreationFailed,

  /// No primary monitor detected.
  NoPrimaryMonitor,

  /// No available video mode.
  NoVideoMode,

  /// The graphics state is not available.
  ///
  /// This error is generated when the initialization code is called on a thread on which the
  /// graphics state has already been acquired.
  GraphicsStateError(StateQueryError),
}

impl fmt::Display for GlfwSurfaceError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlfwSurfaceError::InitError(ref e) => write!(f, "initialization error: {}", e),
      GlfwSurfaceError::WindowCreationFailed => f.write_str("failed to create window"),
      GlfwSurfaceError::NoPrimaryMonitor => f.write_str("no primary monitor"),
      GlfwSurfaceError::NoVideoMode => f.write_str("no video mode"),
      GlfwSurfaceError::GraphicsStateError(ref e) => {
        write!(f, "failed to get graphics state: {}", e)
      }
    }
  }
}

impl From<InitError> for GlfwSurfaceError {
  fn from(e: InitError) -> Self {
    GlfwSurfaceError::InitError(e)
  }
}

impl From<StateQueryError> for GlfwSurfaceError {
  fn from(e: StateQueryError) -> Self {
    GlfwSurfaceError::GraphicsStateError(e)
  }
}

impl error::Error for GlfwSurfaceError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      GlfwSurfaceError::InitError(e) => Some(e),
      GlfwSurfaceError::GraphicsStateError(e) => Some(e),
      _ => None,
    }
  }
}

/// GLFW surface.
///
/// This type is a helper that exposes two important concepts: the GLFW event receiver that you
/// can use to poll events and the [`GL41Context`], which allows you to perform the rendering part.
#[derive(Debug)]
pub struct GlfwSurface {
  /// Wrapped GLFW events queue.
  pub events_rx: Receiver<(f64, WindowEvent)>,

  /// Wrapped ngl context.
  pub context: GL41Context,
}

impl GlfwSurface {
  /// Initialize GLFW and open a window with an OpenGL 4.1 core context.
  ///
  /// Every event kind is polled and the buffer swap is synchronized with the screen.
  pub fn new_gl41(title: &str, win_opt: WindowOpt) -> Result<Self, GlfwSurfaceError> {
    #[cfg(feature = "log-errors")]
    let error_cbk = glfw::LOG_ERRORS;
    #[cfg(not(feature = "log-errors"))]
    let error_cbk = glfw::FAIL_ON_ERRORS;

    let mut glfw = glfw::init(error_cbk)?;

    // OpenGL hints
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(
      glfw::OpenGlProfileHint::Core,
    ));
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
    glfw.window_hint(glfw::WindowHint::ContextVersion(4, 1));
    glfw.window_hint(glfw::WindowHint::Samples(win_opt.num_samples()));
    glfw.window_hint(glfw::WindowHint::DepthBits(win_opt.depth_bits()));

    let (mut window, events_rx) = create_window(&mut glfw, title, win_opt.dim())?;

    window.make_current();
    window.set_all_polling(true);
    window.set_cursor_mode(glfw_cursor_mode(win_opt.cursor_mode()));
    glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

    // init OpenGL
    gl::load_with(|s| window.get_proc_address(s) as *const c_void);

    let gl = GL41::new()?;
    let context = GL41Context { window, gl };

    log::info!("opened {:?} window “{}”", win_opt.dim(), title);

    Ok(GlfwSurface { events_rx, context })
  }
}

fn create_window(
  glfw: &mut Glfw,
  title: &str,
  dim: &WindowDim,
) -> Result<(Window, Receiver<(f64, WindowEvent)>), GlfwSurfaceError> {
  match *dim {
    WindowDim::Windowed { width, height } => glfw
      .create_window(width, height, title, WindowMode::Windowed)
      .ok_or(GlfwSurfaceError::WindowCreationFailed),

    WindowDim::Fullscreen => glfw.with_primary_monitor(|glfw, monitor| {
      let monitor = monitor.ok_or(GlfwSurfaceError::NoPrimaryMonitor)?;
      let vmode = monitor
        .get_video_mode()
        .ok_or(GlfwSurfaceError::NoVideoMode)?;
      let (w, h) = (vmode.width, vmode.height);

      glfw
        .create_window(w, h, title, WindowMode::FullScreen(monitor))
        .ok_or(GlfwSurfaceError::WindowCreationFailed)
    }),
  }
}

fn glfw_cursor_mode(mode: CursorMode) -> glfw::CursorMode {
  match mode {
    CursorMode::Visible => glfw::CursorMode::Normal,
    CursorMode::Invisible => glfw::CursorMode::Hidden,
    CursorMode::Disabled => glfw::CursorMode::Disabled,
  }
}

/// ngl OpenGL 4.1 context.
///
/// This type also re-exports the GLFW window, if you need access to it.
#[derive(Debug)]
pub struct GL41Context {
  /// Wrapped GLFW window.
  pub window: Window,

  /// OpenGL 4.1 state.
  gl: GL41,
}

impl GL41Context {
  /// Size of the window framebuffer, in pixels.
  pub fn size(&self) -> [u32; 2] {
    let (w, h) = self.window.get_framebuffer_size();
    [w.max(0) as u32, h.max(0) as u32]
  }

  /// Swap the back and front buffers.
  pub fn swap_buffers(&mut self) {
    self.window.swap_buffers();
  }
}

unsafe impl GraphicsContext for GL41Context {
  type Backend = GL41;

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.gl
  }
}

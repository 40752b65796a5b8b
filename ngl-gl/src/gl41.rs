//! OpenGL 4.1 backend.
//!
//! This module implements an OpenGL 4.1 core backend for ngl. The backend type is [`GL41`].

mod framebuffer;
mod render_state;
mod shader;
mod state;
mod texture;
mod vertex_array;

pub use self::framebuffer::{Framebuffer, Renderbuffer};
pub use self::shader::{Program, Stage, UniformBuffer};
pub use self::state::GLState;
pub use self::state::StateQueryError;
pub use self::texture::TextureObject;
pub use self::vertex_array::{Buffer, VertexArrayObject};
use std::cell::RefCell;
use std::rc::Rc;

/// An OpenGL 4.1 backend.
///
/// This type is to be used as an ngl backend type. It implements every backend trait.
#[derive(Debug)]
pub struct GL41 {
  pub(crate) state: Rc<RefCell<GLState>>,
}

impl GL41 {
  /// Create a new OpenGL 4.1 backend.
  ///
  /// An OpenGL context must be current and its function pointers loaded.
  pub fn new() -> Result<Self, StateQueryError> {
    GLState::new().map(|state| GL41 {
      state: Rc::new(RefCell::new(state)),
    })
  }

  /// Internal access to the backend state.
  ///
  /// # Unsafety
  ///
  /// This method is **highly unsafe** as it exposes the internals of the backend. Playing with it
  /// should be done with extreme caution.
  pub unsafe fn state(&self) -> &Rc<RefCell<GLState>> {
    &self.state
  }
}

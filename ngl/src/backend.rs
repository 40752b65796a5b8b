//! Backend interfacing.
//!
//! The traits in this module are what a backend must implement to be usable with the rest of the
//! crate. They are all `unsafe` to implement, since implementors talk directly to a graphics
//! driver, and their methods are `unsafe` to call, since the safe types of this crate are
//! responsible for upholding the binding invariants (for instance, a vertex array must be bound
//! before any attribute pointer is set).

pub mod framebuffer;
#[cfg(any(test, feature = "mock"))]
#[allow(missing_docs)]
pub mod mock;
pub mod render_state;
pub mod shader;
pub mod texture;
pub mod vertex_array;

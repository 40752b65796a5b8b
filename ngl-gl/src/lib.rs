//! OpenGL backend.
//!
//! This crate exports the [OpenGL](https://www.khronos.org/opengl/) 4.1 core backend of
//! [ngl](../ngl). The backend type is [`GL41`]; it is normally created by a windowing crate once
//! a context is current on the thread and function pointers are loaded.

pub mod gl41;

pub use gl41::GL41;

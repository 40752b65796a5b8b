//! # ngl
//!
//! A small graphics toolkit used by the ngl demo suite. It sits on top of a _backend_, which is
//! a type implementing the traits from the [`backend`] module; the only real backend lives in the
//! `ngl-gl` crate and targets OpenGL 4.1 core.
//!
//! The central piece is the [`vao`] module: an abstraction over vertex array objects that supports
//! one or several attribute buffers and an optional index buffer. Different _kinds_ of VAOs are
//! created by name through a [`vao_factory::VaoFactory`], so that programs can register their own
//! kinds next to the built-in ones.
//!
//! On top of that, this crate provides what the demos share:
//!
//! - [`shader::ShaderLib`], a registry of named shader programs with cached uniform locations.
//! - [`texture`] and [`texture_pack`], to load images and groups of PBR textures.
//! - [`framebuffer`], offscreen render targets and blitting.
//! - [`mesh`] and [`primitives`], procedural meshes and a registry of ready-to-draw ones.
//! - [`obj`], a wavefront OBJ loader.
//! - [`math`], [`transform`] and [`camera`], the usual matrix plumbing.
//!
//! # Backends and contexts
//!
//! All the types allocating GPU resources are parameterized by a backend type `B`. The backend is
//! obtained from a [`context::GraphicsContext`], which is implemented by the windowing crates.
//! Backend traits are `unsafe` to implement and their methods are `unsafe` to call; the types of
//! this crate are the safe layer over them.

#![deny(missing_docs)]

pub mod backend;
pub mod camera;
pub mod context;
pub mod framebuffer;
pub mod math;
pub mod mesh;
pub mod obj;
pub mod primitives;
pub mod render_state;
pub mod shader;
pub mod texture;
pub mod texture_pack;
pub mod transform;
pub mod vao;
pub mod vao_factory;

//! # ngl windowing
//!
//! This is the base, abstract crate for windowing common types in ngl. The `ngl` crate abstracts
//! over OpenGL but doesn’t give you a way to create an OpenGL context; windowing crates such as
//! `ngl-glfw` do, and they all take their configuration from this crate.
//!
//! # What’s included
//!
//! - [`WindowDim`]: the dimension of a window and its mode (windowed or fullscreen).
//! - [`WindowOpt`]: hints to customize the window, such as multisampling, the depth buffer
//!   precision or whether the cursor should be hidden.

#![deny(missing_docs)]

/// Dimension metrics.
///
///   - `Windowed { width, height }` opens in windowed mode with the wished resolution.
///   - `Fullscreen` opens in fullscreen mode by using the primary monitor resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WindowDim {
  /// Windowed mode.
  Windowed {
    /// Width of the window.
    width: u32,
    /// Height of the window.
    height: u32,
  },
  /// Fullscreen mode (adapt to your screen).
  Fullscreen,
}

/// Cursor mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorMode {
  /// The cursor is always visible.
  Visible,
  /// The cursor exists yet has been disabled.
  Invisible,
  /// The cursor is disabled.
  Disabled,
}

/// Different window options.
///
/// Feel free to look at the different methods available to tweak the options. You may want to
/// start with `default()` though.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowOpt {
  dim: WindowDim,
  cursor_mode: CursorMode,
  num_samples: Option<u32>,
  depth_bits: Option<u32>,
}

impl Default for WindowOpt {
  /// Defaults:
  ///
  /// - `dim` set to `WindowDim::Windowed { width: 1024, height: 720 }`.
  /// - `cursor_mode` set to `CursorMode::Visible`.
  /// - `num_samples` set to `Some(4)`.
  /// - `depth_bits` set to `Some(24)`.
  fn default() -> Self {
    WindowOpt {
      dim: WindowDim::Windowed {
        width: 1024,
        height: 720,
      },
      cursor_mode: CursorMode::Visible,
      num_samples: Some(4),
      depth_bits: Some(24),
    }
  }
}

impl WindowOpt {
  /// Set the dimension of the window.
  #[inline]
  pub fn set_dim(self, dim: WindowDim) -> Self {
    WindowOpt { dim, ..self }
  }

  /// Get the dimension of the window.
  #[inline]
  pub fn dim(&self) -> &WindowDim {
    &self.dim
  }

  /// Hide, unhide or disable the cursor. Default to `CursorMode::Visible`.
  #[inline]
  pub fn set_cursor_mode(self, mode: CursorMode) -> Self {
    WindowOpt {
      cursor_mode: mode,
      ..self
    }
  }

  /// Get the cursor mode.
  #[inline]
  pub fn cursor_mode(&self) -> CursorMode {
    self.cursor_mode
  }

  /// Set the number of samples to use for multisampling.
  ///
  /// Pass `None` to disable multisampling.
  #[inline]
  pub fn set_num_samples<S>(self, samples: S) -> Self
  where
    S: Into<Option<u32>>,
  {
    WindowOpt {
      num_samples: samples.into(),
      ..self
    }
  }

  /// Get the number of samples to use in multisampling, if any.
  #[inline]
  pub fn num_samples(&self) -> Option<u32> {
    self.num_samples
  }

  /// Set the precision of the depth buffer, in bits.
  ///
  /// Pass `None` to let the windowing system decide.
  #[inline]
  pub fn set_depth_bits<B>(self, bits: B) -> Self
  where
    B: Into<Option<u32>>,
  {
    WindowOpt {
      depth_bits: bits.into(),
      ..self
    }
  }

  /// Get the precision of the depth buffer, if any.
  #[inline]
  pub fn depth_bits(&self) -> Option<u32> {
    self.depth_bits
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let opt = WindowOpt::default();

    assert_eq!(
      *opt.dim(),
      WindowDim::Windowed {
        width: 1024,
        height: 720
      }
    );
    assert_eq!(opt.num_samples(), Some(4));
    assert_eq!(opt.depth_bits(), Some(24));
    assert_eq!(opt.cursor_mode(), CursorMode::Visible);
  }

  #[test]
  fn builders() {
    let opt = WindowOpt::default()
      .set_dim(WindowDim::Fullscreen)
      .set_num_samples(None)
      .set_depth_bits(32)
      .set_cursor_mode(CursorMode::Disabled);

    assert_eq!(*opt.dim(), WindowDim::Fullscreen);
    assert_eq!(opt.num_samples(), None);
    assert_eq!(opt.depth_bits(), Some(32));
    assert_eq!(opt.cursor_mode(), CursorMode::Disabled);
  }
}

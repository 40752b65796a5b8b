//! Platform services implementation.

use crate::CLIOpts;
use image::{ImageError, RgbaImage};
use ngl_demos::{Features, PlatformServices};
use std::{
  collections::HashMap,
  error::Error,
  fmt,
  path::{Path, PathBuf},
};

/// Desktop implementation of the [`PlatformServices`] API.
#[derive(Debug)]
pub struct DesktopPlatformServices {
  cli_opts: CLIOpts,
  textures: HashMap<String, RgbaImage>,
}

impl DesktopPlatformServices {
  /// Load everything `features` asks for.
  ///
  /// Textures are read from the texture root and flipped so that their first row is the bottom
  /// one, as OpenGL expects.
  pub fn new(cli_opts: CLIOpts, features: Features) -> Result<Self, DesktopFetchError> {
    let needs_root = !features.textures().is_empty() || !features.texture_packs().is_empty();
    let texture_root = match cli_opts.textures {
      Some(ref root) => Some(root.as_path()),
      None if needs_root => return Err(DesktopFetchError::NoTextureRoot),
      None => None,
    };

    let mut textures = HashMap::new();
    if let Some(root) = texture_root {
      for name in features.textures() {
        let path = root.join(name);
        let texture = image::open(&path)?.flipv().to_rgba8();
        log::info!("loaded texture {}", path.display());
        textures.insert(name.clone(), texture);
      }

      for pack in features.texture_packs() {
        let path = root.join(pack);
        if !path.is_file() {
          return Err(DesktopFetchError::MissingFile(path));
        }
      }
    }

    if features.needs_meshes() && cli_opts.meshes.is_none() {
      log::warn!("no mesh directory given; default meshes will not be available");
    }

    Ok(Self { cli_opts, textures })
  }
}

#[derive(Debug)]
pub enum DesktopFetchError {
  NoTextureRoot,
  MissingFile(PathBuf),
  UnknownTexture(String),
  ImageError(ImageError),
}

impl fmt::Display for DesktopFetchError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      DesktopFetchError::NoTextureRoot => f.write_str("no texture directory (see --textures)"),
      DesktopFetchError::MissingFile(ref path) => write!(f, "missing file: {}", path.display()),
      DesktopFetchError::UnknownTexture(ref name) => write!(f, "unknown texture to load: {}", name),
      DesktopFetchError::ImageError(ref e) => write!(f, "cannot fetch texture: {}", e),
    }
  }
}

impl Error for DesktopFetchError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      DesktopFetchError::ImageError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<ImageError> for DesktopFetchError {
  fn from(source: ImageError) -> Self {
    Self::ImageError(source)
  }
}

impl PlatformServices for DesktopPlatformServices {
  type FetchError = DesktopFetchError;

  fn fetch_texture(&mut self, name: impl AsRef<str>) -> Result<&RgbaImage, Self::FetchError> {
    let name = name.as_ref();
    self
      .textures
      .get(name)
      .ok_or_else(|| DesktopFetchError::UnknownTexture(name.to_owned()))
  }

  fn texture_root(&self) -> Option<&Path> {
    self.cli_opts.textures.as_deref()
  }

  fn mesh_root(&self) -> Option<&Path> {
    self.cli_opts.meshes.as_deref()
  }

  fn obj_path(&self) -> Option<&Path> {
    self.cli_opts.obj.as_deref()
  }

  fn obj_texture_path(&self) -> Option<&Path> {
    self.cli_opts.texture.as_deref()
  }

  fn seed(&self) -> Option<u64> {
    self.cli_opts.seed
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn opts(textures: Option<&str>) -> CLIOpts {
    CLIOpts {
      textures: textures.map(PathBuf::from),
      meshes: None,
      obj: Some(PathBuf::from("cube.obj")),
      texture: None,
      seed: Some(7),
      list_examples: false,
      example: None,
    }
  }

  #[test]
  fn no_feature_needs_nothing() {
    let services = DesktopPlatformServices::new(opts(None), Features::none()).unwrap();

    assert_eq!(services.obj_path(), Some(Path::new("cube.obj")));
    assert_eq!(services.seed(), Some(7));
    assert!(services.texture_root().is_none());
  }

  #[test]
  fn textures_need_a_root() {
    let r = DesktopPlatformServices::new(opts(None), Features::none().texture("earth.png"));
    assert!(matches!(r, Err(DesktopFetchError::NoTextureRoot)));
  }

  #[test]
  fn missing_texture_packs() {
    let root = std::env::temp_dir();
    let features = Features::none().texture_pack("ngl-no-such-pack.json");
    let r = DesktopPlatformServices::new(opts(root.to_str()), features);

    assert!(matches!(r, Err(DesktopFetchError::MissingFile(_))));
  }

  #[test]
  fn unknown_textures() {
    let mut services = DesktopPlatformServices::new(opts(None), Features::none()).unwrap();
    assert!(matches!(
      services.fetch_texture("earth.png"),
      Err(DesktopFetchError::UnknownTexture(_))
    ));
  }
}

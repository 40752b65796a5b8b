//! Texture packs.
//!
//! A texture pack groups the textures of a material, each bound to a fixed texture unit. Packs are
//! described in JSON:
//!
//! ```json
//! {
//!   "TexturePack": [
//!     {
//!       "material": "copper",
//!       "Textures": [
//!         { "location": 0, "name": "albedoMap", "path": "textures/copper/albedo.png" },
//!         { "location": 1, "name": "normalMap", "path": "textures/copper/normal.png" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A single material object is accepted in place of the array, and `"TexturePack"` can be
//! repeated at the root, one material per key:
//!
//! ```json
//! {
//!   "TexturePack": { "material": "copper", "Textures": [] },
//!   "TexturePack": { "material": "greasy", "Textures": [] }
//! }
//! ```
//!
//! Materials are kept in file order either way.

use crate::backend::texture::Texture;
use crate::texture::{Filter, Sampling, Texture2D, TextureError, Wrap};
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_derive::Deserialize;
use std::{collections::HashMap, fmt, fs, path::Path};

/// Sampling of every pack texture: repeated, mipmapped, nearest mipmap texel linearly blended.
pub const PACK_SAMPLING: Sampling = Sampling {
  wrap: Wrap::Repeat,
  min_filter: Filter::NearestMipmapLinear,
  mag_filter: Filter::Linear,
  mipmaps: true,
};

const PACK_KEY: &str = "TexturePack";

/// A texture of a material.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct TextureEntry {
  /// Texture unit.
  pub location: u32,
  /// Name of the sampler uniform.
  pub name: String,
  /// Path of the image, relative to the pack root.
  pub path: String,
}

/// A material.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Material {
  /// Name of the material.
  pub material: String,
  /// Its textures.
  #[serde(rename = "Textures", default)]
  pub textures: Vec<TextureEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Materials {
  Many(Vec<Material>),
  One(Material),
}

// Root object; every `TexturePack` entry is kept, repeated keys included.
struct PackFile {
  materials: Vec<Material>,
}

impl<'de> Deserialize<'de> for PackFile {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    deserializer.deserialize_map(PackFileVisitor)
  }
}

struct PackFileVisitor;

impl<'de> Visitor<'de> for PackFileVisitor {
  type Value = PackFile;

  fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("an object with TexturePack entries")
  }

  fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
  where
    A: MapAccess<'de>,
  {
    let mut materials = None;

    while let Some(key) = map.next_key::<String>()? {
      if key != PACK_KEY {
        map.next_value::<IgnoredAny>()?;
        continue;
      }

      let found = materials.get_or_insert_with(Vec::new);
      match map.next_value()? {
        Materials::Many(many) => found.extend(many),
        Materials::One(one) => found.push(one),
      }
    }

    let materials = materials.ok_or_else(|| de::Error::missing_field(PACK_KEY))?;
    Ok(PackFile { materials })
  }
}

/// A texture pack description.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TexturePack {
  materials: Vec<Material>,
}

impl TexturePack {
  /// Parse a texture pack from JSON.
  pub fn from_json(src: &str) -> Result<Self, TextureError> {
    let file: PackFile = serde_json::from_str(src).map_err(TextureError::InvalidPack)?;

    Ok(TexturePack {
      materials: file.materials,
    })
  }

  /// Read and parse a texture pack file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TextureError> {
    let src = fs::read_to_string(path).map_err(TextureError::CannotReadPack)?;
    Self::from_json(&src)
  }

  /// All the materials, in file order.
  pub fn materials(&self) -> &[Material] {
    &self.materials
  }

  /// Get a material by name.
  pub fn material(&self, name: &str) -> Option<&Material> {
    self.materials.iter().find(|m| m.material == name)
  }

  /// Load the textures of every material, resolving paths relative to `root`, with
  /// [`PACK_SAMPLING`].
  ///
  /// Textures that cannot be loaded are skipped; the material is still registered with the
  /// remaining ones.
  pub fn load<B>(&self, backend: &mut B, root: impl AsRef<Path>) -> LoadedTexturePack<B>
  where
    B: ?Sized + Texture,
  {
    let root = root.as_ref();
    let mut materials = HashMap::new();

    for material in &self.materials {
      log::info!("loading material {}", material.material);

      let mut textures = Vec::with_capacity(material.textures.len());

      for entry in &material.textures {
        let path = root.join(&entry.path);

        match Texture2D::load(backend, &path, PACK_SAMPLING) {
          Ok(texture) => textures.push((entry.location, texture)),
          Err(e) => log::warn!("skipping texture {} of {}: {}", entry.name, material.material, e),
        }
      }

      materials.insert(material.material.clone(), textures);
    }

    LoadedTexturePack { materials }
  }
}

/// A texture pack with its textures living on the backend.
pub struct LoadedTexturePack<B>
where
  B: ?Sized + Texture,
{
  materials: HashMap<String, Vec<(u32, Texture2D<B>)>>,
}

impl<B> LoadedTexturePack<B>
where
  B: ?Sized + Texture,
{
  /// Whether a material was loaded.
  pub fn contains(&self, material: &str) -> bool {
    self.materials.contains_key(material)
  }

  /// Bind every texture of a material to its texture unit.
  pub fn activate(&self, backend: &mut B, material: &str) -> Result<(), TextureError> {
    let textures = self
      .materials
      .get(material)
      .ok_or_else(|| TextureError::UnknownMaterial(material.to_owned()))?;

    for (unit, texture) in textures {
      texture.bind(backend, *unit);
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::mock::MockBackend;

  const PACK: &str = r#"{
    "TexturePack": [
      {
        "material": "copper",
        "Textures": [
          { "location": 0, "name": "albedoMap", "path": "copper/albedo.png" },
          { "location": 1, "name": "normalMap", "path": "copper/normal.png" }
        ]
      },
      { "material": "greasy", "Textures": [] }
    ]
  }"#;

  #[test]
  fn parsing() {
    let pack = TexturePack::from_json(PACK).unwrap();

    assert_eq!(pack.materials().len(), 2);

    let copper = pack.material("copper").unwrap();
    assert_eq!(copper.textures[1].location, 1);
    assert_eq!(copper.textures[1].name, "normalMap");
    assert_eq!(copper.textures[1].path, "copper/normal.png");
    assert!(pack.material("gold").is_none());
  }

  #[test]
  fn single_material() {
    let pack =
      TexturePack::from_json(r#"{ "TexturePack": { "material": "wood", "Textures": [] } }"#)
        .unwrap();

    assert_eq!(pack.materials().len(), 1);
    assert_eq!(pack.materials()[0].material, "wood");
  }

  #[test]
  fn repeated_pack_keys() {
    let pack = TexturePack::from_json(
      r#"{
        "TexturePack": {
          "material": "copper",
          "Textures": [{ "location": 0, "name": "albedoMap", "path": "copper/albedo.png" }]
        },
        "TexturePack": { "material": "greasy", "Textures": [] },
        "TexturePack": [{ "material": "wood" }]
      }"#,
    )
    .unwrap();

    let names: Vec<_> = pack.materials().iter().map(|m| m.material.as_str()).collect();
    assert_eq!(names, ["copper", "greasy", "wood"]);
    assert_eq!(pack.material("copper").unwrap().textures[0].name, "albedoMap");
  }

  #[test]
  fn invalid_packs() {
    assert!(matches!(
      TexturePack::from_json(r#"{ "materials": [] }"#),
      Err(TextureError::InvalidPack(_))
    ));
    assert!(matches!(
      TexturePack::from_json(r#"[{ "material": "wood" }]"#),
      Err(TextureError::InvalidPack(_))
    ));
    assert!(matches!(
      TexturePack::from_path("does/not/exist.json"),
      Err(TextureError::CannotReadPack(_))
    ));
  }

  #[test]
  fn missing_textures_are_skipped() {
    let mut backend = MockBackend::new();
    let pack = TexturePack::from_json(PACK).unwrap();
    let loaded = pack.load(&mut backend, "does/not/exist");

    assert!(loaded.contains("copper"));
    assert!(loaded.activate(&mut backend, "copper").is_ok());
    assert!(backend.calls.is_empty());
    assert!(matches!(
      loaded.activate(&mut backend, "gold"),
      Err(TextureError::UnknownMaterial(_))
    ));
  }

  #[test]
  fn pack_textures_use_nearest_mipmap_linear() {
    let root = std::env::temp_dir().join("ngl-texture-pack-sampling");
    std::fs::create_dir_all(root.join("copper")).unwrap();
    image::RgbaImage::new(2, 2)
      .save(root.join("copper/albedo.png"))
      .unwrap();

    let mut backend = MockBackend::new();
    let pack = TexturePack::from_json(PACK).unwrap();
    let _loaded = pack.load(&mut backend, &root);

    let id = backend.last_id();
    assert_eq!(backend.samplings.get(&id), Some(&PACK_SAMPLING));
    assert_eq!(
      backend.samplings[&id].min_filter,
      Filter::NearestMipmapLinear
    );
  }
}

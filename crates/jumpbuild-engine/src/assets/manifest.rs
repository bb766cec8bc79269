use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::components::properties::Properties;
use crate::components::sprite::Frame;

/// Sprite manifest describing every sprite pack available to levels.
/// Produced by the asset pipeline and loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteManifest {
    pub packs: Vec<PackDescriptor>,
}

/// A named group of sprites (e.g. "day", "castle", "enemies").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackDescriptor {
    pub name: String,
    /// Sprites keyed by their short name inside the pack.
    #[serde(default)]
    pub sprites: BTreeMap<String, SpriteDescriptor>,
}

/// Describes one sprite inside a pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// Display name; the short key is used when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Properties of entities using this sprite. Terrain when absent.
    #[serde(default)]
    pub properties: Option<Properties>,
    /// Frames per animation.
    pub sprites: AnimationFrames,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationFrames {
    #[serde(default)]
    pub idle: Vec<Frame>,
    #[serde(default)]
    pub walk: Vec<Frame>,
    #[serde(default)]
    pub jump: Vec<Frame>,
}

impl SpriteManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Total number of sprites over all packs.
    pub fn sprite_count(&self) -> usize {
        self.packs.iter().map(|p| p.sprites.len()).sum()
    }
}

use std::collections::HashMap;
use crate::assets::manifest::SpriteManifest;
use crate::components::animation::Animation;
use crate::components::sprite::{Sprite, SpriteRef};
use crate::error::InvalidLevelConfiguration;

/// Registry of named sprites, built from a [`SpriteManifest`].
/// Resolves the qualified `pack.sprite` names stored in level documents.
#[derive(Debug, Clone)]
pub struct SpriteRegistry {
    sprites: HashMap<String, SpriteRef>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self {
            sprites: HashMap::new(),
        }
    }

    /// Build a registry from a parsed manifest.
    pub fn from_manifest(manifest: &SpriteManifest) -> Self {
        let mut registry = Self {
            sprites: HashMap::with_capacity(manifest.sprite_count()),
        };
        for pack in &manifest.packs {
            for (short_name, desc) in &pack.sprites {
                let qualified = format!("{}.{}", pack.name, short_name);
                let sprite = Sprite::new(qualified)
                    .with_display_name(desc.name.as_deref().unwrap_or(short_name))
                    .with_properties(desc.properties.unwrap_or_default())
                    .with_frames(Animation::Idle, desc.sprites.idle.clone())
                    .with_frames(Animation::Walk, desc.sprites.walk.clone())
                    .with_frames(Animation::Jump, desc.sprites.jump.clone());
                registry.insert(sprite);
            }
        }
        log::debug!("Sprite registry holds {} sprites", registry.len());
        registry
    }

    /// Register a sprite under its qualified name, replacing any previous one.
    pub fn insert(&mut self, sprite: Sprite) -> SpriteRef {
        let sprite = sprite.into_ref();
        self.sprites.insert(sprite.name().to_owned(), sprite.clone());
        sprite
    }

    /// Look up a sprite by qualified name. Returns None if not found.
    pub fn get(&self, name: &str) -> Option<&SpriteRef> {
        self.sprites.get(name)
    }

    /// Like [`get`](Self::get), but an unknown name is a configuration error.
    pub fn resolve(&self, name: &str) -> Result<SpriteRef, InvalidLevelConfiguration> {
        self.get(name)
            .cloned()
            .ok_or_else(|| InvalidLevelConfiguration::UnknownSprite(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl Default for SpriteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::properties::{Behavior, Properties};

    #[test]
    fn loads_from_manifest() {
        let json = r#"{
            "packs": [{
                "name": "levelelements",
                "sprites": {
                    "goalPost": {
                        "properties": { "entityType": "BLOCK", "behavior": "WIN" },
                        "sprites": {
                            "idle": [{ "path": "goal.png", "width": 32, "height": 64 }]
                        }
                    }
                }
            }]
        }"#;
        let manifest = SpriteManifest::from_json(json).unwrap();
        let reg = SpriteRegistry::from_manifest(&manifest);

        let goal = reg.get("levelelements.goalPost").expect("goal post should exist");
        assert_eq!(goal.display_name(), "goalPost");
        assert_eq!(goal.pack(), "levelelements");
        assert_eq!(goal.properties().behavior, Behavior::Win);
        assert!(!goal.properties().solid);
        assert_eq!(goal.frames(Animation::Idle)[0].height, 64.0);
        assert!(goal.frames(Animation::Walk).is_empty());
    }

    #[test]
    fn unknown_returns_none() {
        let reg = SpriteRegistry::new();
        assert!(reg.get("nonexistent").is_none());
        assert!(matches!(
            reg.resolve("day.nothing"),
            Err(InvalidLevelConfiguration::UnknownSprite(name)) if name == "day.nothing"
        ));
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut reg = SpriteRegistry::new();
        reg.insert(Sprite::new("day.cloudL"));
        reg.insert(Sprite::uniform("day.cloudL", Properties::terrain(), 32.0, 32.0));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.resolve("day.cloudL").unwrap().frames(Animation::Idle).len(), 1);
    }
}

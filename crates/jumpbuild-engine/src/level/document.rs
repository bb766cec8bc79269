//! Wire format of a level as exchanged with the persistence layer.

use serde::{Deserialize, Serialize};

use crate::assets::registry::SpriteRegistry;
use crate::components::entity::{Effect, Entity};
use crate::components::properties::{EntityType, Properties};
use crate::core::grid::Position;
use crate::error::InvalidLevelConfiguration;

use super::BACKGROUND_DEFAULT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDocument {
    pub name: String,
    #[serde(default)]
    pub sprite_packs: Vec<String>,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub entity_list: Vec<EntityDocument>,
}

fn default_background() -> String {
    BACKGROUND_DEFAULT.to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDocument {
    pub entity_type: EntityType,
    /// Qualified `pack.sprite` name.
    pub sprite: String,
    pub properties: Properties,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
}

impl EntityDocument {
    /// Describe `entity` as it was placed.
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            entity_type: entity.entity_type(),
            sprite: entity.sprite().name().to_owned(),
            properties: entity.properties(),
            position: entity.spawn_position(),
            effects: entity.effects().to_vec(),
        }
    }

    pub fn to_entity(&self, sprites: &SpriteRegistry) -> Result<Entity, InvalidLevelConfiguration> {
        if self.properties.entity_type != self.entity_type {
            return Err(InvalidLevelConfiguration::MalformedDocument(format!(
                "entity at {} is a {:?} but its properties describe a {:?}",
                self.position, self.entity_type, self.properties.entity_type
            )));
        }
        let sprite = sprites.resolve(&self.sprite)?;
        Ok(Entity::new(self.entity_type, sprite, self.position)
            .with_properties(self.properties)
            .with_effects(self.effects.clone()))
    }
}

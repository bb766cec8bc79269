//! Shared fixtures for unit tests.

use crate::assets::registry::SpriteRegistry;
use crate::components::entity::Entity;
use crate::components::properties::{Behavior, EntityType, Properties};
use crate::components::sprite::Sprite;
use crate::core::grid::Position;

/// A small registry covering every behavior. Moving entities are one cell
/// wide and two cells tall; everything else fills a single cell.
pub fn fixture_registry() -> SpriteRegistry {
    let mut sprites = SpriteRegistry::new();
    let entries = [
        ("protagonist.protagonist", Properties::new(Behavior::Playable, EntityType::Player, true), 64.0),
        ("castle.block1", Properties::new(Behavior::Static, EntityType::Block, true), 32.0),
        ("castle.spikes", Properties::new(Behavior::Damage, EntityType::Block, true), 32.0),
        ("day.cloudL", Properties::new(Behavior::Static, EntityType::Block, false), 32.0),
        ("levelelements.goalPost", Properties::new(Behavior::Win, EntityType::Block, true), 32.0),
        ("levelelements.goalFlag", Properties::new(Behavior::Win, EntityType::Block, false), 32.0),
        ("enemies.sonichu", Properties::new(Behavior::GenericEnemy, EntityType::Enemy, true), 64.0),
        ("items.coin", Properties::new(Behavior::Static, EntityType::Item, false), 32.0),
    ];
    for (name, properties, height) in entries {
        sprites.insert(Sprite::uniform(name, properties, 32.0, height));
    }
    sprites
}

/// Entity of `entity_type` using the registered sprite `name`.
pub fn place(sprites: &SpriteRegistry, entity_type: EntityType, name: &str, x: f32, y: f32) -> Entity {
    let sprite = sprites.resolve(name).unwrap();
    Entity::new(entity_type, sprite, Position::new(x, y))
}

use serde::{Deserialize, Serialize};

/// The four kinds of object a level can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    #[serde(alias = "block")]
    Block,
    #[serde(alias = "item")]
    Item,
    #[serde(alias = "player")]
    Player,
    #[serde(alias = "enemy")]
    Enemy,
}

/// Collision outcome category. The set is closed; dispatch matches on it
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Behavior {
    /// Plain terrain: blocks motion.
    #[serde(alias = "static")]
    Static,
    /// Hurts whatever lands on it.
    #[serde(alias = "damage")]
    Damage,
    /// Finishes the level when the player touches it.
    #[serde(alias = "win")]
    Win,
    /// The player.
    #[serde(alias = "playable")]
    Playable,
    /// Walks back and forth, hurts the player on side contact.
    #[serde(alias = "genericenemy")]
    GenericEnemy,
}

/// Behavior and solidity of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    pub entity_type: EntityType,
    pub behavior: Behavior,
    /// Whether contact physically blocks motion.
    #[serde(default)]
    pub solid: bool,
}

impl Properties {
    pub const fn new(behavior: Behavior, entity_type: EntityType, solid: bool) -> Self {
        Self {
            entity_type,
            behavior,
            solid,
        }
    }

    /// Defaults applied to sprites that do not declare properties.
    pub const fn terrain() -> Self {
        Self::new(Behavior::Static, EntityType::Block, true)
    }

    /// Whether an entity with these properties takes part in collision lookup
    /// as a block. Win blocks are collidable even when not solid.
    pub fn is_collidable_block(&self) -> bool {
        self.solid || self.behavior == Behavior::Win
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self::terrain()
    }
}

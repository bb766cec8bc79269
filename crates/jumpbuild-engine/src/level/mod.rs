//! Level registry: the authoritative set of entities of one level.
//!
//! Entities are keyed by the grid cell they were placed in. Moving entities
//! keep their key while they travel; only their [`Entity::position`] changes.
//! Per-type views (blocks, active enemies, items) are maintained on every
//! insert and remove. The player lives outside the map so that a level can
//! never be observed without one.

pub mod document;

use std::collections::{BTreeMap, BTreeSet};

use crate::assets::registry::SpriteRegistry;
use crate::components::entity::Entity;
use crate::components::properties::EntityType;
use crate::core::grid::{GridCoord, Position};
use crate::error::{EngineError, InvalidLevelConfiguration};

pub use document::{EntityDocument, LevelDocument};

pub const BACKGROUND_DEFAULT: &str = "day.dayBackground";
pub const SPRITE_PACK_DEFAULT: [&str; 2] = ["protagonist", "day"];
pub const PLAYER_SPRITE_DEFAULT: &str = "protagonist.protagonist";
pub const PLAYER_POSITION_DEFAULT: Position = Position::new(128.0, 128.0);

#[derive(Debug, Clone)]
pub struct Level {
    name: String,
    sprite_packs: BTreeSet<String>,
    /// Qualified sprite name of the backdrop.
    background: String,
    /// Every entity except the player.
    entities: BTreeMap<GridCoord, Entity>,
    player: Entity,
    player_cell: GridCoord,
    blocks: BTreeSet<GridCoord>,
    /// Enemies still taking part in the simulation.
    enemies: BTreeSet<GridCoord>,
    items: BTreeSet<GridCoord>,
}

impl Level {
    /// An empty level holding only the default player.
    pub fn new(name: impl Into<String>, sprites: &SpriteRegistry) -> Result<Self, InvalidLevelConfiguration> {
        let player = Entity::player(sprites.resolve(PLAYER_SPRITE_DEFAULT)?, PLAYER_POSITION_DEFAULT);
        Self::from_entities(
            name,
            SPRITE_PACK_DEFAULT.iter().map(|p| p.to_string()),
            BACKGROUND_DEFAULT,
            vec![player],
        )
    }

    /// Build a level from loose entities. Later entities overwrite earlier
    /// ones in the same cell. Exactly one player is required.
    pub fn from_entities(
        name: impl Into<String>,
        sprite_packs: impl IntoIterator<Item = String>,
        background: impl Into<String>,
        entities: impl IntoIterator<Item = Entity>,
    ) -> Result<Self, InvalidLevelConfiguration> {
        let name = name.into();
        let mut player: Option<Entity> = None;
        let mut others = BTreeMap::new();

        for entity in entities {
            let cell = entity.position.cell();
            if entity.is_player() {
                if player.is_some() {
                    return Err(InvalidLevelConfiguration::DuplicatePlayer(entity.position));
                }
                player = Some(entity);
            } else {
                others.insert(cell, entity);
            }
        }

        let player = player.ok_or_else(|| InvalidLevelConfiguration::MissingPlayer(name.clone()))?;
        let player_cell = player.position.cell();
        if others.remove(&player_cell).is_some() {
            log::debug!("Entity at {player_cell} replaced by the player");
        }

        let mut level = Self {
            name,
            sprite_packs: sprite_packs.into_iter().collect(),
            background: background.into(),
            entities: BTreeMap::new(),
            player,
            player_cell,
            blocks: BTreeSet::new(),
            enemies: BTreeSet::new(),
            items: BTreeSet::new(),
        };
        for (cell, entity) in others {
            level.insert_unchecked(cell, entity);
        }
        Ok(level)
    }

    pub fn from_document(doc: &LevelDocument, sprites: &SpriteRegistry) -> Result<Self, InvalidLevelConfiguration> {
        let entities = doc
            .entity_list
            .iter()
            .map(|e| e.to_entity(sprites))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entities(
            doc.name.clone(),
            doc.sprite_packs.iter().cloned(),
            doc.background.clone(),
            entities,
        )
    }

    pub fn from_json(json: &str, sprites: &SpriteRegistry) -> Result<Self, EngineError> {
        let doc: LevelDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(&doc, sprites)?)
    }

    /// Snapshot of the level with every entity at its spawn position.
    pub fn to_document(&self) -> LevelDocument {
        LevelDocument {
            name: self.name.clone(),
            sprite_packs: self.sprite_packs.iter().cloned().collect(),
            background: self.background.clone(),
            entity_list: self.entities().map(EntityDocument::from_entity).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_document())
    }

    // -- Registry mutation --

    /// Place `entity` in the cell containing its position.
    ///
    /// A player replaces the current player, and the previous player is
    /// returned. Anything else replaces the occupant of its cell, which is
    /// returned. Placing a non-player onto the player's cell fails.
    pub fn add_entity(&mut self, entity: Entity) -> Result<Option<Entity>, InvalidLevelConfiguration> {
        let cell = entity.position.cell();
        self.sprite_packs.insert(entity.sprite().pack().to_owned());

        if entity.is_player() {
            if let Some(occupant) = self.remove_unchecked(cell) {
                log::debug!("Player placed over {:?} at {cell}", occupant.entity_type());
            }
            self.player_cell = cell;
            return Ok(Some(std::mem::replace(&mut self.player, entity)));
        }

        if cell == self.player_cell {
            return Err(InvalidLevelConfiguration::PlayerDisplaced(entity.position));
        }
        let displaced = self.remove_unchecked(cell);
        self.insert_unchecked(cell, entity);
        Ok(displaced)
    }

    /// Remove whatever occupies `cell`. The player cannot be removed.
    pub fn remove_entity(&mut self, cell: GridCoord) -> Result<Option<Entity>, InvalidLevelConfiguration> {
        if cell == self.player_cell {
            return Err(InvalidLevelConfiguration::PlayerRemoval(self.player.position));
        }
        Ok(self.remove_unchecked(cell))
    }

    fn insert_unchecked(&mut self, cell: GridCoord, entity: Entity) {
        match entity.entity_type() {
            EntityType::Block => self.blocks.insert(cell),
            EntityType::Enemy => self.enemies.insert(cell),
            EntityType::Item => self.items.insert(cell),
            EntityType::Player => false,
        };
        self.entities.insert(cell, entity);
    }

    fn remove_unchecked(&mut self, cell: GridCoord) -> Option<Entity> {
        let removed = self.entities.remove(&cell)?;
        self.blocks.remove(&cell);
        self.enemies.remove(&cell);
        self.items.remove(&cell);
        Some(removed)
    }

    // -- Enemy bookkeeping --

    /// Take the enemy at `cell` out of the simulation. It stays in the
    /// registry at its last position. Returns false if it was not active.
    pub fn kill_enemy(&mut self, cell: GridCoord) -> bool {
        self.enemies.remove(&cell)
    }

    /// Put killed enemies back into the simulation.
    pub fn restore_enemies(&mut self, cells: impl IntoIterator<Item = GridCoord>) {
        for cell in cells {
            if self.entities.get(&cell).is_some_and(Entity::is_enemy) {
                self.enemies.insert(cell);
            }
        }
    }

    pub fn is_enemy_active(&self, cell: GridCoord) -> bool {
        self.enemies.contains(&cell)
    }

    /// Return the player and every enemy, killed or not, to their spawn.
    pub fn reset_moving_entities(&mut self) {
        self.player.reset_to_spawn();
        for entity in self.entities.values_mut().filter(|e| e.is_enemy()) {
            entity.reset_to_spawn();
        }
    }

    // -- Views --

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sprite_packs(&self) -> &BTreeSet<String> {
        &self.sprite_packs
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.player
    }

    pub fn player_cell(&self) -> GridCoord {
        self.player_cell
    }

    pub fn entity(&self, cell: GridCoord) -> Option<&Entity> {
        if cell == self.player_cell {
            Some(&self.player)
        } else {
            self.entities.get(&cell)
        }
    }

    pub fn entity_mut(&mut self, cell: GridCoord) -> Option<&mut Entity> {
        if cell == self.player_cell {
            Some(&mut self.player)
        } else {
            self.entities.get_mut(&cell)
        }
    }

    /// Every entity, the player first, then the registry in cell order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        std::iter::once(&self.player).chain(self.entities.values())
    }

    pub fn blocks(&self) -> impl Iterator<Item = (GridCoord, &Entity)> {
        self.view(&self.blocks)
    }

    /// Active enemies in cell order.
    pub fn enemies(&self) -> impl Iterator<Item = (GridCoord, &Entity)> {
        self.view(&self.enemies)
    }

    pub fn items(&self) -> impl Iterator<Item = (GridCoord, &Entity)> {
        self.view(&self.items)
    }

    pub fn enemy_keys(&self) -> Vec<GridCoord> {
        self.enemies.iter().copied().collect()
    }

    fn view<'a>(&'a self, keys: &'a BTreeSet<GridCoord>) -> impl Iterator<Item = (GridCoord, &'a Entity)> + 'a {
        keys.iter()
            .filter_map(move |cell| self.entities.get(cell).map(|e| (*cell, e)))
    }

    /// Number of entities including the player.
    pub fn len(&self) -> usize {
        self.entities.len() + 1
    }

    /// A level always holds its player.
    pub fn is_empty(&self) -> bool {
        false
    }
}

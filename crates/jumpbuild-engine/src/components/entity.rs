use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::animation::{Animation, AnimationState, WalkCycle};
use crate::components::properties::{EntityType, Properties};
use crate::components::sprite::{Frame, SpriteRef};
use crate::core::grid::{snap_to_grid, Position, Rect};
use crate::error::InvalidLevelConfiguration;

/// Largest distance a moving entity may travel along one axis per tick.
pub const VELOCITY_CAP: f32 = 32.0 / 4.0;
/// Vertical velocity of a jump, as a multiple of the current gravity.
pub const JUMP_VELOCITY: f32 = -40.0;
pub const STANDARD_SPEED: u32 = 14;

/// Direction of motion or of a collision relative to the moving entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    Down,
    #[default]
    Left,
    Right,
    None,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }
}

/// Pickup effect carried by an item. Stored and persisted only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Effect {
    #[serde(alias = "score")]
    Score,
    #[serde(alias = "speed")]
    Speed,
    #[serde(alias = "invulnerable")]
    Invulnerable,
}

/// Kinematic state of a player or enemy.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    /// Units per tick. Always within ±[`VELOCITY_CAP`] on both axes.
    velocity: Vec2,
    /// Added to the vertical velocity on every tick.
    pub gravity: f32,
    pub speed: u32,
    pub walk_direction: Direction,
    pub on_ground: bool,
    pub colliding: bool,
    pub walk_cycle: WalkCycle,
}

impl Motion {
    pub fn new() -> Self {
        Self {
            velocity: Vec2::ZERO,
            gravity: 0.0,
            speed: STANDARD_SPEED,
            walk_direction: Direction::Left,
            on_ground: false,
            colliding: false,
            walk_cycle: WalkCycle::default(),
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity.clamp(Vec2::splat(-VELOCITY_CAP), Vec2::splat(VELOCITY_CAP));
    }

    pub fn set_velocity_x(&mut self, x: f32) {
        self.set_velocity(Vec2::new(x, self.velocity.y));
    }

    pub fn add_velocity(&mut self, delta: Vec2) {
        self.set_velocity(self.velocity + delta);
    }

    /// Launch upward with a velocity proportional to the current gravity.
    pub fn jump(&mut self) {
        self.set_velocity(Vec2::new(0.0, JUMP_VELOCITY * self.gravity));
    }

    /// Displacement the next tick would apply if nothing is hit.
    pub fn projected_offset(&self) -> Vec2 {
        let dy = (self.velocity.y + self.gravity).clamp(-VELOCITY_CAP, VELOCITY_CAP);
        Vec2::new(self.velocity.x, dy)
    }

    /// Apply gravity, then move `position` by the velocity.
    ///
    /// A collision on an axis snaps that coordinate to the closest grid line
    /// and zeroes the velocity on it. Hitting a wall turns the entity away
    /// from it; landing puts it on the ground.
    pub fn integrate(&mut self, position: Position, collision_x: Direction, collision_y: Direction) -> Position {
        self.add_velocity(Vec2::new(0.0, self.gravity));
        let mut next = position.offset(self.velocity);

        match collision_x {
            Direction::Left => {
                next.x = snap_to_grid(next.x);
                self.velocity.x = 0.0;
                self.walk_direction = Direction::Right;
            }
            Direction::Right => {
                next.x = snap_to_grid(next.x);
                self.velocity.x = 0.0;
                self.walk_direction = Direction::Left;
            }
            _ => {}
        }

        match collision_y {
            Direction::Up => {
                next.y = snap_to_grid(next.y);
                self.velocity.y = 0.0;
                self.on_ground = false;
            }
            Direction::Down => {
                next.y = snap_to_grid(next.y);
                self.velocity.y = 0.0;
                self.on_ground = true;
            }
            _ => {}
        }

        next
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::new()
    }
}

/// Variant data per entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Block,
    Item { effects: Vec<Effect> },
    Player(Motion),
    Enemy(Motion),
}

impl EntityKind {
    pub fn for_type(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Block => EntityKind::Block,
            EntityType::Item => EntityKind::Item { effects: Vec::new() },
            EntityType::Player => EntityKind::Player(Motion::new()),
            EntityType::Enemy => EntityKind::Enemy(Motion::new()),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKind::Block => EntityType::Block,
            EntityKind::Item { .. } => EntityType::Item,
            EntityKind::Player(_) => EntityType::Player,
            EntityKind::Enemy(_) => EntityType::Enemy,
        }
    }
}

/// Fat entity: one struct for every object in a level, with the per-type
/// state held in [`EntityKind`].
#[derive(Debug, Clone)]
pub struct Entity {
    kind: EntityKind,
    /// Top-left corner in world space.
    pub position: Position,
    /// Where the entity was placed; restarts return it here.
    spawn_position: Position,
    sprite: SpriteRef,
    properties: Properties,
    pub animation: AnimationState,
}

impl Entity {
    /// Create an entity of `entity_type` at `position`, taking its properties
    /// from the sprite.
    pub fn new(entity_type: EntityType, sprite: SpriteRef, position: Position) -> Self {
        Self {
            kind: EntityKind::for_type(entity_type),
            position,
            spawn_position: position,
            properties: sprite.properties(),
            sprite,
            animation: AnimationState::default(),
        }
    }

    pub fn block(sprite: SpriteRef, position: Position) -> Self {
        Self::new(EntityType::Block, sprite, position)
    }

    pub fn item(sprite: SpriteRef, position: Position) -> Self {
        Self::new(EntityType::Item, sprite, position)
    }

    pub fn player(sprite: SpriteRef, position: Position) -> Self {
        Self::new(EntityType::Player, sprite, position)
    }

    pub fn enemy(sprite: SpriteRef, position: Position) -> Self {
        Self::new(EntityType::Enemy, sprite, position)
    }

    // -- Builder pattern --

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Attach effects. Ignored for anything but items.
    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        if let EntityKind::Item { effects: slot } = &mut self.kind {
            *slot = effects;
        }
        self
    }

    pub fn with_walk_direction(mut self, direction: Direction) -> Self {
        if let Some(motion) = self.motion_mut() {
            motion.walk_direction = direction;
        }
        self
    }

    // -- Accessors --

    pub fn entity_type(&self) -> EntityType {
        self.kind.entity_type()
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn spawn_position(&self) -> Position {
        self.spawn_position
    }

    pub fn sprite(&self) -> &SpriteRef {
        &self.sprite
    }

    pub fn properties(&self) -> Properties {
        self.properties
    }

    pub fn effects(&self) -> &[Effect] {
        match &self.kind {
            EntityKind::Item { effects } => effects.as_slice(),
            _ => &[],
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy(_))
    }

    pub fn motion(&self) -> Option<&Motion> {
        match &self.kind {
            EntityKind::Player(motion) | EntityKind::Enemy(motion) => Some(motion),
            _ => None,
        }
    }

    pub fn motion_mut(&mut self) -> Option<&mut Motion> {
        match &mut self.kind {
            EntityKind::Player(motion) | EntityKind::Enemy(motion) => Some(motion),
            _ => None,
        }
    }

    // -- Geometry --

    pub fn current_frame(&self) -> Result<&Frame, InvalidLevelConfiguration> {
        self.sprite.frame(self.animation.current, self.animation.frame_index)
    }

    /// Box of the current frame anchored at the current position.
    pub fn bounding_box(&self) -> Result<Rect, InvalidLevelConfiguration> {
        let frame = self.current_frame()?;
        Ok(Rect::new(self.position.as_vec2(), Vec2::new(frame.width, frame.height)))
    }

    /// Box after the next tick's motion, vertical step capped. Static
    /// entities project onto their current box.
    pub fn projected_box(&self) -> Result<Rect, InvalidLevelConfiguration> {
        let mut rect = self.bounding_box()?;
        if let Some(motion) = self.motion() {
            rect.min += motion.projected_offset();
        }
        Ok(rect)
    }

    // -- Mutation --

    /// Integrate one tick of motion. No-op for static entities.
    pub fn tick(&mut self, collision_x: Direction, collision_y: Direction) {
        if let EntityKind::Player(motion) | EntityKind::Enemy(motion) = &mut self.kind {
            self.position = motion.integrate(self.position, collision_x, collision_y);
        }
    }

    /// Show `animation`, restarting from its first frame if it changes.
    pub fn play(&mut self, animation: Animation) {
        self.animation.play(animation);
    }

    pub fn advance_frame(&mut self) {
        let count = self.sprite.frames(self.animation.current).len();
        self.animation.advance(count);
    }

    /// Put the entity back where it was placed, at rest.
    pub fn reset_to_spawn(&mut self) {
        self.position = self.spawn_position;
        self.animation = AnimationState::default();
        if let Some(motion) = self.motion_mut() {
            *motion = Motion {
                speed: motion.speed,
                ..Motion::new()
            };
        }
    }
}

//! Grid-neighborhood collision detection and behavior dispatch.
//!
//! For one moving subject per call: look up the collidable entities in the
//! ten cells around it, test them against the subject's projected box in a
//! fixed scan order, then resolve the contact according to the target's
//! behavior.
//!
//! Neighbor layout, relative to the cell containing the subject's origin
//! (`·` is the subject, which is up to two cells tall):
//!
//! ```text
//!  0 1 2
//!  9 · 3
//!  8 · 4
//!  7 6 5
//! ```

use std::collections::HashMap;

use crate::components::entity::{Direction, Entity};
use crate::components::properties::{Behavior, EntityType};
use crate::core::grid::{GridCoord, Rect};
use crate::error::InvalidLevelConfiguration;
use crate::level::Level;

pub const NEIGHBOR_COUNT: usize = 10;

/// Cell offsets `(dcol, drow)` of each neighbor slot.
const NEIGHBOR_OFFSETS: [(i32, i32); NEIGHBOR_COUNT] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (1, 2),
    (0, 2),
    (-1, 2),
    (-1, 1),
    (-1, 0),
];

const SCAN_UP: [usize; 3] = [0, 1, 2];
const SCAN_DOWN: [usize; 3] = [5, 6, 7];
const SCAN_LEFT: [usize; 2] = [8, 9];
const SCAN_RIGHT: [usize; 2] = [3, 4];

/// Collidable entities keyed by the cell they currently occupy. Values are
/// registry keys.
#[derive(Debug, Default)]
pub struct CollisionMap {
    cells: HashMap<GridCoord, GridCoord>,
}

impl CollisionMap {
    /// Solid or winning blocks, active enemies and the player. Where two
    /// share a cell, enemies shadow blocks and the player shadows both.
    pub fn build(level: &Level) -> Self {
        let mut cells = HashMap::new();
        for (key, block) in level.blocks() {
            if block.properties().is_collidable_block() {
                cells.insert(block.position.cell(), key);
            }
        }
        for (key, enemy) in level.enemies() {
            cells.insert(enemy.position.cell(), key);
        }
        cells.insert(level.player().position.cell(), level.player_cell());
        Self { cells }
    }

    pub fn get(&self, cell: GridCoord) -> Option<GridCoord> {
        self.cells.get(&cell).copied()
    }

    /// Registry keys found in the ten neighbor slots around `anchor`.
    pub fn neighbors(&self, anchor: GridCoord) -> [Option<GridCoord>; NEIGHBOR_COUNT] {
        NEIGHBOR_OFFSETS.map(|(dcol, drow)| self.get(anchor.offset(dcol, drow)))
    }
}

/// Result of the directional scans for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// Entity found by the vertical scan.
    pub vertical: Option<GridCoord>,
    /// Entity found by the horizontal scan.
    pub horizontal: Option<GridCoord>,
    pub collision_x: Direction,
    pub collision_y: Direction,
}

impl Probe {
    fn empty() -> Self {
        Self {
            vertical: None,
            horizontal: None,
            collision_x: Direction::None,
            collision_y: Direction::None,
        }
    }

    /// The entity whose behavior is dispatched. A horizontal hit takes
    /// precedence over a vertical one.
    pub fn target(&self) -> Option<GridCoord> {
        self.horizontal.or(self.vertical)
    }
}

/// Consequences of a resolution the session has to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionOutcome {
    /// Enemy killed by this contact (bonked target or subject on spikes).
    pub killed_enemy: Option<GridCoord>,
    pub player_killed: bool,
    pub level_won: bool,
}

impl CollisionOutcome {
    /// Whether the rest of the frame must be skipped.
    pub fn ends_frame(&self) -> bool {
        self.player_killed || self.level_won
    }
}

/// Scan the neighborhood of `subject` for the entity its next step runs
/// into. Both scans are recorded; within a scan the first slot in order
/// wins.
pub fn probe(level: &Level, map: &CollisionMap, subject: GridCoord) -> Result<Probe, InvalidLevelConfiguration> {
    let mut probe = Probe::empty();
    let Some(entity) = level.entity(subject) else {
        return Ok(probe);
    };
    let Some(motion) = entity.motion() else {
        return Ok(probe);
    };

    let projected = entity.projected_box()?;
    let neighbors = map.neighbors(entity.position.cell());
    let velocity = motion.velocity();

    let vertical = if velocity.y < 0.0 {
        Some((SCAN_UP.as_slice(), Direction::Up))
    } else if velocity.y > 0.0 {
        Some((SCAN_DOWN.as_slice(), Direction::Down))
    } else {
        None
    };
    if let Some((slots, direction)) = vertical {
        if let Some(hit) = first_hit(level, &neighbors, slots, subject, &projected)? {
            probe.vertical = Some(hit);
            probe.collision_y = direction;
        }
    }

    let horizontal = if velocity.x < 0.0 {
        Some((SCAN_LEFT.as_slice(), Direction::Left))
    } else if velocity.x > 0.0 {
        Some((SCAN_RIGHT.as_slice(), Direction::Right))
    } else {
        None
    };
    if let Some((slots, direction)) = horizontal {
        if let Some(hit) = first_hit(level, &neighbors, slots, subject, &projected)? {
            probe.horizontal = Some(hit);
            probe.collision_x = direction;
        }
    }

    Ok(probe)
}

fn first_hit(
    level: &Level,
    neighbors: &[Option<GridCoord>; NEIGHBOR_COUNT],
    slots: &[usize],
    subject: GridCoord,
    projected: &Rect,
) -> Result<Option<GridCoord>, InvalidLevelConfiguration> {
    for &slot in slots {
        let Some(key) = neighbors[slot] else { continue };
        if key == subject {
            continue;
        }
        let Some(candidate) = level.entity(key) else { continue };
        if candidate.bounding_box()?.intersects(projected) {
            return Ok(Some(key));
        }
    }
    Ok(None)
}

/// Detect and resolve the collision of one moving subject for this tick.
pub fn resolve(level: &mut Level, subject: GridCoord) -> Result<CollisionOutcome, InvalidLevelConfiguration> {
    let map = CollisionMap::build(level);
    let probe = probe(level, &map, subject)?;
    Ok(dispatch(level, subject, probe))
}

/// Apply the outcome of `probe` according to the target's behavior.
pub fn dispatch(level: &mut Level, subject: GridCoord, probe: Probe) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let Probe {
        vertical,
        horizontal,
        mut collision_x,
        mut collision_y,
    } = probe;

    let Some(target) = probe.target() else {
        if let Some(entity) = level.entity_mut(subject) {
            entity.tick(collision_x, collision_y);
        }
        return outcome;
    };
    let Some(target_entity) = level.entity(target) else {
        return outcome;
    };
    let target_props = target_entity.properties();
    let target_type = target_entity.entity_type();
    let target_x = target_entity.position.x;

    // A non-solid hit only gives up contact on the axis it was found on.
    let is_solid = |key: GridCoord| level.entity(key).is_some_and(|e| e.properties().solid);
    if horizontal.is_some_and(|key| !is_solid(key)) {
        collision_x = Direction::None;
    }
    if vertical.is_some_and(|key| !is_solid(key)) {
        collision_y = Direction::None;
    }
    let landed_on_target = vertical == Some(target) && collision_y == Direction::Down;

    let Some(subject_type) = level.entity(subject).map(Entity::entity_type) else {
        return outcome;
    };

    log::debug!(
        "{subject_type:?} at {subject} hit {:?} {target_type:?} at {target} ({collision_x:?}, {collision_y:?})",
        target_props.behavior
    );

    match target_props.behavior {
        Behavior::Static => static_hit(level, subject, collision_x, collision_y),
        Behavior::Damage => {
            if landed_on_target {
                match subject_type {
                    EntityType::Enemy => outcome.killed_enemy = Some(subject),
                    EntityType::Player => outcome.player_killed = true,
                    _ => {}
                }
            } else {
                static_hit(level, subject, collision_x, collision_y);
            }
        }
        Behavior::Win => {
            if subject_type == EntityType::Player {
                outcome.level_won = true;
            } else {
                static_hit(level, subject, collision_x, collision_y);
            }
        }
        Behavior::Playable | Behavior::GenericEnemy => {
            if landed_on_target {
                if let Some(motion) = level.entity_mut(subject).and_then(Entity::motion_mut) {
                    motion.jump();
                }
                match target_type {
                    EntityType::Enemy => outcome.killed_enemy = Some(target),
                    EntityType::Player => outcome.player_killed = true,
                    _ => {}
                }
            } else if subject_type == EntityType::Player || target_type == EntityType::Player {
                outcome.player_killed = true;
            } else {
                turn_apart(level, subject, target, target_x);
            }
        }
    }

    outcome
}

/// Terrain contact: snap and stop on the hit axes. A ceiling also turns the
/// subject around.
fn static_hit(level: &mut Level, subject: GridCoord, collision_x: Direction, collision_y: Direction) {
    let Some(entity) = level.entity_mut(subject) else {
        return;
    };
    if collision_y == Direction::Up {
        if let Some(motion) = entity.motion_mut() {
            motion.walk_direction = motion.walk_direction.reversed();
        }
    }
    entity.tick(collision_x, collision_y);
}

/// Point two touching enemies away from each other.
fn turn_apart(level: &mut Level, subject: GridCoord, target: GridCoord, target_x: f32) {
    let Some(subject_x) = level.entity(subject).map(|e| e.position.x) else {
        return;
    };
    let (subject_dir, target_dir) = if subject_x <= target_x {
        (Direction::Left, Direction::Right)
    } else {
        (Direction::Right, Direction::Left)
    };
    for (key, direction) in [(subject, subject_dir), (target, target_dir)] {
        if let Some(motion) = level.entity_mut(key).and_then(Entity::motion_mut) {
            motion.walk_direction = direction;
        }
    }
}

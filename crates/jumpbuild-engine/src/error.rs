//! Error types shared by the engine.

use thiserror::Error;

use crate::components::animation::Animation;
use crate::core::grid::Position;

/// A level (or one of its sprites) is in a state the simulation cannot run.
///
/// Always fatal to the running session: the loop stops and the error is
/// handed to the hosting layer.
#[derive(Debug, Error)]
pub enum InvalidLevelConfiguration {
    #[error("there may not be more than a single player per level (second player at {0})")]
    DuplicatePlayer(Position),
    #[error("level <{0}> does not contain a player")]
    MissingPlayer(String),
    #[error("tried to remove the player at {0}; there must always be a player available")]
    PlayerRemoval(Position),
    #[error("placing an entity at {0} would overwrite the player")]
    PlayerDisplaced(Position),
    #[error("the sprite called <{sprite}> does not contain the animation type <{animation:?}>")]
    EmptyAnimation { sprite: String, animation: Animation },
    #[error("unknown sprite <{0}>")]
    UnknownSprite(String),
    #[error("JSON configuration not valid <{0}>")]
    MalformedDocument(String),
}

/// Top-level error for fallible engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidLevel(#[from] InvalidLevelConfiguration),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether this error must terminate the running session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::InvalidLevel(_))
    }
}

pub mod assets;
pub mod components;
pub mod core;
pub mod error;
pub mod input;
pub mod level;
pub mod renderer;
pub mod simulation;
pub mod systems;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience
pub use assets::manifest::SpriteManifest;
pub use assets::registry::SpriteRegistry;
pub use components::animation::{Animation, AnimationState};
pub use components::entity::{Direction, Effect, Entity, Motion};
pub use components::properties::{Behavior, EntityType, Properties};
pub use components::sprite::{Frame, Sprite, SpriteRef};
pub use core::grid::{GridCoord, Position, Rect, GRID_SIZE};
pub use core::pump::{FrameControl, FramePump, PumpExit, PumpHandle};
pub use core::time::{FrameTick, MonotonicTime, TimeSource};
pub use error::{EngineError, InvalidLevelConfiguration};
pub use input::keys::{Action, ActiveKeys, Key, KeyBindings, ParseKeyError};
pub use input::queue::{InputEvent, InputQueue, InputSender};
pub use level::{Level, LevelDocument};
pub use renderer::camera::ScrollCamera;
pub use renderer::instance::{DrawInstance, DrawList};
pub use renderer::{FrameData, Renderer};
pub use simulation::config::SimulationConfig;
pub use simulation::events::SessionEvent;
pub use simulation::session::{Session, SessionState};

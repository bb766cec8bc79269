//! Animation state for sprite frame sequences.
//!
//! Every sprite carries three fixed animations. Entities remember which one
//! is showing and at which frame; the frame only advances when the walk
//! cycle timer of a moving entity fires.

use serde::{Deserialize, Serialize};

/// Default walk cycle period in milliseconds.
pub const WALK_CYCLE_MS: f32 = 100.0;

/// The animations a sprite can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    #[default]
    Idle,
    Walk,
    Jump,
}

impl Animation {
    pub const ALL: [Animation; 3] = [Animation::Idle, Animation::Walk, Animation::Jump];
}

/// Which frame of which animation an entity shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationState {
    pub current: Animation,
    pub frame_index: usize,
    /// Mirror the frame horizontally.
    pub flipped: bool,
}

impl AnimationState {
    /// Switch to `animation` from its first frame. Does nothing if it is
    /// already playing.
    pub fn play(&mut self, animation: Animation) {
        if self.current != animation {
            self.current = animation;
            self.frame_index = 0;
        }
    }

    /// Step to the next frame, wrapping over `frame_count`.
    pub fn advance(&mut self, frame_count: usize) {
        if frame_count == 0 {
            self.frame_index = 0;
            return;
        }
        self.frame_index = (self.frame_index + 1) % frame_count;
    }
}

/// Timer that decides when a walking entity shows its next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkCycle {
    /// Current period in milliseconds.
    period_ms: f32,
    /// Time accumulated since the last frame advance.
    elapsed_ms: f32,
}

impl WalkCycle {
    pub fn new(period_ms: f32) -> Self {
        Self {
            period_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Running halves the period.
    pub fn set_running(&mut self, running: bool) {
        self.period_ms = if running {
            WALK_CYCLE_MS * 0.5
        } else {
            WALK_CYCLE_MS
        };
    }

    pub fn period_ms(&self) -> f32 {
        self.period_ms
    }

    /// Add `dt` seconds. Returns true (and restarts the timer) when the period
    /// has been reached.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed_ms += dt * 1e3;
        if self.elapsed_ms >= self.period_ms {
            self.elapsed_ms = 0.0;
            return true;
        }
        false
    }
}

impl Default for WalkCycle {
    fn default() -> Self {
        Self::new(WALK_CYCLE_MS)
    }
}

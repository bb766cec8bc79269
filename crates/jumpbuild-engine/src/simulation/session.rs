//! A running game session: one level, its score and lives, driven frame by
//! frame.
//!
//! Per frame while running:
//! 1. gravity is recomputed for the player and every active enemy,
//! 2. collisions are resolved, the player first, then the enemies in
//!    registry order,
//! 3. player input selects velocity and animation,
//! 4. the camera pans if the player crossed a scroll border,
//! 5. on a second boundary, fallen entities are evicted and the warm-up ends.
//!
//! A death or a win inside step 2 ends the frame immediately.

use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::components::animation::Animation;
use crate::components::entity::Direction;
use crate::core::grid::GridCoord;
use crate::core::pump::{FrameControl, FramePump, PumpExit};
use crate::core::time::{FrameTick, TimeSource};
use crate::error::{EngineError, InvalidLevelConfiguration};
use crate::input::keys::{Action, ActiveKeys, KeyBindings};
use crate::level::Level;
use crate::renderer::camera::ScrollCamera;
use crate::renderer::instance::DrawList;
use crate::renderer::traits::{FrameData, Renderer};
use crate::simulation::collision::{self, CollisionOutcome};
use crate::simulation::config::SimulationConfig;
use crate::simulation::events::{EventBus, SessionEvent};
use crate::systems::render::build_draw_list;

/// Gravity per second of frame time, before the per-tick cap.
const GRAVITY_PER_SECOND: f32 = 10.0;
const GRAVITY_CAP: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created or given a new level; `run` has not been called.
    Idle,
    Running,
    Stopped,
}

pub struct Session {
    config: SimulationConfig,
    level: Level,
    keys: ActiveKeys,
    bindings: KeyBindings,
    camera: ScrollCamera,
    state: SessionState,
    score: u32,
    lives: i32,
    level_won: bool,
    /// Enemies taken out of play since the last (re)start.
    killed: Vec<GridCoord>,
    /// Physics and input are frozen until the first second boundary.
    warm_up: bool,
    /// Whether the camera has been moved to its playing offset.
    camera_settled: bool,
    events: EventBus,
    draw_list: DrawList,
    renderer: Option<Box<dyn Renderer>>,
}

impl Session {
    pub fn new(level: Level, config: SimulationConfig) -> Self {
        let camera = ScrollCamera::new(
            config.viewport_width,
            config.viewport_height,
            config.scroll_left_percent,
            config.scroll_right_percent,
        );
        Self {
            lives: config.starting_lives,
            config,
            level,
            keys: ActiveKeys::new(),
            bindings: KeyBindings::default(),
            camera,
            state: SessionState::Idle,
            score: 0,
            level_won: false,
            killed: Vec::new(),
            warm_up: false,
            camera_settled: false,
            events: EventBus::new(),
            draw_list: DrawList::new(),
            renderer: None,
        }
    }

    // -- Builder pattern --

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Share an existing key set, e.g. one written by an input thread.
    pub fn with_active_keys(mut self, keys: ActiveKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    // -- Lifecycle --

    /// Prepare the level for play and enter the running state.
    pub fn run(&mut self) {
        if let Some(motion) = self.level.player_mut().motion_mut() {
            motion.set_velocity(glam::Vec2::ZERO);
        }
        self.keys.clear();
        self.killed.clear();
        self.warm_up = self.config.warm_up;
        self.camera_settled = false;
        self.camera.reset_to(self.level.player().position.x);
        self.state = SessionState::Running;
        log::info!("Session running level <{}>", self.level.name());
    }

    /// Leave the running state and put every killed enemy back into play at
    /// its last position. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.state == SessionState::Running {
            log::info!("Session stopped (score {}, lives {})", self.score, self.lives);
        }
        self.level.restore_enemies(self.killed.drain(..));
        self.state = SessionState::Stopped;
    }

    /// Stop, return the player and the enemies to their spawn, and run again.
    /// Score and lives are kept.
    pub fn restart_level(&mut self) {
        self.stop();
        self.killed.clear();
        self.level.reset_moving_entities();
        self.run();
    }

    /// Replace the level. Score and lives carry over; call [`run`](Self::run)
    /// to start playing it.
    pub fn load_level(&mut self, level: Level) {
        self.stop();
        self.level = level;
        self.level_won = false;
        self.state = SessionState::Idle;
    }

    /// Run the session on `pump` until it stops, is cancelled, or fails.
    pub fn play<T: TimeSource>(&mut self, pump: &mut FramePump, time: &mut T) -> Result<PumpExit, EngineError> {
        self.run();
        let exit = pump.run(time, |tick| self.frame(tick))?;
        if exit == PumpExit::Cancelled {
            self.stop();
        }
        Ok(exit)
    }

    /// Advance the simulation by one frame.
    ///
    /// A configuration error is fatal: the session stops and the error is
    /// returned for the host to handle.
    pub fn frame(&mut self, tick: FrameTick) -> Result<FrameControl, EngineError> {
        if self.state != SessionState::Running {
            return Ok(FrameControl::Stop);
        }

        if self.keys.is_active(&self.bindings, Action::Reset) {
            log::info!("Level reset requested");
            self.restart_level();
            return Ok(FrameControl::Restarted);
        }

        match self.advance(tick) {
            Ok(control) => Ok(control),
            Err(err) => {
                log::error!("Game pack configuration was invalid ({err}). Stopping.");
                self.stop();
                Err(err.into())
            }
        }
    }

    fn advance(&mut self, tick: FrameTick) -> Result<FrameControl, InvalidLevelConfiguration> {
        log::trace!("Frame after {:.4}s", tick.delta_seconds);
        let dt = if self.warm_up { 0.0 } else { tick.delta_seconds };
        let mut delta = self.config.delta_multiplier * dt;

        if let Some(control) = self.tick_moving_entities(dt, &mut delta)? {
            return Ok(control);
        }

        self.camera
            .follow(self.level.player().position.x, delta.min(self.config.delta_cap));

        if tick.second_boundary {
            if let Some(control) = self.evict_fallen_entities() {
                return Ok(control);
            }
            if !self.camera_settled {
                self.camera.settle_on(self.level.player().position.x);
                self.camera_settled = true;
            }
            if self.warm_up {
                log::debug!("Warm-up over");
            }
            self.warm_up = false;
        }

        self.render()?;
        Ok(FrameControl::Continue)
    }

    /// Gravity, collisions and input for every moving entity. Returns a
    /// control value when the frame ended early.
    fn tick_moving_entities(
        &mut self,
        dt: f32,
        delta: &mut f32,
    ) -> Result<Option<FrameControl>, InvalidLevelConfiguration> {
        let gravity = (GRAVITY_PER_SECOND * dt).min(GRAVITY_CAP);

        let player_cycle = match self.level.player_mut().motion_mut() {
            Some(motion) => {
                motion.gravity = gravity;
                motion.walk_cycle.tick(dt)
            }
            None => false,
        };

        let enemies = self.level.enemy_keys();
        for &key in &enemies {
            let Some(enemy) = self.level.entity_mut(key) else { continue };
            let cycle = match enemy.motion_mut() {
                Some(motion) => {
                    motion.gravity = gravity;
                    motion.walk_cycle.tick(dt)
                }
                None => false,
            };
            enemy.play(Animation::Walk);
            if cycle {
                enemy.advance_frame();
            }
        }

        let player_key = self.level.player_cell();
        let outcome = collision::resolve(&mut self.level, player_key)?;
        if let Some(control) = self.apply(outcome) {
            return Ok(Some(control));
        }

        let enemy_speed = (*delta / 2.0).min(self.config.delta_cap);
        for key in enemies {
            if !self.level.is_enemy_active(key) {
                continue;
            }
            if let Some(enemy) = self.level.entity_mut(key) {
                let direction = enemy.motion().map_or(Direction::Left, |m| m.walk_direction);
                let vx = if direction == Direction::Left { -enemy_speed } else { enemy_speed };
                if let Some(motion) = enemy.motion_mut() {
                    motion.set_velocity_x(vx);
                }
                enemy.animation.flipped = direction != Direction::Left;
            }
            let outcome = collision::resolve(&mut self.level, key)?;
            if let Some(control) = self.apply(outcome) {
                return Ok(Some(control));
            }
        }

        self.handle_input(player_cycle, delta);
        Ok(None)
    }

    fn handle_input(&mut self, cycle: bool, delta: &mut f32) {
        let held = |action| self.keys.is_active(&self.bindings, action);
        let (jump, run, right, left) = (
            held(Action::Jump),
            held(Action::Run),
            held(Action::WalkRight),
            held(Action::WalkLeft),
        );

        if run {
            *delta *= 2.0;
        }

        let player = self.level.player_mut();
        let Some(motion) = player.motion_mut() else {
            return;
        };

        if motion.on_ground {
            if jump {
                motion.jump();
                motion.on_ground = false;
            } else if motion.velocity().y > 0.0 {
                motion.colliding = false;
            }
        }

        motion.walk_cycle.set_running(run);

        let walking = if right {
            motion.set_velocity_x(*delta);
            Some(true)
        } else if left {
            motion.set_velocity_x(-*delta);
            Some(false)
        } else {
            motion.set_velocity_x(0.0);
            None
        };
        let on_ground = motion.on_ground;

        if let Some(flipped) = walking {
            player.animation.flipped = flipped;
        }
        let animation = match (on_ground, walking.is_some()) {
            (false, _) => Animation::Jump,
            (true, true) => Animation::Walk,
            (true, false) => Animation::Idle,
        };
        player.play(animation);
        if cycle {
            player.advance_frame();
        }
    }

    /// Apply the consequences of one collision. Returns a control value when
    /// the frame has to end.
    fn apply(&mut self, outcome: CollisionOutcome) -> Option<FrameControl> {
        if let Some(key) = outcome.killed_enemy {
            if self.level.kill_enemy(key) {
                self.killed.push(key);
                self.score += 1;
                log::debug!("Enemy at {key} killed, score {}", self.score);
                self.events.publish(SessionEvent::ScoreChanged(self.score));
            }
        }
        if outcome.level_won {
            log::info!("Level <{}> won", self.level.name());
            self.level_won = true;
            self.events.publish(SessionEvent::LevelWon);
            self.stop();
            return Some(FrameControl::Stop);
        }
        if outcome.player_killed {
            return Some(self.kill_player());
        }
        None
    }

    /// Take enemies and the player that fell below the viewport out of play.
    fn evict_fallen_entities(&mut self) -> Option<FrameControl> {
        for key in self.level.enemy_keys() {
            let fallen = self
                .level
                .entity(key)
                .is_some_and(|e| self.camera.is_below(e.position.y));
            if fallen && self.level.kill_enemy(key) {
                log::warn!("Enemy spawned at {key} fell out of the level");
                self.killed.push(key);
            }
        }
        if self.camera.is_below(self.level.player().position.y) {
            log::warn!("Player fell out of the level");
            return Some(self.kill_player());
        }
        None
    }

    fn kill_player(&mut self) -> FrameControl {
        self.lives -= 1;
        log::warn!("Player died, {} lives left", self.lives);
        self.events.publish(SessionEvent::LivesChanged(self.lives));
        if self.lives < 0 {
            log::info!("Game over with score {}", self.score);
            self.events.publish(SessionEvent::GameOver);
            self.stop();
            return FrameControl::Stop;
        }
        self.restart_level();
        FrameControl::Restarted
    }

    fn render(&mut self) -> Result<(), InvalidLevelConfiguration> {
        build_draw_list(&self.level, &self.camera, &mut self.draw_list)?;
        if let Some(renderer) = self.renderer.as_mut() {
            let frame = FrameData::new(
                &self.draw_list,
                self.camera.uniform(),
                self.camera.width,
                self.camera.height,
            );
            renderer.draw_frame(&frame);
        }
        Ok(())
    }

    // -- Accessors --

    /// Receive score, lives and outcome notifications.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Handle to the held-key set for the input layer.
    pub fn active_keys(&self) -> ActiveKeys {
        self.keys.clone()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn level_won(&self) -> bool {
        self.level_won
    }

    pub fn is_warming_up(&self) -> bool {
        self.warm_up
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn camera(&self) -> &ScrollCamera {
        &self.camera
    }

    pub fn killed_enemies(&self) -> &[GridCoord] {
        &self.killed
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Draw list of the last completed frame.
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Frame interval the session expects from its pump.
    pub fn frame_interval(&self) -> Duration {
        FramePump::interval_for(self.config.target_fps)
    }
}

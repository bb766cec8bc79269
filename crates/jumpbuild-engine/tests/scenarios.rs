//! End-to-end behavior of levels driven through sessions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use jumpbuild_engine::simulation::collision;
use jumpbuild_engine::{
    Direction, Entity, EntityType, FrameControl, FrameData, FramePump, FrameTick, GridCoord, Key, Level, Position,
    PumpExit, Renderer, Session, SessionEvent, SessionState, SimulationConfig, SpriteManifest, SpriteRegistry,
    TimeSource,
};
use rstest::{fixture, rstest};

const MANIFEST: &str = r#"{
    "packs": [
        {"name": "protagonist", "sprites": {
            "protagonist": {
                "properties": {"entityType": "PLAYER", "behavior": "PLAYABLE", "solid": true},
                "sprites": {
                    "idle": [{"path": "protagonist/idle.png", "width": 32, "height": 64}],
                    "walk": [
                        {"path": "protagonist/walk1.png", "width": 32, "height": 64},
                        {"path": "protagonist/walk2.png", "width": 32, "height": 64}
                    ],
                    "jump": [{"path": "protagonist/jump.png", "width": 32, "height": 64}]
                }
            }
        }},
        {"name": "castle", "sprites": {
            "block1": {
                "properties": {"entityType": "BLOCK", "behavior": "STATIC", "solid": true},
                "sprites": {"idle": [{"path": "castle/block1.png", "width": 32, "height": 32}]}
            },
            "spikes": {
                "properties": {"entityType": "BLOCK", "behavior": "DAMAGE", "solid": true},
                "sprites": {"idle": [{"path": "castle/spikes.png", "width": 32, "height": 32}]}
            }
        }},
        {"name": "levelelements", "sprites": {
            "goalPost": {
                "properties": {"entityType": "BLOCK", "behavior": "WIN", "solid": true},
                "sprites": {"idle": [{"path": "levelelements/goal.png", "width": 32, "height": 32}]}
            }
        }},
        {"name": "enemies", "sprites": {
            "sonichu": {
                "properties": {"entityType": "ENEMY", "behavior": "GENERICENEMY", "solid": true},
                "sprites": {
                    "idle": [{"path": "sonichu/idle.png", "width": 32, "height": 64}],
                    "walk": [
                        {"path": "sonichu/walk1.png", "width": 32, "height": 64},
                        {"path": "sonichu/walk2.png", "width": 32, "height": 64}
                    ]
                }
            }
        }}
    ]
}"#;

#[fixture]
fn sprites() -> SpriteRegistry {
    SpriteRegistry::from_manifest(&SpriteManifest::from_json(MANIFEST).unwrap())
}

fn entity(sprites: &SpriteRegistry, entity_type: EntityType, name: &str, x: f32, y: f32) -> Entity {
    Entity::new(entity_type, sprites.resolve(name).unwrap(), Position::new(x, y))
}

/// A floor of `floor` blocks on row 6, a player at (64, 128), plus `extra`.
fn level(sprites: &SpriteRegistry, floor: &str, extra: Vec<Entity>) -> Level {
    let mut entities = vec![entity(sprites, EntityType::Player, "protagonist.protagonist", 64.0, 128.0)];
    for col in 0..24 {
        entities.push(entity(sprites, EntityType::Block, floor, col as f32 * 32.0, 192.0));
    }
    entities.extend(extra);
    Level::from_entities("scenario", ["castle".to_string()], "castle.castleBackground", entities).unwrap()
}

fn session(level: Level) -> Session {
    let config = SimulationConfig {
        warm_up: false,
        ..SimulationConfig::default()
    };
    let mut session = Session::new(level, config);
    session.run();
    session
}

fn tick(dt: f32) -> FrameTick {
    FrameTick {
        delta_seconds: dt,
        second_boundary: false,
        frames_last_second: 0,
    }
}

#[rstest]
fn player_stops_flush_against_a_wall(sprites: SpriteRegistry) {
    let wall = entity(&sprites, EntityType::Block, "castle.block1", 96.0, 128.0);
    let mut level = level(&sprites, "castle.block1", vec![wall]);
    let key = level.player_cell();
    level.player_mut().motion_mut().unwrap().set_velocity(Vec2::new(10.0, 0.0));

    let outcome = collision::resolve(&mut level, key).unwrap();
    assert!(!outcome.ends_frame());

    let player = level.player();
    assert_eq!(player.motion().unwrap().velocity().x, 0.0);
    assert_eq!(player.position.x + 32.0, 96.0);
    assert_eq!(player.motion().unwrap().walk_direction, Direction::Left);
}

#[rstest]
fn enemies_walking_into_each_other_turn_around(sprites: SpriteRegistry) {
    let left = Entity::enemy(sprites.resolve("enemies.sonichu").unwrap(), Position::new(320.0, 128.0))
        .with_walk_direction(Direction::Right);
    let right = entity(&sprites, EntityType::Enemy, "enemies.sonichu", 384.0, 128.0);
    let mut session = session(level(&sprites, "castle.block1", vec![left, right]));
    let (left_key, right_key) = (GridCoord::new(10, 4), GridCoord::new(12, 4));
    let direction = |s: &Session, key| s.level().entity(key).unwrap().motion().unwrap().walk_direction;

    let mut frames = 0;
    while direction(&session, left_key) == Direction::Right {
        assert_eq!(session.frame(tick(0.05)).unwrap(), FrameControl::Continue);
        frames += 1;
        assert!(frames < 40, "enemies never met");
    }

    assert_eq!(direction(&session, left_key), Direction::Left);
    assert_eq!(direction(&session, right_key), Direction::Right);
    assert_eq!(session.level().enemies().count(), 2);
    assert!(session.killed_enemies().is_empty());
    assert_eq!((session.score(), session.lives()), (0, 3));
}

#[rstest]
fn falling_out_of_the_level_costs_a_life(sprites: SpriteRegistry) {
    let enemy = entity(&sprites, EntityType::Enemy, "enemies.sonichu", 480.0, 128.0);
    let mut session = session(level(&sprites, "castle.block1", vec![enemy]));
    let events = session.subscribe();
    let enemy_key = GridCoord::new(15, 4);
    for _ in 0..10 {
        session.frame(tick(0.05)).unwrap();
    }
    assert!(session.level().entity(enemy_key).unwrap().position.x < 470.0);
    session.level_mut().player_mut().position = Position::new(64.0, 700.0);

    let boundary = FrameTick {
        second_boundary: true,
        frames_last_second: 11,
        ..tick(0.05)
    };
    assert_eq!(session.frame(boundary).unwrap(), FrameControl::Restarted);
    assert_eq!(session.lives(), 2);
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.level().player().position, Position::new(64.0, 128.0));
    assert_eq!(session.level().entity(enemy_key).unwrap().position, Position::new(480.0, 128.0));
    assert!(session.level().is_enemy_active(enemy_key));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LivesChanged(2));
}

#[rstest]
fn walking_into_the_goal_wins(sprites: SpriteRegistry) {
    let goal = entity(&sprites, EntityType::Block, "levelelements.goalPost", 128.0, 128.0);
    let mut session = session(level(&sprites, "castle.block1", vec![goal]));
    let events = session.subscribe();
    session.active_keys().press(Key::Right);

    let mut frames = 0;
    while session.frame(tick(0.05)).unwrap() == FrameControl::Continue {
        frames += 1;
        assert!(frames < 40, "goal never reached");
    }

    assert!(session.level_won());
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(events.try_iter().any(|e| e == SessionEvent::LevelWon));
}

#[rstest]
fn enemies_cannot_win(sprites: SpriteRegistry) {
    let goal = entity(&sprites, EntityType::Block, "levelelements.goalPost", 256.0, 128.0);
    let enemy = entity(&sprites, EntityType::Enemy, "enemies.sonichu", 320.0, 128.0);
    let mut session = session(level(&sprites, "castle.block1", vec![goal, enemy]));
    let key = GridCoord::new(10, 4);

    let mut turned = false;
    for _ in 0..30 {
        assert_eq!(session.frame(tick(0.05)).unwrap(), FrameControl::Continue);
        let enemy = session.level().entity(key).unwrap();
        assert!(enemy.position.x >= 288.0 - 1e-3);
        turned |= enemy.motion().unwrap().walk_direction == Direction::Right;
    }

    assert!(turned);
    assert!(!session.level_won());
    assert!(session.is_running());
}

#[rstest]
fn bonked_enemies_come_back_after_restart(sprites: SpriteRegistry) {
    let enemy = entity(&sprites, EntityType::Enemy, "enemies.sonichu", 320.0, 128.0);
    let mut level = level(&sprites, "castle.block1", vec![enemy]);
    level
        .add_entity(entity(&sprites, EntityType::Player, "protagonist.protagonist", 320.0, 64.0))
        .unwrap();
    let mut session = session(level);
    let events = session.subscribe();
    let key = GridCoord::new(10, 4);

    for _ in 0..3 {
        session.frame(tick(0.02)).unwrap();
    }

    assert_eq!(session.score(), 1);
    assert_eq!(session.killed_enemies(), &[key]);
    assert!(!session.level().is_enemy_active(key));
    assert!(session.level().player().motion().unwrap().velocity().y < 0.0);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::ScoreChanged(1));

    session.restart_level();
    assert!(session.killed_enemies().is_empty());
    assert!(session.level().is_enemy_active(key));
    assert_eq!(session.level().entity(key).unwrap().position, Position::new(320.0, 128.0));
    assert_eq!(session.score(), 1);
}

/// Advances by a fixed step on every read.
struct SteppedTime {
    now: Duration,
    step: Duration,
}

impl TimeSource for SteppedTime {
    fn now(&mut self) -> Duration {
        let now = self.now;
        self.now += self.step;
        now
    }
}

struct CountingRenderer(Arc<AtomicUsize>);

impl Renderer for CountingRenderer {
    fn backend(&self) -> &'static str {
        "counting"
    }

    fn draw_frame(&mut self, frame: &FrameData<'_>) {
        assert_eq!(frame.background, "castle.castleBackground");
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

#[rstest]
fn spikes_end_the_game_through_the_pump(sprites: SpriteRegistry) {
    let drawn = Arc::new(AtomicUsize::new(0));
    let config = SimulationConfig {
        warm_up: false,
        ..SimulationConfig::default()
    };
    let mut session = Session::new(level(&sprites, "castle.spikes", vec![]), config)
        .with_renderer(Box::new(CountingRenderer(drawn.clone())));
    let events = session.subscribe();
    let mut pump = FramePump::new(1_000);
    let mut time = SteppedTime {
        now: Duration::ZERO,
        step: Duration::from_millis(20),
    };

    let exit = session.play(&mut pump, &mut time).unwrap();

    assert_eq!(exit, PumpExit::Stopped);
    assert_eq!(session.lives(), -1);
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(drawn.load(Ordering::Relaxed) > 0);
    assert_eq!(
        events.try_iter().collect::<Vec<_>>(),
        vec![
            SessionEvent::LivesChanged(2),
            SessionEvent::LivesChanged(1),
            SessionEvent::LivesChanged(0),
            SessionEvent::LivesChanged(-1),
            SessionEvent::GameOver,
        ]
    );
}

use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::Receiver;
use jumpbuild_engine::{
    FrameControl, FramePump, InputQueue, Key, Level, MonotonicTime, PumpExit, Session, SessionEvent, SimulationConfig,
    SpriteManifest, SpriteRegistry,
};

/// Final state of a headless run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub exit: PumpExit,
    pub score: u32,
    pub lives: i32,
    pub level_won: bool,
}

/// Runs one level against the wall clock with no renderer attached.
///
/// The host is the outermost layer: configuration errors that stop the
/// session surface here as `anyhow` errors.
pub struct HeadlessRunner {
    session: Session,
    pump: FramePump,
    events: Receiver<SessionEvent>,
    input: InputQueue,
    /// Keys held down for the whole run. Pressed again after every restart,
    /// since a restart releases everything.
    held: Vec<Key>,
}

impl HeadlessRunner {
    pub fn new(level: Level, config: SimulationConfig) -> Self {
        let pump = FramePump::new(config.target_fps);
        let mut session = Session::new(level, config);
        let events = session.subscribe();
        Self {
            session,
            pump,
            events,
            input: InputQueue::new(),
            held: Vec::new(),
        }
    }

    /// Read the sprite manifest, the level document and an optional config
    /// from disk.
    pub fn load(manifest: &Path, level: &Path, config: Option<&Path>) -> anyhow::Result<Self> {
        let manifest_json = std::fs::read_to_string(manifest)
            .with_context(|| format!("reading sprite manifest {}", manifest.display()))?;
        let sprites = SpriteRegistry::from_manifest(&SpriteManifest::from_json(&manifest_json)?);
        log::info!("Loaded {} sprites from {}", sprites.len(), manifest.display());

        let level_json = std::fs::read_to_string(level)
            .with_context(|| format!("reading level {}", level.display()))?;
        let level = Level::from_json(&level_json, &sprites)?;

        let config = match config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                SimulationConfig::from_json(&json)?
            }
            None => SimulationConfig::default(),
        };
        Ok(Self::new(level, config))
    }

    pub fn with_held_keys(mut self, keys: Vec<Key>) -> Self {
        self.held = keys;
        self
    }

    /// Play until the session stops or `limit` elapses.
    pub fn run_for(&mut self, limit: Option<Duration>) -> anyhow::Result<RunSummary> {
        let timer = limit.map(|limit| {
            let handle = self.pump.handle();
            thread::spawn(move || {
                thread::sleep(limit);
                handle.cancel();
            })
        });

        let keys = self.session.active_keys();
        let sender = self.input.sender();
        let press_held = || self.held.iter().for_each(|&key| sender.key_down(key));
        let input = &self.input;
        let events = self.events.clone();
        let session = &mut self.session;
        let mut time = MonotonicTime::new();

        session.run();
        press_held();
        let exit = self.pump.run(&mut time, |tick| {
            input.apply_to(&keys);
            let control = session.frame(tick)?;
            if control == FrameControl::Restarted {
                press_held();
            }
            for event in events.try_iter() {
                log_event(event);
            }
            Ok::<_, jumpbuild_engine::EngineError>(control)
        });
        // The timer thread may still be asleep; it exits on its own.
        drop(timer);

        let exit = exit.context("session stopped on a fatal error")?;
        if exit == PumpExit::Cancelled {
            self.session.stop();
        }
        for event in self.events.try_iter() {
            log_event(event);
        }

        Ok(RunSummary {
            exit,
            score: self.session.score(),
            lives: self.session.lives(),
            level_won: self.session.level_won(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

fn log_event(event: SessionEvent) {
    match event {
        SessionEvent::ScoreChanged(score) => log::info!("Score: {score}"),
        SessionEvent::LivesChanged(lives) => log::info!("Lives: {lives}"),
        SessionEvent::LevelWon => log::info!("Level won"),
        SessionEvent::GameOver => log::info!("Game over"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MANIFEST: &str = r#"{"packs": [
        {"name": "protagonist", "sprites": {"protagonist": {
            "properties": {"entityType": "PLAYER", "behavior": "PLAYABLE", "solid": true},
            "sprites": {"idle": [{"path": "p.png", "width": 32, "height": 64}],
                        "walk": [{"path": "p.png", "width": 32, "height": 64}],
                        "jump": [{"path": "p.png", "width": 32, "height": 64}]}}}},
        {"name": "castle", "sprites": {"spikes": {
            "properties": {"entityType": "BLOCK", "behavior": "DAMAGE", "solid": true},
            "sprites": {"idle": [{"path": "s.png", "width": 32, "height": 32}]}}}}
    ]}"#;

    const LEVEL: &str = r#"{"name": "pit", "spritePacks": ["castle"], "entityList": [
        {"entityType": "PLAYER", "sprite": "protagonist.protagonist",
         "properties": {"entityType": "PLAYER", "behavior": "PLAYABLE", "solid": true},
         "position": {"x": 64, "y": 128}},
        {"entityType": "BLOCK", "sprite": "castle.spikes",
         "properties": {"entityType": "BLOCK", "behavior": "DAMAGE", "solid": true},
         "position": {"x": 64, "y": 192}}
    ]}"#;

    #[test]
    fn spikes_run_out_the_lives() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, level, config) = (
            dir.path().join("sprites.json"),
            dir.path().join("pit.json"),
            dir.path().join("config.json"),
        );
        fs::write(&manifest, MANIFEST).unwrap();
        fs::write(&level, LEVEL).unwrap();
        fs::write(&config, r#"{"warmUp": false, "startingLives": 1, "targetFps": 500}"#).unwrap();

        let mut runner = HeadlessRunner::load(&manifest, &level, Some(&config))
            .unwrap()
            .with_held_keys(vec![Key::Right]);
        let summary = runner.run_for(Some(Duration::from_secs(30))).unwrap();

        assert_eq!(summary.exit, PumpExit::Stopped);
        assert_eq!(summary.lives, -1);
        assert!(!summary.level_won);
    }

    #[test]
    fn time_limit_cancels_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, level) = (dir.path().join("sprites.json"), dir.path().join("pit.json"));
        fs::write(&manifest, MANIFEST).unwrap();
        fs::write(&level, LEVEL).unwrap();

        // Default config: the warm-up keeps the player hovering for a second.
        let mut runner = HeadlessRunner::load(&manifest, &level, None).unwrap();
        let summary = runner.run_for(Some(Duration::from_millis(100))).unwrap();

        assert_eq!(summary.exit, PumpExit::Cancelled);
        assert_eq!(summary.lives, 3);
        assert!(!runner.session().is_running());
    }

    #[test]
    fn missing_level_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("sprites.json");
        fs::write(&manifest, MANIFEST).unwrap();
        let Err(err) = HeadlessRunner::load(&manifest, &dir.path().join("nope.json"), None) else {
            panic!("a missing level file loaded");
        };
        assert!(err.to_string().contains("nope.json"));
    }
}

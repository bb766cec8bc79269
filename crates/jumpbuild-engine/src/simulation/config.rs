use serde::{Deserialize, Serialize};

/// Tunable constants of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Viewport width in world units (default: 960).
    pub viewport_width: f32,
    /// Viewport height in world units (default: 640). Anything below it has
    /// fallen out of the level.
    pub viewport_height: f32,
    /// Frame pump rate (default: 120).
    pub target_fps: u32,
    /// Lives of a fresh session (default: 3).
    pub starting_lives: i32,
    /// Walk speed in units per second, before the per-tick cap (default: 150).
    pub delta_multiplier: f32,
    /// Upper bound for pan and enemy speed per tick (default: 100).
    pub delta_cap: f32,
    /// Left scroll border, percent of viewport width (default: 20).
    pub scroll_left_percent: f32,
    /// Right scroll border, percent of viewport width (default: 70).
    pub scroll_right_percent: f32,
    /// Freeze physics and input until the first second boundary after a
    /// (re)start (default: true).
    pub warm_up: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            viewport_width: 960.0,
            viewport_height: 640.0,
            target_fps: 120,
            starting_lives: 3,
            delta_multiplier: 150.0,
            delta_cap: 100.0,
            scroll_left_percent: 20.0,
            scroll_right_percent: 70.0,
            warm_up: true,
        }
    }
}

impl SimulationConfig {
    /// Parse a (possibly partial) config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimulationConfig::from_json(r#"{"targetFps": 60, "warmUp": false}"#).unwrap();
        assert_eq!(config.target_fps, 60);
        assert!(!config.warm_up);
        assert_eq!(config.viewport_width, 960.0);
        assert_eq!(config.starting_lives, 3);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SimulationConfig::from_json("{}").unwrap(), SimulationConfig::default());
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(SimulationConfig::from_json(r#"{"targetFps": "fast"}"#).is_err());
    }
}

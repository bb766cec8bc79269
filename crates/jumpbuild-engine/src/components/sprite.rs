use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::components::animation::Animation;
use crate::components::properties::Properties;
use crate::error::InvalidLevelConfiguration;

/// One image of an animation. Only the metadata is kept; decoding the image
/// is the renderer's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Path of the image inside the asset pack.
    pub path: String,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(path: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

/// Shared handle to a sprite. Many entities point at the same sprite.
pub type SpriteRef = Arc<Sprite>;

/// A named set of animations plus the default properties of entities that
/// use it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Qualified `pack.sprite` name, as written into level documents.
    name: String,
    /// Human-readable name shown by editors.
    display_name: String,
    properties: Properties,
    idle: Vec<Frame>,
    walk: Vec<Frame>,
    jump: Vec<Frame>,
}

impl Sprite {
    /// A sprite with no frames and terrain properties.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            properties: Properties::default(),
            idle: Vec::new(),
            walk: Vec::new(),
            jump: Vec::new(),
        }
    }

    /// A sprite whose three animations all show one `width`×`height` frame.
    pub fn uniform(name: impl Into<String>, properties: Properties, width: f32, height: f32) -> Self {
        let name = name.into();
        let frame = Frame::new(format!("{name}.png"), width, height);
        Self::new(name)
            .with_properties(properties)
            .with_frames(Animation::Idle, vec![frame.clone()])
            .with_frames(Animation::Walk, vec![frame.clone()])
            .with_frames(Animation::Jump, vec![frame])
    }

    // -- Builder pattern --

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_frames(mut self, animation: Animation, frames: Vec<Frame>) -> Self {
        *self.frames_mut(animation) = frames;
        self
    }

    pub fn into_ref(self) -> SpriteRef {
        Arc::new(self)
    }

    // -- Accessors --

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pack part of the qualified name (`day` for `day.cloudL`).
    pub fn pack(&self) -> &str {
        self.name.split_once('.').map_or(self.name.as_str(), |(pack, _)| pack)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn properties(&self) -> Properties {
        self.properties
    }

    pub fn frames(&self, animation: Animation) -> &[Frame] {
        match animation {
            Animation::Idle => &self.idle,
            Animation::Walk => &self.walk,
            Animation::Jump => &self.jump,
        }
    }

    fn frames_mut(&mut self, animation: Animation) -> &mut Vec<Frame> {
        match animation {
            Animation::Idle => &mut self.idle,
            Animation::Walk => &mut self.walk,
            Animation::Jump => &mut self.jump,
        }
    }

    /// Frame `index` of `animation`, wrapping past the end.
    pub fn frame(&self, animation: Animation, index: usize) -> Result<&Frame, InvalidLevelConfiguration> {
        let frames = self.frames(animation);
        if frames.is_empty() {
            return Err(InvalidLevelConfiguration::EmptyAnimation {
                sprite: self.name.clone(),
                animation,
            });
        }
        Ok(&frames[index % frames.len()])
    }
}

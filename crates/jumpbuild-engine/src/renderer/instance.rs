use bytemuck::{Pod, Zeroable};

/// Draw order of the entity groups. The background is drawn before all of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DrawLayer {
    Blocks = 0,
    Enemies = 1,
    Player = 2,
    Items = 3,
}

/// Per-entity draw data handed to the render collaborator.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawInstance {
    /// Screen-space x (camera offset applied).
    pub x: f32,
    /// Screen-space y.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// 1.0 when the frame is mirrored horizontally.
    pub flipped: f32,
    /// [`DrawLayer`] as a float.
    pub layer: f32,
    /// Index into [`DrawList::frame_paths`].
    pub frame_slot: f32,
    /// Frame index within the current animation.
    pub frame_index: f32,
}

impl DrawInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn is_flipped(&self) -> bool {
        self.flipped != 0.0
    }
}

/// Contiguous run of instances sharing a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerBatch {
    pub layer: DrawLayer,
    /// Start index in the instance array.
    pub start: u32,
    /// End index (exclusive).
    pub end: u32,
}

/// Everything needed to draw one frame, in draw order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Qualified sprite name of the backdrop.
    pub background: String,
    pub instances: Vec<DrawInstance>,
    pub layer_batches: Vec<LayerBatch>,
    /// Distinct image paths referenced by `frame_slot`.
    pub frame_paths: Vec<String>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            background: String::new(),
            instances: Vec::with_capacity(512),
            layer_batches: Vec::with_capacity(4),
            frame_paths: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.background.clear();
        self.instances.clear();
        self.layer_batches.clear();
        self.frame_paths.clear();
    }

    /// Slot of `path` in the frame table, adding it if new.
    pub fn frame_slot(&mut self, path: &str) -> u32 {
        match self.frame_paths.iter().position(|p| p == path) {
            Some(i) => i as u32,
            None => {
                self.frame_paths.push(path.to_owned());
                (self.frame_paths.len() - 1) as u32
            }
        }
    }

    pub fn push(&mut self, instance: DrawInstance) {
        self.instances.push(instance);
    }

    /// Close the batch for `layer`, covering every instance pushed since the
    /// previous batch. Empty layers get no batch.
    pub fn end_layer(&mut self, layer: DrawLayer) {
        let start = self.layer_batches.last().map_or(0, |b| b.end);
        let end = self.instance_count();
        if end > start {
            self.layer_batches.push(LayerBatch { layer, start, end });
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Instance data as raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

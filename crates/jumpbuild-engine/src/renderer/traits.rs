//! Boundary to the external render collaborator.
//!
//! The engine never draws. Each frame it builds a [`DrawList`] and hands a
//! borrowed view of it to whatever [`Renderer`] the host attached.

use super::camera::CameraUniform;
use super::instance::{DrawInstance, DrawList, LayerBatch};

/// Renderer trait for drawing backends.
///
/// # Example Implementation
///
/// ```ignore
/// struct CanvasRenderer { /* ... */ }
///
/// impl Renderer for CanvasRenderer {
///     fn backend(&self) -> &'static str { "canvas" }
///
///     fn draw_frame(&mut self, frame: &FrameData) {
///         self.clear_with(frame.background);
///         for inst in frame.instances { /* ... */ }
///     }
/// }
/// ```
pub trait Renderer {
    /// Backend identifier (e.g., "canvas", "wgpu", "terminal")
    fn backend(&self) -> &'static str;

    /// Draw a complete frame: the background, then every instance in order.
    fn draw_frame(&mut self, frame: &FrameData<'_>);

    /// Handle a viewport resize.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Complete frame data for rendering.
pub struct FrameData<'a> {
    /// Qualified sprite name of the backdrop.
    pub background: &'a str,
    /// Instances in draw order: blocks, enemies, player, items.
    pub instances: &'a [DrawInstance],
    pub layer_batches: &'a [LayerBatch],
    /// Image paths indexed by `DrawInstance::frame_slot`.
    pub frame_paths: &'a [String],
    pub camera: CameraUniform,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl<'a> FrameData<'a> {
    pub fn new(list: &'a DrawList, camera: CameraUniform, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            background: &list.background,
            instances: &list.instances,
            layer_batches: &list.layer_batches,
            frame_paths: &list.frame_paths,
            camera,
            viewport_width,
            viewport_height,
        }
    }

    /// Image path of `instance`'s current frame.
    pub fn frame_path(&self, instance: &DrawInstance) -> Option<&'a str> {
        self.frame_paths
            .get(instance.frame_slot as usize)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::camera::ScrollCamera;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(String, usize)>,
    }

    impl Renderer for Recorder {
        fn backend(&self) -> &'static str {
            "recorder"
        }

        fn draw_frame(&mut self, frame: &FrameData<'_>) {
            self.frames.push((frame.background.to_owned(), frame.instances.len()));
        }
    }

    #[test]
    fn frame_data_borrows_draw_list() {
        let mut list = DrawList::new();
        list.background = "day.dayBackground".into();
        let slot = list.frame_slot("hero.png");
        list.push(DrawInstance {
            frame_slot: slot as f32,
            ..Default::default()
        });

        let cam = ScrollCamera::new(960.0, 640.0, 20.0, 70.0);
        let frame = FrameData::new(&list, cam.uniform(), cam.width, cam.height);
        assert_eq!(frame.frame_path(&frame.instances[0]), Some("hero.png"));

        let mut renderer = Recorder::default();
        renderer.draw_frame(&frame);
        renderer.resize(10, 10);
        assert_eq!(renderer.backend(), "recorder");
        assert_eq!(renderer.frames, vec![("day.dayBackground".to_string(), 1)]);
    }
}

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// Side-scrolling camera.
///
/// The camera is a horizontal offset added to world x to obtain screen x. The
/// player is kept between two scroll borders given as fractions of the
/// viewport width; crossing one pans the view.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollCamera {
    /// Viewport width in world units.
    pub width: f32,
    /// Viewport height in world units.
    pub height: f32,
    /// Added to world coordinates to get screen coordinates.
    offset: Vec2,
    /// Screen x below which the view pans left.
    left_border: f32,
    /// Screen x above which the view pans right.
    right_border: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
}

impl ScrollCamera {
    /// `left_percent` and `right_percent` place the scroll borders as a
    /// percentage of `width`.
    pub fn new(width: f32, height: f32, left_percent: f32, right_percent: f32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::ZERO,
            left_border: width / 100.0 * left_percent,
            right_border: width / 100.0 * right_percent,
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn left_border(&self) -> f32 {
        self.left_border
    }

    pub fn right_border(&self) -> f32 {
        self.right_border
    }

    /// Initial placement when a session starts.
    pub fn reset_to(&mut self, player_x: f32) {
        self.offset = Vec2::new(player_x, 0.0);
    }

    /// Place the player on the left scroll border.
    pub fn settle_on(&mut self, player_x: f32) {
        self.offset = Vec2::new(-(player_x - self.left_border), 0.0);
    }

    /// Move the view right by `amount` (negative moves it left).
    pub fn pan(&mut self, amount: f32) {
        self.offset.x -= amount;
    }

    /// Pan toward the player if it crossed a scroll border.
    /// Both borders are checked in turn, the second against the updated view.
    pub fn follow(&mut self, player_x: f32, amount: f32) {
        if self.to_screen_x(player_x) >= self.right_border {
            self.pan(amount);
        }
        if self.to_screen_x(player_x) <= self.left_border {
            self.pan(-amount);
        }
    }

    pub fn to_screen_x(&self, world_x: f32) -> f32 {
        world_x + self.offset.x
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world + self.offset
    }

    /// Whether `y` lies below the bottom edge of the viewport.
    pub fn is_below(&self, y: f32) -> bool {
        y > self.height
    }

    /// Orthographic projection of screen space: origin top-left, Y-down,
    /// Z in [0, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, 0.0, 1.0)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            projection: self.projection_matrix().to_cols_array_2d(),
        }
    }
}

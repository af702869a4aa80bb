//! Letterboxing of the fixed-size logical surface into the window.
//!
//! Scenes always draw in logical coordinates (`GAME_WIDTH` x `GAME_HEIGHT`).
//! The logical surface is scaled uniformly to fit the window and centred, so
//! the bars on the short axis stay empty. Pointer positions go the other way
//! through `screen_to_game`.

use crate::geometry::Rect;
use glam::Vec2;

pub const GAME_WIDTH: f32 = 640.0;
pub const GAME_HEIGHT: f32 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub game_size: Vec2,
    pub window_size: Vec2,
}

impl Viewport {
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            game_size: Vec2::new(GAME_WIDTH, GAME_HEIGHT),
            window_size: Vec2::new(window_width as f32, window_height as f32),
        }
    }

    pub fn resize(&mut self, window_width: u32, window_height: u32) {
        self.window_size = Vec2::new(window_width as f32, window_height as f32);
    }

    pub fn scale_factor(&self) -> f32 {
        let width_scale = self.window_size.x / self.game_size.x;
        let height_scale = self.window_size.y / self.game_size.y;
        width_scale.min(height_scale)
    }

    /// Window-space rect the logical surface is drawn into.
    pub fn letterbox(&self) -> Rect {
        let size = self.game_size * self.scale_factor();
        let offset = (self.window_size - size) * 0.5;
        Rect::from_top_left(offset, size)
    }

    pub fn screen_to_game(&self, screen: Vec2) -> Vec2 {
        let scale = self.scale_factor();
        if scale <= 0.0 {
            return Vec2::ZERO;
        }
        let letterbox = self.letterbox();
        (screen - letterbox.top_left()) / scale
    }
}

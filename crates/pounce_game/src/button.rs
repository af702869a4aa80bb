//! Clickable menu buttons. No physics; a hit test and an action.

use glam::Vec2;
use pounce_core::geometry::Rect;
use pounce_render::SpriteBatch;

use crate::assets::ImageHandle;
use crate::settings::{ButtonSettings, MenuAction};

#[derive(Debug, Clone)]
pub struct Button {
    pub label: String,
    pub action: MenuAction,
    pub rect: Rect,
    pub color: [f32; 4],
    pub hover_color: [f32; 4],
    pub image: Option<ImageHandle>,
    hovered: bool,
}

impl Button {
    pub fn from_settings(settings: &ButtonSettings, image: Option<ImageHandle>) -> Self {
        Self {
            label: settings.label.clone(),
            action: settings.action,
            rect: Rect::from_top_left(
                settings.topleft,
                Vec2::new(settings.width, settings.height),
            ),
            color: settings.color,
            hover_color: settings.hover_color,
            image,
            hovered: false,
        }
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Updates hover state from a pointer position in game coordinates.
    /// Returns true when the state changed.
    pub fn set_hover(&mut self, pointer: Vec2) -> bool {
        let hovered = self.rect.contains_point(pointer);
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    /// The button's action when `pointer` is inside it.
    pub fn click(&self, pointer: Vec2) -> Option<MenuAction> {
        self.rect.contains_point(pointer).then_some(self.action)
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        let color = if self.hovered() {
            self.hover_color
        } else {
            self.color
        };
        batch.push_rect(self.rect, color);
        if let Some(image) = &self.image {
            let (w, h) = image.size();
            // Icon centred in the button, never larger than it.
            let size = Vec2::new(w.min(self.rect.w), h.min(self.rect.h));
            let top_left = self.rect.center() - size * 0.5;
            batch.push_sprite(&image.key, Rect::from_top_left(top_left, size), false);
        }
    }
}

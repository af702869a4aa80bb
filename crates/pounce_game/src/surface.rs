//! Static level geometry the player stands on and bumps into.

use glam::Vec2;
use pounce_core::geometry::{CollisionBox, Rect};
use pounce_render::SpriteBatch;

use crate::assets::ImageHandle;
use crate::collision::{Body, Collidable};
use crate::error::ConfigError;
use crate::settings::SurfaceSettings;

/// Index of a surface inside the scene's `SurfaceSet`. Only meaningful for
/// the set that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(usize);

#[derive(Debug, Clone)]
pub struct Surface {
    pub body: Body,
    pub friction_coefficient: f32,
    pub color: [f32; 4],
    pub visible: bool,
}

impl Surface {
    pub fn from_settings(
        name: &str,
        settings: &SurfaceSettings,
        image: Option<ImageHandle>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            body: Body::from_settings(name, &settings.collidable, image)?,
            friction_coefficient: settings.friction_coefficient,
            color: settings.collidable.color,
            visible: settings.collidable.visible,
        })
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        if !self.visible {
            return;
        }
        match &self.body.image {
            Some(image) => batch.push_sprite(&image.key, self.rect(), false),
            None => batch.push_rect(self.rect(), self.color),
        }
    }
}

impl Collidable for Surface {
    fn rect(&self) -> Rect {
        self.body.rect
    }

    fn collision_box(&self) -> &CollisionBox {
        &self.body.collision_box
    }

    fn last_pos(&self) -> Vec2 {
        self.body.last_pos
    }
}

/// Scene-owned surfaces. Surfaces are never removed while the scene lives,
/// so a `SurfaceId` stays valid until the set is dropped.
#[derive(Debug, Default)]
pub struct SurfaceSet {
    surfaces: Vec<Surface>,
}

impl SurfaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, surface: Surface) -> SurfaceId {
        self.surfaces.push(surface);
        SurfaceId(self.surfaces.len() - 1)
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SurfaceId, &Surface)> {
        self.surfaces
            .iter()
            .enumerate()
            .map(|(index, surface)| (SurfaceId(index), surface))
    }

    /// Collision candidates: hidden surfaces do not block.
    pub fn visible(&self) -> impl Iterator<Item = (SurfaceId, &Surface)> {
        self.iter().filter(|(_, surface)| surface.visible)
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        for surface in &self.surfaces {
            surface.draw(batch);
        }
    }
}

//! Side-scrolling character physics.
//!
//! Velocity is integrated once per fixed step in screen pixels per tick.
//! Horizontal input accelerates towards `speed` over `acceleration_frames`
//! ticks (much more slowly in the air), ground friction comes from the
//! surface the character is standing on, and gravity applies only while
//! airborne. Grounded and airborne are not an explicit enum: a character is
//! airborne while `jumping` is set, and becomes airborne on the next tick once
//! it has nothing to stand on.
//!
//! A tick is `refresh_support` → `move_with` → `resolve` → `handle_collision`.
//! `move_with` only moves provisionally; the collision response undoes any
//! penetration and decides whether the character has landed.

use glam::Vec2;
use pounce_core::geometry::{CollisionBox, Rect};
use pounce_core::input::{InputState, Key};
use pounce_render::SpriteBatch;

use crate::assets::ImageHandle;
use crate::collision::{Body, Collidable, Collision};
use crate::error::ConfigError;
use crate::settings::CharacterSettings;
use crate::surface::{SurfaceId, SurfaceSet};

/// How far the collision box bottom may drift from a surface top and still
/// count as resting on it.
const SUPPORT_EPSILON: f32 = 0.01;

/// Held-key snapshot for one tick. Other keys belong to menus, not physics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub right: bool,
    pub left: bool,
    pub jump: bool,
}

impl MoveInput {
    pub fn from_input(input: &InputState) -> Self {
        Self {
            right: input.is_held(Key::Right),
            left: input.is_held(Key::Left),
            jump: input.is_held(Key::Space) || input.is_held(Key::Up),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Character {
    pub body: Body,
    pub velocity: Vec2,
    pub speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub acceleration_frames: u32,
    pub air_control_divisor: f32,
    pub jumping: bool,
    /// Facing left. Sticky: only a grounded, nonzero horizontal velocity
    /// changes it.
    pub inverted: bool,
    pub standing_on: Option<SurfaceId>,
}

impl Character {
    /// Fails when no image was configured: a character is always drawn.
    pub fn from_settings(
        name: &str,
        settings: &CharacterSettings,
        image: Option<ImageHandle>,
    ) -> Result<Self, ConfigError> {
        if image.is_none() {
            return Err(ConfigError::MissingImage {
                entity: name.to_string(),
            });
        }
        Ok(Self {
            body: Body::from_settings(name, &settings.collidable, image)?,
            velocity: Vec2::ZERO,
            speed: settings.speed,
            jump_speed: settings.jump_speed,
            gravity: settings.gravity,
            terminal_velocity: settings.terminal_velocity,
            acceleration_frames: settings.acceleration_frames,
            air_control_divisor: settings.air_control_divisor,
            jumping: false,
            inverted: false,
            standing_on: None,
        })
    }

    pub fn is_grounded(&self) -> bool {
        !self.jumping
    }

    /// Drops `standing_on` when that surface is gone, hidden, or no longer
    /// directly under the collision box. Walking off a ledge is detected here.
    pub fn refresh_support(&mut self, surfaces: &SurfaceSet) {
        let Some(id) = self.standing_on else {
            return;
        };
        let feet = self.body.collision_box.rect;
        let supported = surfaces
            .get(id)
            .filter(|surface| surface.visible)
            .is_some_and(|surface| {
                let top = surface.body.collision_box.rect;
                (feet.bottom() - top.top()).abs() <= SUPPORT_EPSILON
                    && feet.overlaps_horizontally(&top)
            });
        if !supported {
            log::debug!("Character lost support from {:?}", id);
            self.standing_on = None;
        }
    }

    /// Integrates one tick of input and moves provisionally.
    pub fn move_with(&mut self, input: MoveInput, surfaces: &SurfaceSet) {
        let mut x = self.velocity.x;
        let mut y = 0.0;

        if self.standing_on.is_none() && !self.jumping {
            self.jumping = true;
        }

        let mut step = self.speed / self.acceleration_frames as f32;
        if self.jumping {
            step /= self.air_control_divisor;
        }

        if input.right {
            x += step;
        }
        if input.left {
            x -= step;
        }

        if input.jump && !self.jumping {
            self.jumping = true;
            self.standing_on = None;
            y = -self.jump_speed;
        } else if self.jumping {
            y = self.velocity.y + self.gravity;
        }

        if x != 0.0 && self.is_grounded() {
            self.inverted = x < 0.0;
            let coefficient = self
                .standing_on
                .and_then(|id| surfaces.get(id))
                .map(|surface| surface.friction_coefficient);
            if let Some(coefficient) = coefficient {
                // Capped at |x| so friction stops the character, never reverses it.
                let friction = coefficient.min(x.abs());
                x -= friction.copysign(x);
            }
        }

        self.velocity.x = x.clamp(-self.speed, self.speed);
        self.velocity.y = y.min(self.terminal_velocity);
        self.body.move_by(self.velocity);
    }

    pub fn handle_collision(&mut self, collision: &Collision<SurfaceId>) {
        if collision.is_none() {
            return;
        }
        self.body.translate(collision.displacement());
        if collision.dx != 0.0 {
            self.velocity.x = 0.0;
        }
        if collision.dy != 0.0 {
            self.velocity.y = 0.0;
            if collision.dy < 0.0 {
                self.jumping = false;
            }
        }
        if let Some(id) = collision.bottom {
            self.standing_on = Some(id);
        }
    }

    pub fn reset(&mut self) {
        self.body.reset();
        self.velocity = Vec2::ZERO;
        self.jumping = false;
        self.inverted = false;
        self.standing_on = None;
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        if let Some(image) = &self.body.image {
            batch.push_sprite(&image.key, self.rect(), self.inverted);
        }
    }
}

impl Collidable for Character {
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

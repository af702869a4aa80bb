//! Axis-aligned boxes in screen space (y grows downward).
//!
//! `Rect` is the shared shape for sprite bounds and collision boxes. A
//! `CollisionBox` pairs a rect with per-edge flags: an edge whose flag is off
//! never takes part in collision resolution, even when the rects overlap
//! geometrically. One-way platforms are just surfaces with only `top` set.

use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self::new(top_left.x, top_left.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn set_top_left(&mut self, top_left: Vec2) {
        self.x = top_left.x;
        self.y = top_left.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn translated(self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    /// Strict overlap: rects that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && other.w > 0.0
            && other.h > 0.0
            && self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Inclusive containment; used for pointer hit tests.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// True when the two rects share some horizontal span (touching does not count).
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFlags {
    #[serde(default = "default_edge")]
    pub top: bool,
    #[serde(default = "default_edge")]
    pub left: bool,
    #[serde(default = "default_edge")]
    pub right: bool,
    #[serde(default = "default_edge")]
    pub bottom: bool,
}

impl EdgeFlags {
    pub const ALL: EdgeFlags = EdgeFlags {
        top: true,
        left: true,
        right: true,
        bottom: true,
    };

    pub const NONE: EdgeFlags = EdgeFlags {
        top: false,
        left: false,
        right: false,
        bottom: false,
    };
}

impl Default for EdgeFlags {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    pub rect: Rect,
    pub edges: EdgeFlags,
}

impl CollisionBox {
    pub fn new(rect: Rect, edges: EdgeFlags) -> Self {
        Self { rect, edges }
    }
}

const fn default_edge() -> bool {
    true
}

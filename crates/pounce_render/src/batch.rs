//! CPU-side quad batching.
//!
//! Scenes push sprites and solid rects in paint order; the batch turns them
//! into one vertex/index stream plus a list of draw calls. Consecutive quads
//! that sample the same texture collapse into a single `draw_indexed` range,
//! so a scene made of one tile image costs one bind and one draw.

use pounce_core::geometry::Rect;
use std::sync::Arc;

/// Texture key of the 1x1 white texture used for solid-colour quads.
pub const WHITE_TEXTURE: &str = "__white";

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl SpriteVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCall>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Textured quad covering `rect`. `flip_x` mirrors the image horizontally.
    pub fn push_sprite(&mut self, texture_key: &Arc<str>, rect: Rect, flip_x: bool) {
        let (u0, u1) = if flip_x { (1.0, 0.0) } else { (0.0, 1.0) };
        self.push_quad(texture_key.clone(), rect, [u0, 0.0, u1, 1.0], [1.0; 4]);
    }

    /// Solid-colour quad covering `rect`.
    pub fn push_rect(&mut self, rect: Rect, color: [f32; 4]) {
        self.push_quad(Arc::from(WHITE_TEXTURE), rect, [0.0, 0.0, 1.0, 1.0], color);
    }

    fn push_quad(&mut self, texture_key: Arc<str>, rect: Rect, uv: [f32; 4], color: [f32; 4]) {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        let [u0, v0, u1, v1] = uv;
        let base_index = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&[
            SpriteVertex {
                position: [rect.left(), rect.top()],
                tex_coords: [u0, v0],
                color,
            },
            SpriteVertex {
                position: [rect.right(), rect.top()],
                tex_coords: [u1, v0],
                color,
            },
            SpriteVertex {
                position: [rect.right(), rect.bottom()],
                tex_coords: [u1, v1],
                color,
            },
            SpriteVertex {
                position: [rect.left(), rect.bottom()],
                tex_coords: [u0, v1],
                color,
            },
        ]);

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(texture_key, draw_start, 6);
    }

    fn push_draw_call(&mut self, texture_key: Arc<str>, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if *last.texture_key == *texture_key && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture_key,
            index_start,
            index_count,
        });
    }
}

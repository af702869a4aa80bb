//! Frame submission: uploads the CPU batch and draws it into the letterbox.
//!
//! The mesh is rebuilt on the CPU each frame and streamed into GPU buffers
//! that grow (power-of-two) but never shrink. The window is cleared to the
//! bar colour first; the viewport is then narrowed to the letterbox rect so
//! logical coordinates map onto the scaled surface.

use std::collections::HashMap;
use std::sync::Arc;

use pounce_core::geometry::Rect;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::batch::{SpriteBatch, SpriteVertex, WHITE_TEXTURE};
use crate::camera::Camera2D;
use crate::gpu_context::GpuContext;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::Texture;

const BAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

struct GpuSpriteTexture {
    #[allow(dead_code)]
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

pub struct Renderer {
    gpu: GpuContext,
    sprite_pipeline: SpritePipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, camera: &Camera2D) -> Result<Self, String> {
        let gpu = GpuContext::new(window)?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);

        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut renderer = Self {
            gpu,
            sprite_pipeline,
            camera_buffer,
            camera_bind_group,
            vertex_buffer,
            index_buffer,
            vertex_capacity: 1,
            index_capacity: 1,
            textures: HashMap::new(),
        };
        let white = Texture::from_rgba8(
            &renderer.gpu.device,
            &renderer.gpu.queue,
            &[255, 255, 255, 255],
            1,
            1,
            WHITE_TEXTURE,
        );
        renderer.insert_texture(Arc::from(WHITE_TEXTURE), white);
        Ok(renderer)
    }

    pub fn size(&self) -> (u32, u32) {
        self.gpu.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    pub fn has_texture(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    pub fn upload_texture(&mut self, key: Arc<str>, image: &image::RgbaImage) {
        let texture = Texture::from_image(&self.gpu.device, &self.gpu.queue, image, &key);
        log::debug!(
            "Uploaded texture '{}' ({}x{})",
            key,
            texture.size.0,
            texture.size.1
        );
        self.insert_texture(key, texture);
    }

    fn insert_texture(&mut self, key: Arc<str>, texture: Texture) {
        let bind_group = self
            .sprite_pipeline
            .create_texture_bind_group(&self.gpu.device, &texture);
        self.textures.insert(
            key,
            GpuSpriteTexture {
                texture,
                bind_group,
            },
        );
    }

    pub fn render(&mut self, batch: &SpriteBatch, camera: &Camera2D, letterbox: Rect) {
        if self.gpu.size.0 == 0 || self.gpu.size.1 == 0 {
            return;
        }

        self.ensure_mesh_capacity(batch.vertices().len(), batch.indices().len());
        if !batch.vertices().is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(batch.vertices()),
            );
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(batch.indices()));
        }
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.build_uniform()]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if letterbox.w >= 1.0 && letterbox.h >= 1.0 && !batch.draw_calls().is_empty() {
                render_pass.set_viewport(
                    letterbox.x,
                    letterbox.y,
                    letterbox.w,
                    letterbox.h,
                    0.0,
                    1.0,
                );
                render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                let mut last_bound: Option<&Arc<str>> = None;
                for draw in batch.draw_calls() {
                    let Some(texture) = self.textures.get(&draw.texture_key) else {
                        log::warn!("Skipping draw with missing texture '{}'", draw.texture_key);
                        continue;
                    };
                    if last_bound.is_none_or(|last| **last != *draw.texture_key) {
                        render_pass.set_bind_group(1, &texture.bind_group, &[]);
                        last_bound = Some(&draw.texture_key);
                    }
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.vertex_capacity);
        }
        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.index_capacity);
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

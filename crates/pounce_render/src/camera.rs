use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Orthographic camera over the logical surface. `position` is the world
/// coordinate shown at the top-left corner; y grows downward.
pub struct Camera2D {
    pub position: Vec2,
    pub view_size: Vec2,
}

impl Camera2D {
    pub fn new(view_width: f32, view_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            view_size: Vec2::new(view_width, view_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let proj = Mat4::orthographic_rh(
            self.position.x,
            self.position.x + self.view_size.x,
            self.position.y + self.view_size.y,
            self.position.y,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

use glam::{Mat4, Vec3};

/// First-person viewpoint. `z` grows downward into the terrain, so larger
/// heights sit lower on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Pitch, radians.
    pub rot_x: f32,
    /// Yaw, radians. Also orients horizontal movement.
    pub rot_y: f32,
    /// Roll, radians.
    pub rot_z: f32,
}

impl Camera {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rot_x: rotation.x,
            rot_y: rotation.y,
            rot_z: rotation.z,
        }
    }

    pub fn build_world_matrix(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    pub fn build_view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_z(self.rot_z)
            * Mat4::from_rotation_y(self.rot_y)
            * Mat4::from_rotation_x(self.rot_x)
    }

    pub fn build_view_world_matrix(&self) -> Mat4 {
        self.build_view_matrix() * self.build_world_matrix()
    }
}

pub struct Projection {
    aspect: f32,
    fovy: f32,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: f32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy,
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn build_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

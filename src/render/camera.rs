use glam::{Mat4, Vec3};

/// Perspective camera driven by yaw and pitch (radians).
///
/// Yaw 0 looks down +X, positive pitch looks up.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, fov: f32, aspect_ratio: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov,
            aspect_ratio,
            near: 0.1,
            far: 1500.0,
        }
    }

    /// Unit view direction.
    pub fn front(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Points the camera along `direction`. Zero vectors are ignored.
    pub fn look_along(&mut self, direction: Vec3) {
        let Some(direction) = direction.try_normalize() else {
            return;
        };
        self.pitch = direction.y.clamp(-1.0, 1.0).asin();
        self.yaw = direction.z.atan2(direction.x);
    }

    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        let limit = std::f32::consts::FRAC_PI_2 - 0.001;
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-limit, limit);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn projection_view(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

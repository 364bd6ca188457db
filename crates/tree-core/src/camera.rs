//! Camera description and the follower that turns the scene toward the pointer.

use crate::constants::*;
use crate::math::lerp;
use glam::{EulerRot, Mat4, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: CAMERA_EYE,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: 0.1,
            zfar: 200.0,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

/// Smoothly rotates the wrapping group toward angles derived from the camera target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraFollower {
    /// Rotation around X (looking up/down).
    pub pitch: f32,
    /// Rotation around Y (looking left/right).
    pub yaw: f32,
}

impl CameraFollower {
    #[inline]
    pub fn target_angles(camera_target: Vec2) -> (f32, f32) {
        (
            camera_target.y * CAMERA_PITCH_GAIN,
            camera_target.x * CAMERA_YAW_GAIN,
        )
    }

    pub fn tick(&mut self, dt_sec: f32, camera_target: Vec2) {
        let (pitch, yaw) = Self::target_angles(camera_target);
        let t = (dt_sec.max(0.0) * CAMERA_FOLLOW_RATE).min(1.0);
        let next_pitch = lerp(self.pitch, pitch, t);
        let next_yaw = lerp(self.yaw, yaw, t);
        // A non-finite target leaves the group where it was.
        if next_pitch.is_finite() && next_yaw.is_finite() {
            self.pitch = next_pitch;
            self.yaw = next_yaw;
        }
    }

    pub fn group_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.pitch, self.yaw, 0.0)
    }
}

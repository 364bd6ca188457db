//! Flat per-instance records uploaded verbatim to GPU instance buffers.

use crate::config::Material;
use glam::{EulerRot, Mat4, Quat, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    /// rgb + opacity
    pub color: [f32; 4],
    /// rgb + intensity
    pub emissive: [f32; 4],
    /// metalness, roughness, unlit flag, unused
    pub surface: [f32; 4],
}

impl InstanceRaw {
    pub fn new(position: Vec3, rotation: Vec3, scale: f32, material: &Material) -> Self {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(scale),
            Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z),
            position,
        );
        Self::from_model(model, material, false)
    }

    pub fn from_model(model: Mat4, material: &Material, unlit: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [
                material.color[0],
                material.color[1],
                material.color[2],
                material.opacity,
            ],
            emissive: [
                material.emissive[0],
                material.emissive[1],
                material.emissive[2],
                material.emissive_intensity,
            ],
            surface: [
                material.metalness,
                material.roughness,
                if unlit { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }

    /// Translation column of the model matrix.
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

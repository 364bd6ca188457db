//! Shader-driven point clouds.
//!
//! For tens of thousands of points the per-point blend happens on the GPU:
//! each point carries both targets as static attributes, and only a handful
//! of uniforms (`progress`, `pointer_world`, `time`) change per frame.

use crate::constants::*;
use crate::math::{
    chaos_position, formed_position, lerp, pseudo_random, smoothstep, ConeOptions,
};
use crate::state::Mode;
use glam::{Vec2, Vec3};

/// Static attributes of one foliage point.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FoliagePoint {
    pub formed: [f32; 3],
    pub chaos: [f32; 3],
    pub random: f32,
}

/// Static attributes of one ambient mote.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AuraPoint {
    pub position: [f32; 3],
    pub random: f32,
    pub size: f32,
}

/// Per-frame uniforms shared by both point fields.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FieldUniforms {
    pub pointer_world: [f32; 2],
    pub progress: f32,
    pub time: f32,
    pub pointer_radius: f32,
    pub _pad: [f32; 3],
}

/// Smooth `progress` toward `target`, tolerant of long frame gaps.
#[inline]
pub fn advance_progress(progress: f32, target: f32, dt_sec: f32) -> f32 {
    let dt = if dt_sec.is_finite() {
        dt_sec.clamp(0.0, PROGRESS_MAX_DT)
    } else {
        0.0
    };
    let next = lerp(progress, target, dt * PROGRESS_RATE);
    if next.is_finite() {
        next.clamp(0.0, 1.0)
    } else {
        target
    }
}

/// CPU mirror of the vertex-shader blend, used for picking and tests.
pub fn blend_point(point: &FoliagePoint, progress: f32, time: f32) -> Vec3 {
    let formed = Vec3::from(point.formed);
    let r = point.random;
    let chaos = Vec3::from(point.chaos)
        + Vec3::new(
            (time * r + formed.x).sin(),
            (time * r * 0.8 + formed.y).cos(),
            (time * 0.5 + formed.z).sin(),
        ) * FOLIAGE_CHAOS_WOBBLE;
    formed + (chaos - formed) * smoothstep(0.0, 1.0, progress)
}

pub fn generate_foliage(count: usize) -> Vec<FoliagePoint> {
    let cone = ConeOptions::layered(FOLIAGE_LAYERS, FOLIAGE_LAYER_GAP, FOLIAGE_JITTER);
    (0..count)
        .map(|i| {
            let seed = i as f64;
            let formed = formed_position(i, count, FOLIAGE_RADIUS, FOLIAGE_HEIGHT, &cone);
            let radius =
                FOLIAGE_CHAOS_BASE + pseudo_random(seed * 1.73 + 5.0) * FOLIAGE_CHAOS_SPREAD;
            let chaos = chaos_position(radius, Some(seed * 2.11));
            FoliagePoint {
                formed: formed.to_array(),
                chaos: chaos.to_array(),
                random: pseudo_random(seed * 3.17 + 1.0),
            }
        })
        .collect()
}

pub fn generate_aura(count: usize) -> Vec<AuraPoint> {
    (0..count)
        .map(|i| {
            let seed = i as f64;
            let x = (pseudo_random(seed * 1.1) - 0.5) * AURA_EXTENT.x;
            let y = (pseudo_random(seed * 2.2 + 1.0) - 0.5) * AURA_EXTENT.y;
            let z = (pseudo_random(seed * 3.3 + 2.0) - 0.5) * AURA_EXTENT.z + AURA_Z_OFFSET;
            AuraPoint {
                position: [x, y, z],
                random: pseudo_random(seed * 4.4 + 3.0),
                size: AURA_SIZE_MIN + pseudo_random(seed * 5.5 + 4.0) * AURA_SIZE_SPAN,
            }
        })
        .collect()
}

/// Foliage population plus its single smoothed `progress` scalar.
pub struct FoliageField {
    points: Vec<FoliagePoint>,
    progress: f32,
    uniforms: FieldUniforms,
}

impl FoliageField {
    pub fn new(count: usize) -> Self {
        Self {
            points: generate_foliage(count),
            progress: 0.0,
            uniforms: FieldUniforms {
                pointer_radius: FOLIAGE_POINTER_RADIUS,
                ..FieldUniforms::default()
            },
        }
    }

    pub fn tick(
        &mut self,
        dt_sec: f32,
        elapsed_sec: f32,
        mode: Mode,
        pointer: Vec2,
    ) -> FieldUniforms {
        self.progress = advance_progress(self.progress, mode.progress_target(), dt_sec);
        let pointer_world = pointer * FOLIAGE_POINTER_SCALE;
        self.uniforms = FieldUniforms {
            pointer_world: pointer_world.to_array(),
            progress: self.progress,
            time: elapsed_sec,
            pointer_radius: FOLIAGE_POINTER_RADIUS,
            _pad: [0.0; 3],
        };
        self.uniforms
    }

    pub fn points(&self) -> &[FoliagePoint] {
        &self.points
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn uniforms(&self) -> FieldUniforms {
        self.uniforms
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Background motes; static positions, animated entirely in the shader.
pub struct AuraField {
    points: Vec<AuraPoint>,
    uniforms: FieldUniforms,
}

impl AuraField {
    pub fn new(count: usize) -> Self {
        Self {
            points: generate_aura(count),
            uniforms: FieldUniforms {
                pointer_radius: AURA_POINTER_RADIUS,
                ..FieldUniforms::default()
            },
        }
    }

    pub fn tick(&mut self, elapsed_sec: f32, pointer: Vec2) -> FieldUniforms {
        self.uniforms.pointer_world = (pointer * AURA_POINTER_SCALE).to_array();
        self.uniforms.time = elapsed_sec;
        self.uniforms
    }

    pub fn points(&self) -> &[AuraPoint] {
        &self.points
    }

    pub fn uniforms(&self) -> FieldUniforms {
        self.uniforms
    }
}

//! Deterministic placement of particles on the tree cone and the chaos shell.
//!
//! Everything here is a pure function of its arguments (apart from
//! [`chaos_position`] without a seed), so regenerating a batch never
//! reshuffles particles that are already on screen.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Angular increment of the spiral, `π(3 − √5)` radians.
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Hash-like generator returning a reproducible value in `[0, 1)`.
///
/// Evaluated in double precision: the seeds used for large batches reach the
/// tens of thousands, where an `f32` sine loses most of its fractional bits.
#[inline]
pub fn pseudo_random(seed: f64) -> f32 {
    let x = (seed * 12.9898).sin() * 43758.5453;
    let frac = (x - x.floor()) as f32;
    // Rounding to f32 can land exactly on 1.0
    if frac >= 1.0 {
        0.0
    } else {
        frac
    }
}

/// Shape options for [`formed_position`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeOptions {
    /// Number of horizontal bands; `1` disables layering.
    pub layers: u32,
    /// Fraction (0..1) of each band left empty.
    pub layer_gap: f32,
    /// Amplitude of the horizontal per-index jitter.
    pub jitter: f32,
}

impl Default for ConeOptions {
    fn default() -> Self {
        Self {
            layers: 1,
            layer_gap: 0.08,
            jitter: 0.2,
        }
    }
}

impl ConeOptions {
    pub fn layered(layers: u32, layer_gap: f32, jitter: f32) -> Self {
        Self {
            layers,
            layer_gap,
            jitter,
        }
    }
}

/// Normalized rank of `index` within a population of `total`.
#[inline]
pub fn normalized_rank(index: usize, total: usize) -> f32 {
    index as f32 / total.saturating_sub(1).max(1) as f32
}

/// Compress `u` into stacked bands so a `layer_gap` share of each band stays empty.
pub fn layered_height(u: f32, layers: u32, layer_gap: f32) -> f32 {
    if layers <= 1 {
        return u;
    }
    let layers_f = layers as f32;
    let per_layer = 1.0 / layers_f;
    let gap = layer_gap * per_layer;
    let layer_index = ((u * layers_f).floor()).clamp(0.0, layers_f - 1.0);
    let layer_start = layer_index * per_layer;
    let local = (u - layer_start) / per_layer;
    (layer_start + local * (per_layer - gap)).clamp(0.0, 1.0)
}

/// Spiral angle of `index`; depends on nothing else.
#[inline]
pub fn spiral_angle(index: usize) -> f32 {
    GOLDEN_ANGLE * index as f32
}

/// Position of `index` on a cone of base `radius` and `height`, centered vertically.
pub fn formed_position(
    index: usize,
    total: usize,
    radius: f32,
    height: f32,
    options: &ConeOptions,
) -> Vec3 {
    let u = layered_height(
        normalized_rank(index, total),
        options.layers,
        options.layer_gap,
    );
    let y_raw = u * height;
    let r = if height > 0.0 {
        radius * (1.0 - y_raw / height)
    } else {
        radius
    };
    let theta = spiral_angle(index);

    let seed = index as f64;
    let jitter_x = (pseudo_random(seed * 1.23 + 0.1) - 0.5) * options.jitter;
    let jitter_z = (pseudo_random(seed * 1.57 + 0.7) - 0.5) * options.jitter;

    Vec3::new(
        theta.cos() * r + jitter_x,
        y_raw - height / 2.0,
        theta.sin() * r + jitter_z,
    )
}

/// Point on a sphere of `radius`, uniform over the surface.
///
/// `v` goes through `acos(2v − 1)` so the points do not bunch up at the poles.
/// Without a seed the point is drawn from the thread RNG.
pub fn chaos_position(radius: f32, seed: Option<f64>) -> Vec3 {
    let (u, v) = match seed {
        Some(s) => (pseudo_random(s), pseudo_random(s + 1.0)),
        None => (rand::random::<f32>(), rand::random::<f32>()),
    };
    sphere_point(radius, u, v)
}

#[inline]
fn sphere_point(radius: f32, u: f32, v: f32) -> Vec3 {
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

/// Hermite smoothstep on `[edge0, edge1]`, same as the WGSL builtin.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map a seeded value to a symmetric angle in `[-span/2, span/2)`.
#[inline]
pub fn centered_jitter(seed: f64, span: f32) -> f32 {
    (pseudo_random(seed) - 0.5) * span
}

/// Euler angles in `[0, π)` for the first two axes.
#[inline]
pub fn seeded_half_turns(seed_x: f64, seed_y: f64) -> Vec3 {
    Vec3::new(pseudo_random(seed_x) * PI, pseudo_random(seed_y) * PI, 0.0)
}

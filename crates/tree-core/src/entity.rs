//! Dual-target entities and the smoothing step that moves them.

use crate::state::Mode;
use glam::Vec3;

/// Exponential smoothing toward `dest`. `rate` is clamped into `(0, 1]`.
#[inline]
pub fn smooth_toward(current: Vec3, dest: Vec3, rate: f32) -> Vec3 {
    let rate = if rate.is_nan() {
        1.0
    } else {
        rate.clamp(f32::EPSILON, 1.0)
    };
    current + (dest - current) * rate
}

/// Static look of an entity, derived once from its index.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Decoration {
    pub scale: f32,
    /// Base euler angles (XYZ).
    pub rotation: Vec3,
    /// Extra roll around the viewing axis.
    pub tilt: f32,
}

/// One visual element with its two precomputed destinations.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub index: usize,
    pub total: usize,
    pub formed: Vec3,
    pub chaos: Vec3,
    pub current: Vec3,
    pub decoration: Decoration,
}

impl Entity {
    /// New entity resting at its formed position.
    pub fn new(index: usize, total: usize, formed: Vec3, chaos: Vec3) -> Self {
        Self {
            index,
            total,
            formed,
            chaos,
            current: formed,
            decoration: Decoration {
                scale: 1.0,
                ..Decoration::default()
            },
        }
    }

    pub fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decoration = decoration;
        self
    }

    #[inline]
    pub fn destination(&self, mode: Mode) -> Vec3 {
        match mode {
            Mode::Chaos => self.chaos,
            Mode::Formed => self.formed,
        }
    }

    /// Advance `current` one step toward `dest`, snapping home if the result is not finite.
    #[inline]
    pub fn step(&mut self, dest: Vec3, rate: f32) -> Vec3 {
        let next = smooth_toward(self.current, dest, rate);
        self.current = if next.is_finite() { next } else { self.formed };
        self.current
    }

    #[inline]
    pub fn distance_to(&self, mode: Mode) -> f32 {
        self.current.distance(self.destination(mode))
    }
}

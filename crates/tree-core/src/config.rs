//! Explicit configuration for every batch in the scene.
//!
//! Each recognized option is a field with a documented default; the whole
//! composition is validated once before any entity is generated.

use crate::constants::*;
use crate::error::ConfigError;
use crate::math::ConeOptions;

/// Kind of instanced ornament. Decides geometry, motion and smoothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrnamentKind {
    Gift,
    Bauble,
    Light,
    Bow,
}

/// How a batch moves once it has left the formed position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionStyle {
    /// Wobbling chaos destination and an accumulated spin.
    Tumble,
    /// Rotation driven by elapsed time while dispersed.
    Twirl,
}

/// Cone and shell used to place one batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub radius: f32,
    pub height: f32,
    pub cone: ConeOptions,
    /// Chaos shell radius is `chaos_base + pr(seed) * chaos_spread`.
    pub chaos_base: f32,
    pub chaos_spread: f32,
    /// Multipliers/offsets feeding the per-index seeds.
    pub chaos_radius_seed: (f64, f64),
    pub chaos_seed_step: f64,
}

impl OrnamentKind {
    pub fn label(self) -> &'static str {
        match self {
            OrnamentKind::Gift => "gift",
            OrnamentKind::Bauble => "bauble",
            OrnamentKind::Light => "light",
            OrnamentKind::Bow => "bow",
        }
    }

    pub fn motion(self) -> MotionStyle {
        match self {
            OrnamentKind::Bow => MotionStyle::Twirl,
            _ => MotionStyle::Tumble,
        }
    }

    /// Smoothing rate toward the formed / chaos destination.
    pub fn smoothing(self) -> (f32, f32) {
        match self {
            OrnamentKind::Gift => (0.05, 0.05),
            OrnamentKind::Bauble => (0.08, 0.08),
            OrnamentKind::Light => (0.12, 0.12),
            OrnamentKind::Bow => (0.05, 0.08),
        }
    }

    pub fn placement(self) -> Placement {
        match self {
            OrnamentKind::Bow => Placement {
                radius: 7.2,
                height: 13.5,
                cone: ConeOptions::layered(12, 0.15, 0.35),
                chaos_base: 23.0,
                chaos_spread: 12.0,
                chaos_radius_seed: (1.41, 9.0),
                chaos_seed_step: 2.74,
            },
            _ => Placement {
                radius: 6.8,
                height: 15.0,
                cone: ConeOptions::layered(14, 0.12, 0.25),
                chaos_base: 20.0,
                chaos_spread: 15.0,
                chaos_radius_seed: (1.87, 2.0),
                chaos_seed_step: 2.33,
            },
        }
    }
}

/// Resolved surface parameters handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub opacity: f32,
}

/// One instanced ornament batch. Unset options fall back to per-kind defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct OrnamentConfig {
    pub kind: OrnamentKind,
    pub count: usize,
    /// Base color, default gold.
    pub color: [f32; 3],
    /// Uniform scale multiplier, default 1.
    pub scale: f32,
    /// Default 0 for lights, 0.8 otherwise.
    pub metalness: Option<f32>,
    /// Default 0.2.
    pub roughness: Option<f32>,
    /// Default: the base color for lights, black otherwise.
    pub emissive: Option<[f32; 3]>,
    /// Default 2 for lights, 0 otherwise.
    pub emissive_intensity: Option<f32>,
    /// Default 1 (opaque).
    pub opacity: Option<f32>,
}

pub const GOLD: [f32; 3] = [1.0, 0.843, 0.0];

impl OrnamentConfig {
    pub fn new(kind: OrnamentKind, count: usize) -> Self {
        Self {
            kind,
            count,
            color: GOLD,
            scale: 1.0,
            metalness: None,
            roughness: None,
            emissive: None,
            emissive_intensity: None,
            opacity: None,
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = Some(metalness);
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = Some(roughness);
        self
    }

    pub fn with_emissive(mut self, emissive: [f32; 3], intensity: f32) -> Self {
        self.emissive = Some(emissive);
        self.emissive_intensity = Some(intensity);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn label(&self) -> String {
        format!("{}x{}", self.kind.label(), self.count)
    }

    pub fn material(&self) -> Material {
        let is_light = self.kind == OrnamentKind::Light;
        Material {
            color: self.color,
            metalness: self
                .metalness
                .unwrap_or(if is_light { 0.0 } else { 0.8 }),
            roughness: self.roughness.unwrap_or(0.2),
            emissive: self
                .emissive
                .unwrap_or(if is_light { self.color } else { [0.0; 3] }),
            emissive_intensity: self
                .emissive_intensity
                .unwrap_or(if is_light { 2.0 } else { 0.0 }),
            opacity: self.opacity.unwrap_or(1.0),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let batch = self.label();
        if self.count == 0 {
            return Err(ConfigError::EmptyBatch { batch });
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::InvalidScale {
                batch,
                value: self.scale,
            });
        }
        let material = self.material();
        let unit_fields = [
            ("color.r", material.color[0]),
            ("color.g", material.color[1]),
            ("color.b", material.color[2]),
            ("emissive.r", material.emissive[0]),
            ("emissive.g", material.emissive[1]),
            ("emissive.b", material.emissive[2]),
            ("metalness", material.metalness),
            ("roughness", material.roughness),
            ("opacity", material.opacity),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange {
                    batch,
                    field,
                    value,
                });
            }
        }
        if material.emissive_intensity.is_nan() || material.emissive_intensity < 0.0 {
            return Err(ConfigError::NegativeEmissive {
                batch,
                value: material.emissive_intensity,
            });
        }
        Ok(())
    }
}

/// The whole composition rendered by the front ends.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub foliage_count: usize,
    pub aura_count: usize,
    pub ornaments: Vec<OrnamentConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        use OrnamentKind::*;
        let rgb = |hex: &str| parse_hex_color(hex).unwrap_or(GOLD);
        Self {
            foliage_count: FOLIAGE_COUNT,
            aura_count: AURA_COUNT,
            ornaments: vec![
                OrnamentConfig::new(Gift, 70)
                    .with_color(rgb("#8B0000"))
                    .with_scale(0.8),
                OrnamentConfig::new(Gift, 50).with_scale(0.75),
                OrnamentConfig::new(Gift, 40)
                    .with_color(rgb("#0D8F5A"))
                    .with_scale(0.7),
                OrnamentConfig::new(Bauble, 150)
                    .with_color(rgb("#C0C0C0"))
                    .with_scale(0.5),
                OrnamentConfig::new(Bauble, 150)
                    .with_color(rgb("#FF0000"))
                    .with_scale(0.5),
                OrnamentConfig::new(Bauble, 100)
                    .with_color(rgb("#5BC7FF"))
                    .with_scale(0.55)
                    .with_metalness(0.65)
                    .with_roughness(0.25)
                    .with_opacity(0.85),
                OrnamentConfig::new(Light, 400).with_scale(0.12),
                OrnamentConfig::new(Bow, 60)
                    .with_color(rgb("#FF9FD6"))
                    .with_scale(0.8)
                    .with_metalness(0.5)
                    .with_roughness(0.35),
            ],
        }
    }
}

impl SceneConfig {
    /// Validate the composition; an empty foliage or aura field is allowed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for ornament in &self.ornaments {
            ornament.validate()?;
        }
        Ok(())
    }

    /// Smaller composition for tests and low-end targets.
    pub fn scaled(&self, factor: f32) -> Self {
        let shrink = |n: usize| ((n as f32 * factor).round() as usize).max(1);
        Self {
            foliage_count: ((self.foliage_count as f32 * factor).round()) as usize,
            aura_count: ((self.aura_count as f32 * factor).round()) as usize,
            ornaments: self
                .ornaments
                .iter()
                .map(|o| OrnamentConfig {
                    count: shrink(o.count),
                    ..o.clone()
                })
                .collect(),
        }
    }
}

/// Parse `#RRGGBB` into linear-ish unit floats.
pub fn parse_hex_color(hex: &str) -> Result<[f32; 3], ConfigError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(ConfigError::InvalidColor(hex.to_string()));
    }
    let mut out = [0.0f32; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| ConfigError::InvalidColor(hex.to_string()))?;
        *slot = byte as f32 / 255.0;
    }
    Ok(out)
}

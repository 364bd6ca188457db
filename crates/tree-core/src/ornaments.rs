//! CPU-driven instanced batches (gifts, baubles, lights, bows).
//!
//! Every entity is smoothed individually each tick so it can carry its own
//! rotation and scale; the resulting transforms are written into one flat
//! buffer per batch, ready for a single upload per frame.

use crate::config::{Material, MotionStyle, OrnamentConfig};
use crate::constants::{
    BOW_SPIN_X_PER_SEC, BOW_SPIN_Y_PER_SEC, ORNAMENT_SPIN_PER_SEC, ORNAMENT_WOBBLE,
    PROGRESS_MAX_DT,
};
use crate::entity::{Decoration, Entity};
use crate::instance::InstanceRaw;
use crate::math::{
    centered_jitter, chaos_position, formed_position, pseudo_random, seeded_half_turns,
};
use crate::state::Mode;
use fnv::FnvHasher;
use glam::Vec3;
use std::hash::{Hash, Hasher};

/// Key over the parameters that shape a batch's entities.
///
/// Material changes keep the version; count/scale/kind changes regenerate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchVersion(u64);

impl BatchVersion {
    pub fn of(config: &OrnamentConfig) -> Self {
        let mut hasher = FnvHasher::default();
        config.kind.hash(&mut hasher);
        config.count.hash(&mut hasher);
        config.scale.to_bits().hash(&mut hasher);
        Self(hasher.finish())
    }
}

pub struct OrnamentBatch {
    config: OrnamentConfig,
    material: Material,
    version: BatchVersion,
    entities: Vec<Entity>,
    instances: Vec<InstanceRaw>,
}

impl OrnamentBatch {
    pub fn new(config: OrnamentConfig) -> Self {
        let entities = build_entities(&config);
        let material = config.material();
        let instances = entities
            .iter()
            .map(|e| {
                InstanceRaw::new(
                    e.current,
                    e.decoration.rotation,
                    e.decoration.scale,
                    &material,
                )
            })
            .collect();
        Self {
            version: BatchVersion::of(&config),
            material,
            config,
            entities,
            instances,
        }
    }

    /// Adopt `config`. Returns `true` when the batch had to be regenerated.
    pub fn sync(&mut self, config: &OrnamentConfig) -> bool {
        let version = BatchVersion::of(config);
        if version == self.version {
            self.material = config.material();
            self.config = config.clone();
            return false;
        }
        log::info!(
            "[ornaments] rebuilding {} -> {}",
            self.config.label(),
            config.label()
        );
        *self = Self::new(config.clone());
        true
    }

    pub fn tick(&mut self, dt_sec: f32, elapsed_sec: f32, mode: Mode) {
        let chaos = mode.is_chaos();
        let motion = self.config.kind.motion();
        // Per-frame nudge on top of the base pose; never accumulated.
        let spin = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, PROGRESS_MAX_DT) * ORNAMENT_SPIN_PER_SEC
        } else {
            0.0
        };
        let (formed_rate, chaos_rate) = self.config.kind.smoothing();
        let rate = if chaos { chaos_rate } else { formed_rate };

        for (entity, slot) in self.entities.iter_mut().zip(self.instances.iter_mut()) {
            let i = entity.index as f32;
            let mut dest = entity.destination(mode);
            if chaos && motion == MotionStyle::Tumble {
                dest += Vec3::new(
                    (elapsed_sec + i).sin() * ORNAMENT_WOBBLE,
                    (elapsed_sec * 0.8 + i).cos() * ORNAMENT_WOBBLE,
                    0.0,
                );
            }
            let position = entity.step(dest, rate);
            let deco = entity.decoration;
            let rotation = match (motion, chaos) {
                (MotionStyle::Tumble, true) => deco.rotation + Vec3::new(spin, spin, 0.0),
                (MotionStyle::Tumble, false) => deco.rotation,
                (MotionStyle::Twirl, true) => Vec3::new(
                    elapsed_sec * BOW_SPIN_X_PER_SEC + i,
                    elapsed_sec * BOW_SPIN_Y_PER_SEC,
                    deco.tilt,
                ),
                (MotionStyle::Twirl, false) => Vec3::new(0.0, 0.0, deco.tilt),
            };
            *slot = InstanceRaw::new(position, rotation, deco.scale, &self.material);
        }
    }

    pub fn config(&self) -> &OrnamentConfig {
        &self.config
    }

    pub fn version(&self) -> BatchVersion {
        self.version
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn instances(&self) -> &[InstanceRaw] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn build_entities(config: &OrnamentConfig) -> Vec<Entity> {
    let count = config.count;
    let placement = config.kind.placement();
    let (radius_mul, radius_add) = placement.chaos_radius_seed;
    (0..count)
        .map(|i| {
            let seed = i as f64;
            let formed = formed_position(
                i,
                count,
                placement.radius,
                placement.height,
                &placement.cone,
            );
            let chaos_radius = placement.chaos_base
                + pseudo_random(seed * radius_mul + radius_add) * placement.chaos_spread;
            let chaos = chaos_position(chaos_radius, Some(seed * placement.chaos_seed_step));
            let decoration = match config.kind.motion() {
                MotionStyle::Tumble => Decoration {
                    scale: config.scale * (0.8 + pseudo_random(seed * 3.12 + 5.0) * 0.4),
                    rotation: seeded_half_turns(seed * 4.91 + 8.0, seed * 5.37 + 11.0),
                    tilt: 0.0,
                },
                MotionStyle::Twirl => Decoration {
                    scale: config.scale * (0.7 + pseudo_random(seed * 3.58 + 3.0) * 0.4),
                    rotation: Vec3::ZERO,
                    tilt: centered_jitter(seed * 4.1 + 6.0, 0.6),
                },
            };
            Entity::new(i, count, formed, chaos).with_decoration(decoration)
        })
        .collect()
}

//! Frame driver: one `tick` per display refresh advances every batch.

use crate::camera::{Camera, CameraFollower};
use crate::config::{OrnamentKind, SceneConfig};
use crate::error::ConfigError;
use crate::foliage::{AuraField, FieldUniforms, FoliageField};
use crate::instance::InstanceRaw;
use crate::ornaments::{BatchVersion, OrnamentBatch};
use crate::photos::PhotoCards;
use crate::state::{Mode, ProgressPublisher, SceneStore, StoreReader};
use glam::{Mat4, Vec3};
use instant::Instant;

/// Measures wall-clock time between frames.
pub struct FrameClock {
    last_instant: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_instant: Instant::now(),
        }
    }

    /// Seconds since the previous call.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        dt.as_secs_f32()
    }
}

/// Upload-ready instances of one ornament batch.
#[derive(Clone, Copy, Debug)]
pub struct OrnamentView<'a> {
    pub kind: OrnamentKind,
    pub version: BatchVersion,
    pub instances: &'a [InstanceRaw],
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct FrameView<'a> {
    pub mode: Mode,
    pub view_proj: Mat4,
    /// Rotation of the whole tree group, applied on top of every model matrix.
    pub group: Mat4,
    pub eye: Vec3,
    pub foliage: FieldUniforms,
    pub aura: FieldUniforms,
    pub ornaments: Vec<OrnamentView<'a>>,
    pub card_frames: &'a [InstanceRaw],
    pub card_panels: &'a [InstanceRaw],
}

pub struct TreeScene {
    config: SceneConfig,
    store: StoreReader,
    progress_out: ProgressPublisher,
    foliage: FoliageField,
    aura: AuraField,
    ornaments: Vec<OrnamentBatch>,
    cards: PhotoCards,
    camera: Camera,
    follower: CameraFollower,
    elapsed: f32,
}

impl TreeScene {
    /// Validate `config` and generate every batch.
    pub fn new(config: SceneConfig, store: SceneStore) -> Result<Self, ConfigError> {
        config.validate()?;
        let photos = store.photos();
        let ornaments: Vec<OrnamentBatch> = config
            .ornaments
            .iter()
            .cloned()
            .map(OrnamentBatch::new)
            .collect();
        log::info!(
            "[scene] foliage={} aura={} ornament batches={} ({} instances) photos={}",
            config.foliage_count,
            config.aura_count,
            ornaments.len(),
            ornaments.iter().map(OrnamentBatch::len).sum::<usize>(),
            photos.len()
        );
        Ok(Self {
            foliage: FoliageField::new(config.foliage_count),
            aura: AuraField::new(config.aura_count),
            cards: PhotoCards::new(&photos),
            ornaments,
            config,
            store: store.reader(),
            progress_out: store.progress_publisher(),
            camera: Camera::default(),
            follower: CameraFollower::default(),
            elapsed: 0.0,
        })
    }

    /// Adopt a new composition, rebuilding only batches whose version changed.
    ///
    /// Returns how many ornament batches were regenerated.
    pub fn reconfigure(&mut self, config: SceneConfig) -> Result<usize, ConfigError> {
        config.validate()?;
        let mut rebuilt = 0;
        self.ornaments.truncate(config.ornaments.len());
        for (i, ornament) in config.ornaments.iter().enumerate() {
            match self.ornaments.get_mut(i) {
                Some(batch) => rebuilt += usize::from(batch.sync(ornament)),
                None => {
                    self.ornaments.push(OrnamentBatch::new(ornament.clone()));
                    rebuilt += 1;
                }
            }
        }
        if config.foliage_count != self.config.foliage_count {
            self.foliage = FoliageField::new(config.foliage_count);
        }
        if config.aura_count != self.config.aura_count {
            self.aura = AuraField::new(config.aura_count);
        }
        self.config = config;
        Ok(rebuilt)
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Advance one frame. A non-finite or negative `dt_sec` counts as zero.
    pub fn tick(&mut self, dt_sec: f32) -> FrameView<'_> {
        let dt = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        let snapshot = self.store.snapshot();

        self.cards.sync(&snapshot.photos);

        let foliage = self
            .foliage
            .tick(dt, self.elapsed, snapshot.mode, snapshot.pointer);
        let aura = self.aura.tick(self.elapsed, snapshot.pointer);
        for batch in &mut self.ornaments {
            batch.tick(dt, self.elapsed, snapshot.mode);
        }
        self.cards.tick(snapshot.mode);
        self.follower.tick(dt, snapshot.camera_target);
        self.progress_out.publish(self.foliage.progress());

        FrameView {
            mode: snapshot.mode,
            view_proj: self.camera.view_proj(),
            group: self.follower.group_matrix(),
            eye: self.camera.eye,
            foliage,
            aura,
            ornaments: self
                .ornaments
                .iter()
                .map(|b| OrnamentView {
                    kind: b.config().kind,
                    version: b.version(),
                    instances: b.instances(),
                })
                .collect(),
            card_frames: self.cards.frames(),
            card_panels: self.cards.panels(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn store(&self) -> &StoreReader {
        &self.store
    }

    pub fn foliage(&self) -> &FoliageField {
        &self.foliage
    }

    pub fn aura(&self) -> &AuraField {
        &self.aura
    }

    pub fn ornaments(&self) -> &[OrnamentBatch] {
        &self.ornaments
    }

    pub fn ornaments_mut(&mut self) -> &mut [OrnamentBatch] {
        &mut self.ornaments
    }

    pub fn cards(&self) -> &PhotoCards {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut PhotoCards {
        &mut self.cards
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn follower(&self) -> &CameraFollower {
        &self.follower
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

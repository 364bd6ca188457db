//! Shared scene state written by input collaborators and read every frame.
//!
//! [`SceneStore`] is the single writer-facing handle; renderers and
//! interpolators receive a [`StoreReader`], which can observe and subscribe
//! but never mutate. The frame driver additionally holds a
//! [`ProgressPublisher`], the only way to write `progress`. Every setter
//! replaces a whole value under the lock, so a reader on another thread never
//! sees a half-written vector.

use crate::constants::DEFAULT_PHOTOS;
use glam::Vec2;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Target formation selected for every entity at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Formed,
    Chaos,
}

impl Mode {
    #[inline]
    pub fn is_chaos(self) -> bool {
        matches!(self, Mode::Chaos)
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Mode::Formed => Mode::Chaos,
            Mode::Chaos => Mode::Formed,
        }
    }

    /// Blend target for shader-driven batches: 0 formed, 1 chaos.
    #[inline]
    pub fn progress_target(self) -> f32 {
        if self.is_chaos() {
            1.0
        } else {
            0.0
        }
    }
}

/// Consistent copy of every store field.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreSnapshot {
    pub mode: Mode,
    pub progress: f32,
    pub pointer: Vec2,
    pub camera_target: Vec2,
    pub photos: Arc<[String]>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            mode: Mode::Formed,
            progress: 0.0,
            pointer: Vec2::ZERO,
            camera_target: Vec2::ZERO,
            photos: DEFAULT_PHOTOS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// What changed, passed to subscribers after the write lock is released.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    ModeChanged(Mode),
    PointerMoved(Vec2),
    CameraTargetMoved(Vec2),
    PhotoAdded { index: usize, url: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

struct Shared {
    state: RwLock<StoreSnapshot>,
    listeners: RwLock<SmallVec<[(SubscriptionId, Listener); 4]>>,
    next_id: AtomicU64,
}

/// Writer handle; clones share the same state.
#[derive(Clone)]
pub struct SceneStore {
    shared: Arc<Shared>,
}

/// Read-only handle for per-frame consumers.
#[derive(Clone)]
pub struct StoreReader {
    shared: Arc<Shared>,
}

/// Write access to `progress` and nothing else.
pub struct ProgressPublisher {
    shared: Arc<Shared>,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    pub fn new() -> Self {
        Self::with_photos(DEFAULT_PHOTOS.iter().map(|p| p.to_string()).collect())
    }

    pub fn with_photos(photos: Vec<String>) -> Self {
        let state = StoreSnapshot {
            photos: photos.into(),
            ..StoreSnapshot::default()
        };
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(state),
                listeners: RwLock::new(SmallVec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn reader(&self) -> StoreReader {
        StoreReader {
            shared: self.shared.clone(),
        }
    }

    /// Handle for the frame driver that owns the smoothed progress value.
    pub fn progress_publisher(&self) -> ProgressPublisher {
        ProgressPublisher {
            shared: self.shared.clone(),
        }
    }

    pub fn set_mode(&self, mode: Mode) {
        self.write().mode = mode;
        self.shared.notify(&StoreEvent::ModeChanged(mode));
    }

    pub fn set_pointer(&self, x: f32, y: f32) {
        let pointer = Vec2::new(x, y);
        self.write().pointer = pointer;
        self.shared.notify(&StoreEvent::PointerMoved(pointer));
    }

    pub fn set_camera_target(&self, x: f32, y: f32) {
        let target = Vec2::new(x, y);
        self.write().camera_target = target;
        self.shared.notify(&StoreEvent::CameraTargetMoved(target));
    }

    /// Append a photo reference; the list is never reordered or deduplicated.
    pub fn add_photo(&self, url: impl Into<String>) {
        let url = url.into();
        let index = {
            let mut state = self.write();
            let mut photos = state.photos.to_vec();
            photos.push(url.clone());
            state.photos = photos.into();
            state.photos.len() - 1
        };
        log::info!("[store] photo #{} added: {}", index, url);
        self.shared.notify(&StoreEvent::PhotoAdded { index, url });
    }

    pub fn mode(&self) -> Mode {
        self.shared.read().mode
    }

    pub fn pointer(&self) -> Vec2 {
        self.shared.read().pointer
    }

    pub fn camera_target(&self) -> Vec2 {
        self.shared.read().camera_target
    }

    pub fn progress(&self) -> f32 {
        self.shared.read().progress
    }

    pub fn photos(&self) -> Arc<[String]> {
        self.shared.read().photos.clone()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.shared.read().clone()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.shared.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.unsubscribe(id)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreSnapshot> {
        self.shared.write()
    }
}

impl ProgressPublisher {
    /// Publish the smoothed shader-side progress, clamped to `[0, 1]`.
    pub fn publish(&self, progress: f32) {
        let p = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.shared.write().progress = p;
    }
}

impl StoreReader {
    pub fn mode(&self) -> Mode {
        self.shared.read().mode
    }

    pub fn pointer(&self) -> Vec2 {
        self.shared.read().pointer
    }

    pub fn camera_target(&self) -> Vec2 {
        self.shared.read().camera_target
    }

    pub fn progress(&self) -> f32 {
        self.shared.read().progress
    }

    pub fn photos(&self) -> Arc<[String]> {
        self.shared.read().photos.clone()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.shared.read().clone()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.shared.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.unsubscribe(id)
    }
}

impl Shared {
    fn read(&self) -> RwLockReadGuard<'_, StoreSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    fn notify(&self, event: &StoreEvent) {
        // Clone the list so listeners may (un)subscribe or read the store.
        let listeners: SmallVec<[Listener; 4]> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

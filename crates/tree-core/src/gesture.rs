//! Hand-gesture input: a pure classifier over 21 landmarks plus the
//! rate-limited poller that feeds it into the store.
//!
//! Extension policy: a finger counts as extended when its tip is farther
//! from the wrist than its knuckle by more than a fixed pixel buffer. The
//! thumb compares tip and IP joint in the image plane only.

use crate::constants::*;
use crate::error::LandmarkError;
use crate::state::{Mode, SceneStore};
use glam::{Vec2, Vec3};

pub const LANDMARK_COUNT: usize = 21;

const WRIST: usize = 0;
const THUMB_IP: usize = 3;
const THUMB_TIP: usize = 4;
/// (tip, knuckle) for index, middle, ring, pinky.
const FINGERS: [(usize, usize); 4] = [(8, 5), (12, 9), (16, 13), (20, 17)];

/// One inference: 21 points in the pixel space of the capture frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec3; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Accepts `[x0, y0, z0, x1, ...]`, as handed over by JS or a model runtime.
    pub fn from_flat(values: &[f32]) -> Result<Self, LandmarkError> {
        if values.len() != LANDMARK_COUNT * 3 {
            return Err(LandmarkError::WrongValueCount(values.len()));
        }
        let mut points = [Vec3::ZERO; LANDMARK_COUNT];
        for (slot, xyz) in points.iter_mut().zip(values.chunks_exact(3)) {
            *slot = Vec3::new(xyz[0], xyz[1], xyz[2]);
        }
        Ok(Self { points })
    }

    #[inline]
    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    pub fn points(&self) -> &[Vec3; LANDMARK_COUNT] {
        &self.points
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureVerdict {
    Chaos,
    Formed,
    Undecided,
}

impl GestureVerdict {
    pub fn mode(self) -> Option<Mode> {
        match self {
            GestureVerdict::Chaos => Some(Mode::Chaos),
            GestureVerdict::Formed => Some(Mode::Formed),
            GestureVerdict::Undecided => None,
        }
    }
}

/// Number of extended digits, thumb included (0..=5).
pub fn extended_count(hand: &HandLandmarks) -> usize {
    let wrist = hand.point(WRIST);
    let fingers = FINGERS
        .iter()
        .filter(|&&(tip, knuckle)| {
            hand.point(tip).distance(wrist)
                > hand.point(knuckle).distance(wrist) + FINGER_EXTENSION_BUFFER
        })
        .count();
    let wrist2 = wrist.truncate();
    let thumb = hand.point(THUMB_TIP).truncate().distance(wrist2)
        > hand.point(THUMB_IP).truncate().distance(wrist2);
    fingers + usize::from(thumb)
}

/// Open hand scatters the tree, a fist assembles it.
pub fn classify(hand: &HandLandmarks) -> GestureVerdict {
    let extended = extended_count(hand);
    if extended >= OPEN_HAND_MIN_EXTENDED {
        GestureVerdict::Chaos
    } else if extended <= FIST_MAX_EXTENDED {
        GestureVerdict::Formed
    } else {
        GestureVerdict::Undecided
    }
}

/// Wrist position normalised to `[-1, 1]` with y up; small offsets snap to 0.
pub fn cursor_from_wrist(hand: &HandLandmarks) -> Vec2 {
    let wrist = hand.point(WRIST);
    let x = (wrist.x / GESTURE_FRAME_SIZE.x) * 2.0 - 1.0;
    let y = -(wrist.y / GESTURE_FRAME_SIZE.y) * 2.0 + 1.0;
    let deadzone = |v: f32| {
        if !v.is_finite() || v.abs() < GESTURE_DEADZONE {
            0.0
        } else {
            v.clamp(-1.0, 1.0)
        }
    };
    Vec2::new(deadzone(x), deadzone(y))
}

/// What the last inference looked like, for UI chrome and logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureStatus {
    #[default]
    NoHand,
    OpenHand,
    Fist,
    Tracking,
}

impl GestureStatus {
    pub fn label(self) -> &'static str {
        match self {
            GestureStatus::NoHand => "No Hand Detected",
            GestureStatus::OpenHand => "Open Hand (Chaos)",
            GestureStatus::Fist => "Fist (Formed)",
            GestureStatus::Tracking => "Tracking...",
        }
    }
}

/// Applies classified inferences to the store and remembers the last status.
#[derive(Debug, Default)]
pub struct GestureController {
    status: GestureStatus,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> GestureStatus {
        self.status
    }

    /// With no hand the store is left untouched. An undecided pose still
    /// steers the camera but keeps the current mode.
    pub fn apply(&mut self, hand: Option<&HandLandmarks>, store: &SceneStore) -> GestureStatus {
        let status = match hand {
            None => GestureStatus::NoHand,
            Some(hand) => {
                let verdict = classify(hand);
                if let Some(mode) = verdict.mode() {
                    if store.mode() != mode {
                        store.set_mode(mode);
                    }
                }
                let target = cursor_from_wrist(hand) * GESTURE_CAMERA_GAIN;
                store.set_camera_target(target.x, target.y);
                match verdict {
                    GestureVerdict::Chaos => GestureStatus::OpenHand,
                    GestureVerdict::Formed => GestureStatus::Fist,
                    GestureVerdict::Undecided => GestureStatus::Tracking,
                }
            }
        };
        if status != self.status {
            log::info!("[gesture] {}", status.label());
            self.status = status;
        }
        status
    }
}

/// External hand-landmark provider (camera + model).
pub trait LandmarkSource {
    /// One inference. `Ok(None)` means no hand in view.
    fn estimate(&mut self) -> Result<Option<HandLandmarks>, LandmarkError>;
}

/// Run one inference and apply it. Provider errors are logged and skipped.
pub fn poll_once<S: LandmarkSource + ?Sized>(
    source: &mut S,
    controller: &mut GestureController,
    store: &SceneStore,
) -> Option<GestureStatus> {
    match source.estimate() {
        Ok(hand) => Some(controller.apply(hand.as_ref(), store)),
        Err(LandmarkError::NotReady) => None,
        Err(err) => {
            log::warn!("[gesture] skipping frame: {}", err);
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use poller::GesturePoller;

#[cfg(not(target_arch = "wasm32"))]
mod poller {
    use super::{poll_once, GestureController, LandmarkSource};
    use crate::state::SceneStore;
    use std::sync::mpsc::{self, RecvTimeoutError, Sender};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    /// Background thread polling a [`LandmarkSource`] at a fixed cadence.
    ///
    /// Dropping the poller stops and joins the thread.
    pub struct GesturePoller {
        stop_tx: Option<Sender<()>>,
        handle: Option<JoinHandle<()>>,
    }

    impl GesturePoller {
        pub fn spawn<S>(
            mut source: S,
            store: SceneStore,
            interval: Duration,
        ) -> std::io::Result<Self>
        where
            S: LandmarkSource + Send + 'static,
        {
            let (stop_tx, stop_rx) = mpsc::channel::<()>();
            let handle = thread::Builder::new()
                .name("gesture-poller".into())
                .spawn(move || {
                    let mut controller = GestureController::new();
                    log::info!("[gesture] poller started ({} ms)", interval.as_millis());
                    loop {
                        match stop_rx.recv_timeout(interval) {
                            Err(RecvTimeoutError::Timeout) => {
                                poll_once(&mut source, &mut controller, &store);
                            }
                            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                        }
                    }
                    log::info!("[gesture] poller stopped");
                })?;
            Ok(Self {
                stop_tx: Some(stop_tx),
                handle: Some(handle),
            })
        }

        pub fn is_running(&self) -> bool {
            self.handle.as_ref().is_some_and(|h| !h.is_finished())
        }

        pub fn stop(&mut self) {
            if let Some(tx) = self.stop_tx.take() {
                let _ = tx.send(());
            }
            if let Some(handle) = self.handle.take() {
                if handle.join().is_err() {
                    log::error!("[gesture] poller thread panicked");
                }
            }
        }
    }

    impl Drop for GesturePoller {
        fn drop(&mut self) {
            self.stop();
        }
    }
}

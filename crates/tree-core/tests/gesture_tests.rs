// Gesture classification, cursor mapping and the background poller.

use glam::{Vec2, Vec3};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tree_core::gesture::*;
use tree_core::{LandmarkError, Mode, SceneStore};

const WRIST: Vec3 = Vec3::new(320.0, 240.0, 0.0);
const FINGERS: [(usize, usize); 4] = [(8, 5), (12, 9), (16, 13), (20, 17)];

/// Knuckles 40px above the wrist; each finger's tip `reach` px above the wrist.
fn hand(reach: [f32; 4], thumb_out: bool) -> HandLandmarks {
    let mut points = [WRIST; LANDMARK_COUNT];
    for (&(tip, knuckle), r) in FINGERS.iter().zip(reach) {
        points[knuckle] = WRIST - Vec3::new(0.0, 40.0, 0.0);
        points[tip] = WRIST - Vec3::new(0.0, r, 0.0);
    }
    points[3] = WRIST - Vec3::new(0.0, 10.0, 0.0);
    points[4] = WRIST - Vec3::new(0.0, if thumb_out { 60.0 } else { 5.0 }, 0.0);
    HandLandmarks::new(points)
}

fn with_wrist(h: HandLandmarks, x: f32, y: f32) -> HandLandmarks {
    let shift = Vec3::new(x, y, 0.0) - WRIST;
    let mut points = *h.points();
    for p in &mut points {
        *p += shift;
    }
    HandLandmarks::new(points)
}

#[test]
fn open_hand_is_chaos() {
    let h = hand([140.0; 4], true);
    assert_eq!(extended_count(&h), 5);
    assert_eq!(classify(&h), GestureVerdict::Chaos);
}

#[test]
fn fist_is_formed() {
    let h = hand([20.0; 4], false);
    assert_eq!(extended_count(&h), 0);
    assert_eq!(classify(&h), GestureVerdict::Formed);
    // a lone thumb is still a fist
    assert_eq!(classify(&hand([20.0; 4], true)), GestureVerdict::Formed);
}

#[test]
fn partial_hand_is_undecided() {
    let h = hand([140.0, 140.0, 20.0, 20.0], true);
    assert_eq!(extended_count(&h), 3);
    assert_eq!(classify(&h), GestureVerdict::Undecided);
    assert_eq!(GestureVerdict::Undecided.mode(), None);
}

#[test]
fn tip_exactly_at_the_buffer_is_not_extended() {
    let h = hand([60.0; 4], false);
    assert_eq!(extended_count(&h), 0);
    let h = hand([61.0; 4], false);
    assert_eq!(extended_count(&h), 4);
}

#[test]
fn wrist_maps_to_normalised_cursor() {
    let open = hand([140.0; 4], true);
    assert_eq!(cursor_from_wrist(&with_wrist(open.clone(), 320.0, 240.0)), Vec2::ZERO);
    assert_eq!(
        cursor_from_wrist(&with_wrist(open.clone(), 0.0, 0.0)),
        Vec2::new(-1.0, 1.0)
    );
    assert_eq!(
        cursor_from_wrist(&with_wrist(open.clone(), 400.0, 120.0)),
        Vec2::new(0.25, 0.5)
    );
    // inside the dead zone on both axes
    assert_eq!(
        cursor_from_wrist(&with_wrist(open.clone(), 340.0, 250.0)),
        Vec2::ZERO
    );
    // outside the frame clamps
    assert_eq!(
        cursor_from_wrist(&with_wrist(open, 1280.0, 960.0)),
        Vec2::new(1.0, -1.0)
    );
}

#[test]
fn no_hand_leaves_the_store_untouched() {
    let store = SceneStore::new();
    store.set_mode(Mode::Chaos);
    store.set_camera_target(0.3, 0.1);
    let mut controller = GestureController::new();
    assert_eq!(controller.apply(None, &store), GestureStatus::NoHand);
    assert_eq!(store.mode(), Mode::Chaos);
    assert_eq!(store.camera_target(), Vec2::new(0.3, 0.1));
}

#[test]
fn open_hand_and_fist_drive_the_mode() {
    let store = SceneStore::new();
    let mut controller = GestureController::new();
    let status = controller.apply(Some(&hand([140.0; 4], true)), &store);
    assert_eq!(status, GestureStatus::OpenHand);
    assert_eq!(store.mode(), Mode::Chaos);
    let status = controller.apply(Some(&hand([20.0; 4], false)), &store);
    assert_eq!(status, GestureStatus::Fist);
    assert_eq!(store.mode(), Mode::Formed);
    assert_eq!(controller.status(), GestureStatus::Fist);
}

#[test]
fn undecided_pose_steers_camera_but_keeps_mode() {
    let store = SceneStore::new();
    store.set_mode(Mode::Chaos);
    let mut controller = GestureController::new();
    let h = with_wrist(hand([140.0, 140.0, 20.0, 20.0], true), 400.0, 120.0);
    assert_eq!(controller.apply(Some(&h), &store), GestureStatus::Tracking);
    assert_eq!(store.mode(), Mode::Chaos);
    let target = store.camera_target();
    assert!((target.x - 0.875).abs() < 1e-6);
    assert!((target.y - 0.4).abs() < 1e-6);
}

#[test]
fn flat_landmarks_need_sixty_three_values() {
    assert!(HandLandmarks::from_flat(&[0.0; 63]).is_ok());
    assert!(matches!(
        HandLandmarks::from_flat(&[0.0; 60]),
        Err(LandmarkError::WrongValueCount(60))
    ));
    // one float short still reports the true count
    let err = HandLandmarks::from_flat(&[0.0; 62]).unwrap_err();
    assert!(matches!(err, LandmarkError::WrongValueCount(62)));
    assert!(err.to_string().ends_with("got 62"));
}

struct Scripted {
    frames: Vec<Result<Option<HandLandmarks>, LandmarkError>>,
}

impl LandmarkSource for Scripted {
    fn estimate(&mut self) -> Result<Option<HandLandmarks>, LandmarkError> {
        self.frames.pop().unwrap_or(Err(LandmarkError::NotReady))
    }
}

#[test]
fn provider_errors_are_skipped() {
    let store = SceneStore::new();
    let mut controller = GestureController::new();
    let mut source = Scripted {
        frames: vec![
            Ok(Some(hand([140.0; 4], true))),
            Err(LandmarkError::Inference("camera busy".into())),
            Err(LandmarkError::NotReady),
        ],
    };
    assert_eq!(poll_once(&mut source, &mut controller, &store), None);
    assert_eq!(poll_once(&mut source, &mut controller, &store), None);
    assert_eq!(store.mode(), Mode::Formed);
    assert_eq!(
        poll_once(&mut source, &mut controller, &store),
        Some(GestureStatus::OpenHand)
    );
    assert_eq!(store.mode(), Mode::Chaos);
}

struct Counting {
    calls: Arc<AtomicUsize>,
}

impl LandmarkSource for Counting {
    fn estimate(&mut self) -> Result<Option<HandLandmarks>, LandmarkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

#[test]
fn poller_runs_until_stopped() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = Counting {
        calls: calls.clone(),
    };
    let mut poller =
        GesturePoller::spawn(source, SceneStore::new(), Duration::from_millis(5)).unwrap();
    assert!(poller.is_running());
    thread::sleep(Duration::from_millis(100));
    poller.stop();
    assert!(!poller.is_running());
    let seen = calls.load(Ordering::SeqCst);
    assert!(seen > 0);
    thread::sleep(Duration::from_millis(30));
    assert_eq!(calls.load(Ordering::SeqCst), seen);
}

#[test]
fn status_labels_are_distinct() {
    let labels = [
        GestureStatus::NoHand,
        GestureStatus::OpenHand,
        GestureStatus::Fist,
        GestureStatus::Tracking,
    ]
    .map(GestureStatus::label);
    for (i, a) in labels.iter().enumerate() {
        for b in &labels[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

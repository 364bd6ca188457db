use glam::{Vec2, Vec3};

// Shared layout/animation tuning constants used by both web and native frontends.

// Foliage (shader-driven point cloud)
pub const FOLIAGE_COUNT: usize = 15_000;
pub const FOLIAGE_RADIUS: f32 = 6.5;
pub const FOLIAGE_HEIGHT: f32 = 14.5;
pub const FOLIAGE_LAYERS: u32 = 14;
pub const FOLIAGE_LAYER_GAP: f32 = 0.12;
pub const FOLIAGE_JITTER: f32 = 0.28;
pub const FOLIAGE_CHAOS_BASE: f32 = 25.0; // inner radius of the dispersed shell
pub const FOLIAGE_CHAOS_SPREAD: f32 = 25.0; // shell thickness
pub const FOLIAGE_POINTER_SCALE: Vec2 = Vec2::new(6.0, 7.0); // pointer -> tree plane
pub const FOLIAGE_POINTER_RADIUS: f32 = 2.2;
pub const FOLIAGE_CHAOS_WOBBLE: f32 = 0.5;

// Progress smoothing for shader-driven batches
pub const PROGRESS_MAX_DT: f32 = 0.1; // clamp large frame gaps
pub const PROGRESS_RATE: f32 = 2.0;

// Ambient aura motes
pub const AURA_COUNT: usize = 4_000;
pub const AURA_EXTENT: Vec3 = Vec3::new(80.0, 60.0, 60.0);
pub const AURA_Z_OFFSET: f32 = 10.0;
pub const AURA_SIZE_MIN: f32 = 0.3;
pub const AURA_SIZE_SPAN: f32 = 0.9;
pub const AURA_POINTER_SCALE: f32 = 15.0;
pub const AURA_POINTER_RADIUS: f32 = 6.0;

// Ornament motion
pub const ORNAMENT_WOBBLE: f32 = 0.5; // chaos jitter amplitude
pub const ORNAMENT_SPIN_PER_SEC: f32 = 0.5; // chaos nudge, scaled by frame dt
pub const BOW_SPIN_X_PER_SEC: f32 = 0.4;
pub const BOW_SPIN_Y_PER_SEC: f32 = 0.3;

// Photo cards
pub const CARD_RADIUS: f32 = 8.5;
pub const CARD_HEIGHT: f32 = 13.5;
pub const CARD_LAYERS: u32 = 12;
pub const CARD_LAYER_GAP: f32 = 0.15;
pub const CARD_JITTER: f32 = 0.3;
pub const CARD_CHAOS_RADIUS: f32 = 24.0;
pub const CARD_RATE: f32 = 0.05;
pub const FEATURED_CARD_RATE: f32 = 0.2;
pub const FEATURED_CARD_POSITION: Vec3 = Vec3::new(0.0, 3.5, 2.5);
pub const CARD_TILT_SPAN: f32 = 0.5;
pub const CARD_FRAME_SIZE: Vec2 = Vec2::new(1.2, 1.5);
pub const CARD_IMAGE_OFFSET_Y: f32 = 0.15;

// Camera
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 4.0, 35.0);
pub const CAMERA_FOVY_DEG: f32 = 50.0;
pub const CAMERA_FOLLOW_RATE: f32 = 2.0; // lerp factor per second
pub const CAMERA_PITCH_GAIN: f32 = 0.5;
pub const CAMERA_YAW_GAIN: f32 = 0.5;

// Mouse controller mapping (normalized pointer -> camera target)
pub const MOUSE_CAMERA_GAIN: Vec2 = Vec2::new(2.0, 0.5);

// Gesture polling + mapping
pub const GESTURE_POLL_INTERVAL_MS: u64 = 100;
pub const GESTURE_FRAME_SIZE: Vec2 = Vec2::new(640.0, 480.0); // landmark pixel space
pub const GESTURE_DEADZONE: f32 = 0.15;
pub const GESTURE_CAMERA_GAIN: Vec2 = Vec2::new(3.5, 0.8);
pub const FINGER_EXTENSION_BUFFER: f32 = 20.0; // landmark pixels
pub const OPEN_HAND_MIN_EXTENDED: usize = 4;
pub const FIST_MAX_EXTENDED: usize = 1;

// Defaults for the photo wall
pub const DEFAULT_PHOTOS: [&str; 7] = [
    "/photos/1.jpg",
    "/photos/2.jpg",
    "/photos/3.jpg",
    "/photos/4.jpg",
    "/photos/5.jpg",
    "/photos/6.jpg",
    "/photos/7.jpg",
];

// Clear color of the night sky
pub const BACKGROUND_RGB: [f32; 3] = [0.0, 0.02, 0.01];

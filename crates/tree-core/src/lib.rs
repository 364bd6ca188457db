pub mod camera;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod foliage;
pub mod geometry;
pub mod gesture;
pub mod instance;
pub mod math;
pub mod ornaments;
pub mod photos;
pub mod scene;
pub mod state;

#[cfg(feature = "gpu")]
pub mod gpu;

pub static FOLIAGE_WGSL: &str = include_str!("../shaders/foliage.wgsl");
pub static AURA_WGSL: &str = include_str!("../shaders/aura.wgsl");
pub static MESH_WGSL: &str = include_str!("../shaders/mesh.wgsl");

pub use camera::{Camera, CameraFollower};
pub use config::{Material, MotionStyle, OrnamentConfig, OrnamentKind, SceneConfig};
pub use error::{ConfigError, LandmarkError};
pub use gesture::{
    classify, cursor_from_wrist, GestureController, GestureStatus, GestureVerdict,
    HandLandmarks, LandmarkSource,
};
pub use scene::{FrameClock, FrameView, OrnamentView, TreeScene};
pub use state::{
    Mode, ProgressPublisher, SceneStore, StoreEvent, StoreReader, StoreSnapshot, SubscriptionId,
};

use thiserror::Error;

/// Rejected scene or batch configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{batch}: instance count must be at least 1")]
    EmptyBatch { batch: String },
    #[error("{batch}: scale must be positive and finite, got {value}")]
    InvalidScale { batch: String, value: f32 },
    #[error("{batch}: {field} must lie in [0, 1], got {value}")]
    OutOfUnitRange {
        batch: String,
        field: &'static str,
        value: f32,
    },
    #[error("{batch}: emissive intensity must be non-negative, got {value}")]
    NegativeEmissive { batch: String, value: f32 },
    #[error("invalid hex color {0:?} (expected #RRGGBB)")]
    InvalidColor(String),
}

/// Failure reported by a hand-landmark provider for one inference.
#[derive(Debug, Error)]
pub enum LandmarkError {
    #[error("landmark model is not ready")]
    NotReady,
    #[error("expected 63 landmark values (21 points of x, y, z), got {0}")]
    WrongValueCount(usize),
    #[error("landmark inference failed: {0}")]
    Inference(String),
}

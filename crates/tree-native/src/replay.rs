//! Replays recorded hand landmarks from a text file, one inference per line.
//!
//! Each line holds 63 numbers (21 points, x y z) separated by spaces or
//! commas. A blank line means no hand was in view. Playback loops.

use std::path::Path;
use tree_core::gesture::{HandLandmarks, LandmarkSource};
use tree_core::LandmarkError;

pub struct ReplaySource {
    frames: Vec<String>,
    cursor: usize,
}

impl ReplaySource {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            frames: text
                .lines()
                .filter(|l| !l.trim_start().starts_with('#'))
                .map(str::to_owned)
                .collect(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

pub fn parse_frame(line: &str) -> Result<Option<HandLandmarks>, LandmarkError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let values = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<f32>()
                .map_err(|e| LandmarkError::Inference(format!("{t:?}: {e}")))
        })
        .collect::<Result<Vec<f32>, _>>()?;
    HandLandmarks::from_flat(&values).map(Some)
}

impl LandmarkSource for ReplaySource {
    fn estimate(&mut self) -> Result<Option<HandLandmarks>, LandmarkError> {
        if self.frames.is_empty() {
            return Err(LandmarkError::NotReady);
        }
        let line = &self.frames[self.cursor];
        self.cursor = (self.cursor + 1) % self.frames.len();
        parse_frame(line)
    }
}

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;

use crate::models::FrameRecord;

/// Writes the frame log as pretty-printed JSON.
pub fn save_frames(path: &Path, frames: &[FrameRecord]) -> Result<()> {
    let serialized = serde_json::to_string_pretty(frames).context("failed to serialize frame log")?;
    fs::write(path, serialized)
        .with_context(|| format!("Failed to write frame log to {}", path.display()))
}

pub fn load_frames(path: &Path) -> Result<Vec<FrameRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read frame log from {}", path.display()))?;
    let frames: Vec<FrameRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse frame log {}", path.display()))?;

    if frames.windows(2).any(|pair| pair[1].timestamp < pair[0].timestamp) {
        warn!("frame log {} has decreasing timestamps", path.display());
    }

    Ok(frames)
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::paths::{DATA_EXTENSION, VIDEO_EXTENSION};

/// A saved recording: the video, plus its skeletal data when that was written too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedItem {
    pub stem: String,
    pub video_path: PathBuf,
    pub data_path: Option<PathBuf>,
}

/// Lists recordings in `dir`, newest first by file name.
pub fn list_recordings(dir: &Path) -> Result<Vec<RecordedItem>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read recordings directory {}", dir.display()))?;

    let mut items = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(VIDEO_EXTENSION) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let data_path = dir.join(format!("{stem}.{DATA_EXTENSION}"));
        items.push(RecordedItem {
            stem: stem.to_string(),
            data_path: data_path.is_file().then_some(data_path),
            video_path: path.clone(),
        });
    }

    items.sort_by(|a, b| b.video_path.file_name().cmp(&a.video_path.file_name()));
    Ok(items)
}

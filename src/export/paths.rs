use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const VIDEO_EXTENSION: &str = "mov";
pub const DATA_EXTENSION: &str = "json";

/// Matching video and skeletal-data paths for one recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingPaths {
    pub stem: String,
    pub video: PathBuf,
    pub data: PathBuf,
}

impl RecordingPaths {
    /// `<dir>/<prefix>_<unix seconds>.mov` and the `.json` with the same stem.
    pub fn generate(dir: &Path, prefix: &str, at: DateTime<Utc>) -> Self {
        Self::from_stem(dir, format!("{prefix}_{}", at.timestamp()))
    }

    /// Like [`Self::generate`], but appends `_2`, `_3`, ... to the stem while a
    /// video or data file with that stem already exists in `dir`.
    pub fn generate_unused(dir: &Path, prefix: &str, at: DateTime<Utc>) -> Self {
        let base = Self::generate(dir, prefix, at);
        let mut paths = base.clone();
        let mut suffix = 2u32;
        while paths.is_taken() {
            paths = Self::from_stem(dir, format!("{}_{suffix}", base.stem));
            suffix += 1;
        }
        paths
    }

    pub fn is_taken(&self) -> bool {
        self.video.exists() || self.data.exists()
    }

    pub fn from_stem(dir: &Path, stem: String) -> Self {
        Self {
            video: dir.join(format!("{stem}.{VIDEO_EXTENSION}")),
            data: dir.join(format!("{stem}.{DATA_EXTENSION}")),
            stem,
        }
    }
}

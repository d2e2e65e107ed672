use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::evaluation::SquatFormRules;

/// Device screen in points; the encoder records at `points * scale` pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSettings {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
            scale: 3.0,
        }
    }
}

impl ScreenSettings {
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        let to_pixels = |points: f64| {
            let pixels = (points * self.scale).round();
            if pixels.is_finite() && pixels > 0.0 {
                pixels.min(f64::from(u32::MAX)) as u32
            } else {
                0
            }
        };
        (to_pixels(self.width), to_pixels(self.height))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderSettings {
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub screen: ScreenSettings,
    pub rules: SquatFormRules,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("recordings"),
            file_prefix: "PosePerfect".into(),
            screen: ScreenSettings::default(),
            rules: SquatFormRules::default(),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<RecorderSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings {}: {err}", path.display());
                RecorderSettings::default()
            })
        } else {
            RecorderSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn recorder(&self) -> Result<RecorderSettings> {
        self.data
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| anyhow!("settings lock poisoned"))
    }

    pub fn update_recorder(&self, settings: RecorderSettings) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &RecorderSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

use std::path::Path;

use anyhow::{ensure, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::settings::ScreenSettings;

use super::image_convert::{EncodeBuffer, PixelLayout, Rotation};
use super::media_time::MediaTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoCodec {
    H264,
}

/// Output configuration negotiated with the video writer when a recording starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeSettings {
    pub codec: VideoCodec,
    pub width: u32,
    pub height: u32,
    pub pixel_layout: PixelLayout,
    /// Portrait correction for a landscape sensor, baked into every encoded frame.
    pub rotation: Rotation,
    pub expects_media_data_in_real_time: bool,
}

impl EncodeSettings {
    /// H.264 at the screen's native pixel resolution.
    pub fn for_screen(screen: &ScreenSettings) -> Result<Self> {
        let (width, height) = screen.pixel_dimensions();
        ensure!(
            width > 0 && height > 0,
            "screen resolution {}x{} @{}x is empty",
            screen.width,
            screen.height,
            screen.scale
        );

        Ok(Self {
            codec: VideoCodec::H264,
            width,
            height,
            pixel_layout: PixelLayout::Argb32,
            rotation: Rotation::Clockwise90,
            expects_media_data_in_real_time: true,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriterStatus {
    Unknown,
    Writing,
    Completed,
    Failed,
    Cancelled,
}

/// Container writer backed by the platform's media encoder.
#[async_trait]
pub trait VideoWriter: Send {
    fn status(&self) -> WriterStatus;

    /// Backpressure signal; frames offered while this is false are dropped.
    fn is_ready_for_more_media_data(&self) -> bool;

    fn start_writing(&mut self) -> Result<()>;

    /// Opens the writing session; later frames are presented relative to `at`.
    fn start_session(&mut self, at: MediaTime) -> Result<()>;

    fn append(&mut self, buffer: EncodeBuffer, presentation_time: MediaTime) -> Result<()>;

    /// No more frames will be appended.
    fn mark_as_finished(&mut self);

    /// Flushes and closes the container.
    async fn finish_writing(&mut self) -> Result<()>;
}

pub trait VideoWriterFactory: Send + Sync {
    fn create(&self, output_path: &Path, settings: &EncodeSettings) -> Result<Box<dyn VideoWriter>>;
}

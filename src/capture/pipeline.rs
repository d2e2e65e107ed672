use std::time::Instant;

use serde::Serialize;

use crate::geometry::compute_frame_angles;
use crate::metrics::{CaptureMetrics, CaptureSample, DropReason, MetricsSnapshot};
use crate::models::{FrameRecord, SkeletonPositions, TrackingFrame};

use super::image_convert::convert_camera_image;
use super::media_time::{MediaTime, PresentationClock};
use super::writer::{EncodeSettings, VideoWriter, WriterStatus};

// Per-frame logging; flip off when profiling the tracking callback.
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoContribution {
    Appended,
    Dropped(DropReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    NotRecording,
    InvalidTimestamp,
    OutOfOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameOutcome {
    Recorded {
        presentation_time: MediaTime,
        video: VideoContribution,
    },
    Skipped(SkipReason),
}

/// Turns tracking frames into encoded video frames and an append-only frame log.
#[derive(Debug)]
pub struct CapturePipeline {
    settings: EncodeSettings,
    clock: PresentationClock,
    last_video_time: Option<MediaTime>,
    frames: Vec<FrameRecord>,
    metrics: CaptureMetrics,
}

impl CapturePipeline {
    pub fn new(settings: EncodeSettings) -> Self {
        Self {
            settings,
            clock: PresentationClock::new(),
            last_video_time: None,
            frames: Vec::new(),
            metrics: CaptureMetrics::new(),
        }
    }

    pub fn settings(&self) -> &EncodeSettings {
        &self.settings
    }

    pub fn reference_timestamp(&self) -> Option<f64> {
        self.clock.reference_timestamp()
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<FrameRecord> {
        self.frames
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Records one tracking frame. Video problems only cost this frame its video
    /// contribution; the skeletal record is appended regardless.
    pub fn process_frame(&mut self, frame: &TrackingFrame, writer: &mut dyn VideoWriter) -> FrameOutcome {
        if !frame.timestamp.is_finite() {
            log_warn!("skipping frame with non-finite timestamp {}", frame.timestamp);
            return FrameOutcome::Skipped(SkipReason::InvalidTimestamp);
        }
        if let Some(last) = self.frames.last() {
            if frame.timestamp < last.timestamp {
                log_warn!(
                    "skipping out-of-order frame at {:.4}s (last recorded {:.4}s)",
                    frame.timestamp,
                    last.timestamp
                );
                return FrameOutcome::Skipped(SkipReason::OutOfOrder);
            }
        }

        if self.clock.reference_timestamp().is_none() {
            log_info!("video timeline anchored at {:.4}s", frame.timestamp);
        }
        let presentation_time = self.clock.presentation_time(frame.timestamp);
        let (video, conversion_ms) = self.append_video(frame, presentation_time, writer);

        self.frames.push(FrameRecord {
            timestamp: frame.timestamp,
            skeleton_data: frame
                .skeletons
                .iter()
                .map(SkeletonPositions::from_skeleton)
                .collect(),
            joint_angles: compute_frame_angles(&frame.skeletons),
        });

        self.metrics.record_capture(CaptureSample {
            timestamp: frame.timestamp,
            conversion_ms,
            appended: video == VideoContribution::Appended,
            dropped: match video {
                VideoContribution::Appended => None,
                VideoContribution::Dropped(reason) => Some(reason),
            },
        });

        FrameOutcome::Recorded {
            presentation_time,
            video,
        }
    }

    fn append_video(
        &mut self,
        frame: &TrackingFrame,
        presentation_time: MediaTime,
        writer: &mut dyn VideoWriter,
    ) -> (VideoContribution, Option<u64>) {
        if writer.status() != WriterStatus::Writing || !writer.is_ready_for_more_media_data() {
            log_debug!(
                "writer not ready ({:?}), dropping video for frame at {:.4}s",
                writer.status(),
                frame.timestamp
            );
            return (VideoContribution::Dropped(DropReason::NotReady), None);
        }
        if self.last_video_time == Some(presentation_time) {
            log_debug!(
                "frame at {:.4}s lands on tick {} again, dropping its video",
                frame.timestamp,
                presentation_time.value
            );
            return (VideoContribution::Dropped(DropReason::DuplicateTime), None);
        }

        let conversion_start = Instant::now();
        let buffer = match convert_camera_image(&frame.image, &self.settings) {
            Ok(buffer) => buffer,
            Err(err) => {
                log_warn!("pixel buffer conversion failed at {:.4}s: {err:#}", frame.timestamp);
                return (VideoContribution::Dropped(DropReason::ConversionFailed), None);
            }
        };
        let conversion_ms = conversion_start.elapsed().as_millis() as u64;

        match writer.append(buffer, presentation_time) {
            Ok(()) => {
                self.last_video_time = Some(presentation_time);
                log_debug!(
                    "appended frame at {}/{} (conversion {}ms)",
                    presentation_time.value,
                    presentation_time.timescale,
                    conversion_ms
                );
                (VideoContribution::Appended, Some(conversion_ms))
            }
            Err(err) => {
                log_warn!("video append failed at {:.4}s: {err:#}", frame.timestamp);
                (
                    VideoContribution::Dropped(DropReason::AppendFailed),
                    Some(conversion_ms),
                )
            }
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropReason {
    NotReady,
    ConversionFailed,
    AppendFailed,
    /// Rounded onto the same presentation tick as the previous video frame.
    DuplicateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSample {
    pub timestamp: f64,
    pub conversion_ms: Option<u64>,
    pub appended: bool,
    pub dropped: Option<DropReason>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub recent_captures: Vec<CaptureSample>,
    pub frames_recorded: u64,
    pub video_frames_appended: u64,
    pub dropped_not_ready: u64,
    pub dropped_conversion_failed: u64,
    pub dropped_append_failed: u64,
    pub dropped_duplicate_time: u64,
}

impl MetricsSnapshot {
    pub fn video_frames_dropped(&self) -> u64 {
        self.dropped_not_ready
            + self.dropped_conversion_failed
            + self.dropped_append_failed
            + self.dropped_duplicate_time
    }

    /// How many more skeletal records than video frames this recording holds.
    pub fn drift(&self) -> u64 {
        self.frames_recorded.saturating_sub(self.video_frames_appended)
    }
}

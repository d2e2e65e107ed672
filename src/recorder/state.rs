use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::export::RecordingPaths;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecordingStatus {
    Idle,
    Recording,
    Saving,
    Completed,
    Error,
}

impl Default for RecordingStatus {
    fn default() -> Self {
        RecordingStatus::Idle
    }
}

impl RecordingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingStatus::Idle => "Idle",
            RecordingStatus::Recording => "Recording",
            RecordingStatus::Saving => "Saving",
            RecordingStatus::Completed => "Completed",
            RecordingStatus::Error => "Error",
        }
    }

    /// User-facing notification text for the status.
    pub fn message(&self) -> &'static str {
        match self {
            RecordingStatus::Idle => "Recording Idle",
            RecordingStatus::Recording => "Recording Started",
            RecordingStatus::Saving => "Saving Recording...",
            RecordingStatus::Completed => "Recording Completed",
            RecordingStatus::Error => "Recording Failed",
        }
    }

    /// A session owns the recorder in these states; `start` is a no-op.
    pub fn is_active(&self) -> bool {
        matches!(self, RecordingStatus::Recording | RecordingStatus::Saving)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderState {
    pub status: RecordingStatus,
    pub recording_id: Option<String>,
    pub paths: Option<RecordingPaths>,
    pub started_at: Option<DateTime<Utc>>,
    pub frame_count: usize,
    pub error: Option<String>,
}

impl RecorderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_recording(&mut self, recording_id: String, paths: RecordingPaths, started_at: DateTime<Utc>) {
        *self = Self {
            status: RecordingStatus::Recording,
            recording_id: Some(recording_id),
            paths: Some(paths),
            started_at: Some(started_at),
            frame_count: 0,
            error: None,
        };
    }

    pub fn begin_saving(&mut self) {
        self.status = RecordingStatus::Saving;
    }

    pub fn complete(&mut self) {
        self.status = RecordingStatus::Completed;
    }

    pub fn fail(&mut self, message: String) {
        self.status = RecordingStatus::Error;
        self.error = Some(message);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn status_messages() {
        assert_eq!(RecordingStatus::Idle.message(), "Recording Idle");
        assert_eq!(RecordingStatus::Recording.message(), "Recording Started");
        assert_eq!(RecordingStatus::Saving.message(), "Saving Recording...");
        assert_eq!(RecordingStatus::Completed.message(), "Recording Completed");
        assert_eq!(RecordingStatus::Error.message(), "Recording Failed");
    }

    #[test]
    fn begin_recording_clears_previous_error() {
        let mut state = RecorderState::new();
        state.fail("encoder unavailable".into());

        state.begin_recording(
            "abc".into(),
            RecordingPaths::from_stem(Path::new("out"), "PosePerfect_1".into()),
            Utc::now(),
        );

        assert_eq!(state.status, RecordingStatus::Recording);
        assert_eq!(state.error, None);
        assert_eq!(state.recording_id.as_deref(), Some("abc"));
    }

    #[test]
    fn serializes_status_in_camel_case() {
        let json = serde_json::to_value(RecordingStatus::Saving).unwrap();
        assert_eq!(json, "saving");
    }
}

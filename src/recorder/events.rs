use serde::Serialize;

use crate::models::EvaluationResult;

use super::state::RecordingStatus;

/// Notifications for the presentation layer. Subscribers receive them on their
/// own task and must hop to the UI thread themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RecorderEvent {
    StatusChanged {
        status: RecordingStatus,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    SetupFailed {
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    PersistenceFailed {
        recording_id: String,
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    EvaluationReady {
        recording_id: String,
        result: EvaluationResult,
    },
    /// Evaluation preconditions were not met; a valid outcome, not an error.
    #[serde(rename_all = "camelCase")]
    EvaluationUnavailable {
        recording_id: String,
        reason: String,
    },
}

impl RecorderEvent {
    pub fn status_changed(status: RecordingStatus) -> Self {
        RecorderEvent::StatusChanged {
            status,
            message: status.message().to_string(),
        }
    }
}

use std::{fs, sync::Arc};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use uuid::Uuid;

use crate::{
    capture::{
        CapturePipeline, EncodeSettings, FrameOutcome, MediaTime, SkipReason, VideoWriter,
        VideoWriterFactory,
    },
    evaluation::{evaluate_squat, EvaluationError},
    export::{save_frames, RecordingPaths},
    metrics::MetricsSnapshot,
    models::{EvaluationResult, TrackingFrame},
    settings::RecorderSettings,
};

use super::{RecorderEvent, RecorderState, RecordingStatus};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// What a finished recording produced. Persistence and evaluation fail independently.
#[derive(Debug, Clone)]
pub struct RecordingOutcome {
    pub recording_id: String,
    pub paths: RecordingPaths,
    pub frame_count: usize,
    pub metrics: MetricsSnapshot,
    pub video_error: Option<String>,
    pub data_error: Option<String>,
    pub evaluation: Result<EvaluationResult, EvaluationError>,
}

struct ActiveRecording {
    id: String,
    paths: RecordingPaths,
    writer: Box<dyn VideoWriter>,
    pipeline: CapturePipeline,
}

struct RecorderInner {
    state: RecorderState,
    active: Option<ActiveRecording>,
    pending_result: Option<EvaluationResult>,
}

impl RecorderInner {
    fn process_frame(&mut self, frame: &TrackingFrame) -> FrameOutcome {
        if self.state.status != RecordingStatus::Recording {
            return FrameOutcome::Skipped(SkipReason::NotRecording);
        }
        let Some(active) = self.active.as_mut() else {
            return FrameOutcome::Skipped(SkipReason::NotRecording);
        };

        let outcome = active
            .pipeline
            .process_frame(frame, active.writer.as_mut());
        self.state.frame_count = active.pipeline.frames().len();
        outcome
    }
}

/// Owns the single recording session and drives it through
/// idle → recording → saving → completed (or error).
#[derive(Clone)]
pub struct RecorderController {
    inner: Arc<Mutex<RecorderInner>>,
    writer_factory: Arc<dyn VideoWriterFactory>,
    settings: RecorderSettings,
    events: broadcast::Sender<RecorderEvent>,
}

impl RecorderController {
    pub fn new(writer_factory: Arc<dyn VideoWriterFactory>, settings: RecorderSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Mutex::new(RecorderInner {
                state: RecorderState::new(),
                active: None,
                pending_result: None,
            })),
            writer_factory,
            settings,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.events.subscribe()
    }

    pub fn settings(&self) -> &RecorderSettings {
        &self.settings
    }

    pub async fn get_state(&self) -> RecorderState {
        self.inner.lock().await.state.clone()
    }

    pub async fn status(&self) -> RecordingStatus {
        self.inner.lock().await.state.status
    }

    /// Counters for the recording in progress.
    pub async fn capture_metrics(&self) -> Option<MetricsSnapshot> {
        let inner = self.inner.lock().await;
        inner.active.as_ref().map(|active| active.pipeline.metrics())
    }

    /// Opens the video container and starts a zero-based writing session.
    ///
    /// A no-op while a session is recording or saving. On setup failure the
    /// recorder moves to `Error` and the cause is returned.
    pub async fn start_recording(&self) -> Result<RecorderState> {
        let mut inner = self.inner.lock().await;
        if inner.state.status.is_active() {
            debug!("start ignored: recorder is {}", inner.state.status.as_str());
            return Ok(inner.state.clone());
        }

        let started_at = Utc::now();
        let paths = RecordingPaths::generate_unused(
            &self.settings.output_dir,
            &self.settings.file_prefix,
            started_at,
        );

        let (writer, encode_settings) = match self.open_writer(&paths) {
            Ok(opened) => opened,
            Err(err) => {
                let reason = format!("{err:#}");
                error!("Failed to start recording: {reason}");
                // Leave no partial container behind.
                if paths.video.exists() {
                    if let Err(remove_err) = fs::remove_file(&paths.video) {
                        warn!(
                            "Failed to remove partial video {}: {remove_err}",
                            paths.video.display()
                        );
                    }
                }
                inner.state.reset();
                inner.state.fail(reason.clone());
                inner.active = None;
                inner.pending_result = None;
                drop(inner);

                self.emit(RecorderEvent::status_changed(RecordingStatus::Error));
                self.emit(RecorderEvent::SetupFailed { reason });
                return Err(err);
            }
        };

        let recording_id = Uuid::new_v4().to_string();
        info!(
            "Recording {} started: {} ({}x{})",
            recording_id,
            paths.video.display(),
            encode_settings.width,
            encode_settings.height
        );

        inner
            .state
            .begin_recording(recording_id.clone(), paths.clone(), started_at);
        inner.pending_result = None;
        inner.active = Some(ActiveRecording {
            id: recording_id,
            paths,
            writer,
            pipeline: CapturePipeline::new(encode_settings),
        });
        let snapshot = inner.state.clone();
        drop(inner);

        self.emit(RecorderEvent::status_changed(RecordingStatus::Recording));
        Ok(snapshot)
    }

    /// Feeds one tracking frame into the active recording.
    pub async fn process_frame(&self, frame: &TrackingFrame) -> FrameOutcome {
        self.inner.lock().await.process_frame(frame)
    }

    /// Same as [`Self::process_frame`], for tracking callbacks running on a plain
    /// thread. Must not be called from within the async runtime.
    pub fn process_frame_blocking(&self, frame: &TrackingFrame) -> FrameOutcome {
        self.inner.blocking_lock().process_frame(frame)
    }

    /// Finishes the video input and finalizes the recording in the background.
    ///
    /// Returns `None` when nothing is recording. The handle resolves once the
    /// container is flushed, the frame log is written and the evaluation has
    /// been published.
    pub async fn stop_recording(&self) -> Option<JoinHandle<RecordingOutcome>> {
        let active = {
            let mut inner = self.inner.lock().await;
            if inner.state.status != RecordingStatus::Recording {
                debug!("stop ignored: recorder is {}", inner.state.status.as_str());
                return None;
            }
            let mut active = inner.active.take()?;

            active.writer.mark_as_finished();
            inner.state.frame_count = active.pipeline.frames().len();
            inner.state.begin_saving();
            active
        };

        info!(
            "Recording {} stopped after {} frames; saving",
            active.id,
            active.pipeline.frames().len()
        );
        self.emit(RecorderEvent::status_changed(RecordingStatus::Saving));

        let controller = self.clone();
        Some(tokio::spawn(async move { controller.finalize(active).await }))
    }

    /// Hands out the latest evaluation once; later calls return `None`.
    pub async fn take_evaluation(&self) -> Option<EvaluationResult> {
        self.inner.lock().await.pending_result.take()
    }

    /// Returns a completed or failed recorder to idle. Returns whether it did.
    pub async fn reset(&self) -> bool {
        {
            let mut inner = self.inner.lock().await;
            if !matches!(
                inner.state.status,
                RecordingStatus::Completed | RecordingStatus::Error
            ) {
                return false;
            }
            inner.state.reset();
            inner.pending_result = None;
        }

        self.emit(RecorderEvent::status_changed(RecordingStatus::Idle));
        true
    }

    fn open_writer(&self, paths: &RecordingPaths) -> Result<(Box<dyn VideoWriter>, EncodeSettings)> {
        fs::create_dir_all(&self.settings.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.settings.output_dir.display()
            )
        })?;

        let encode_settings = EncodeSettings::for_screen(&self.settings.screen)?;
        let mut writer = self
            .writer_factory
            .create(&paths.video, &encode_settings)
            .context("failed to create video writer")?;
        writer
            .start_writing()
            .context("video writer refused to start")?;
        writer
            .start_session(MediaTime::ZERO)
            .context("failed to open writing session")?;

        Ok((writer, encode_settings))
    }

    async fn finalize(&self, active: ActiveRecording) -> RecordingOutcome {
        let ActiveRecording {
            id,
            paths,
            mut writer,
            pipeline,
        } = active;

        let video_error = match writer.finish_writing().await {
            Ok(()) => {
                info!("Video saved to {}", paths.video.display());
                None
            }
            Err(err) => {
                let reason = format!("{err:#}");
                error!("Failed to finalize video for recording {id}: {reason}");
                self.emit(RecorderEvent::PersistenceFailed {
                    recording_id: id.clone(),
                    reason: reason.clone(),
                });
                Some(reason)
            }
        };
        drop(writer);

        let metrics = pipeline.metrics();
        let frames = Arc::new(pipeline.into_frames());

        let data_error = {
            let frames = Arc::clone(&frames);
            let path = paths.data.clone();
            match tokio::task::spawn_blocking(move || save_frames(&path, &frames)).await {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(format!("{err:#}")),
                Err(join_err) => Some(format!("frame log writer failed: {join_err}")),
            }
        };
        match &data_error {
            None => info!("Frame data saved to {}", paths.data.display()),
            Some(reason) => {
                error!("Failed to save frame data for recording {id}: {reason}");
                self.emit(RecorderEvent::PersistenceFailed {
                    recording_id: id.clone(),
                    reason: reason.clone(),
                });
            }
        }

        let evaluation = evaluate_squat(&frames, &self.settings.rules);
        match &evaluation {
            Ok(result) => info!(
                "Recording {id} evaluated: {:.2}% correct over {} bottom frames",
                result.correctness_percentage, result.bottom_frame_count
            ),
            Err(reason) => info!("No evaluation for recording {id}: {reason}"),
        }

        {
            let mut inner = self.inner.lock().await;
            inner.state.complete();
            inner.pending_result = evaluation.as_ref().ok().copied();
        }

        self.emit(RecorderEvent::status_changed(RecordingStatus::Completed));
        match &evaluation {
            Ok(result) => self.emit(RecorderEvent::EvaluationReady {
                recording_id: id.clone(),
                result: *result,
            }),
            Err(reason) => self.emit(RecorderEvent::EvaluationUnavailable {
                recording_id: id.clone(),
                reason: reason.to_string(),
            }),
        }

        RecordingOutcome {
            recording_id: id,
            paths,
            frame_count: frames.len(),
            metrics,
            video_error,
            data_error,
            evaluation,
        }
    }

    fn emit(&self, event: RecorderEvent) {
        // No subscribers is fine; the state stays queryable.
        let _ = self.events.send(event);
    }
}

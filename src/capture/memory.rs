//! Headless [`VideoWriter`] used where no platform encoder is available.
//!
//! Nothing is encoded. Writers from [`MemoryWriterFactory`] create an empty
//! container file at the output path, and every writer records what it was asked
//! to do so callers can inspect presentation times and lifecycle calls after the fact.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;

use super::image_convert::EncodeBuffer;
use super::media_time::MediaTime;
use super::writer::{EncodeSettings, VideoWriter, VideoWriterFactory, WriterStatus};

/// Failure injection for writers produced by a [`MemoryWriterFactory`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryWriterBehavior {
    pub fail_create: bool,
    pub fail_append: bool,
    pub fail_finish: bool,
}

#[derive(Debug)]
pub struct MemoryWriterLog {
    pub output_path: PathBuf,
    pub settings: EncodeSettings,
    pub status: WriterStatus,
    pub ready: bool,
    pub session_start: Option<MediaTime>,
    pub presentation_times: Vec<MediaTime>,
    pub marked_finished: bool,
}

pub type SharedWriterLog = Arc<Mutex<MemoryWriterLog>>;

fn lock(log: &SharedWriterLog) -> MutexGuard<'_, MemoryWriterLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct MemoryVideoWriter {
    behavior: MemoryWriterBehavior,
    log: SharedWriterLog,
}

impl MemoryVideoWriter {
    pub fn new(output_path: &Path, settings: &EncodeSettings, behavior: MemoryWriterBehavior) -> Self {
        Self {
            behavior,
            log: Arc::new(Mutex::new(MemoryWriterLog {
                output_path: output_path.to_path_buf(),
                settings: settings.clone(),
                status: WriterStatus::Unknown,
                ready: true,
                session_start: None,
                presentation_times: Vec::new(),
                marked_finished: false,
            })),
        }
    }

    pub fn log(&self) -> SharedWriterLog {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl VideoWriter for MemoryVideoWriter {
    fn status(&self) -> WriterStatus {
        lock(&self.log).status
    }

    fn is_ready_for_more_media_data(&self) -> bool {
        let log = lock(&self.log);
        log.ready && !log.marked_finished
    }

    fn start_writing(&mut self) -> Result<()> {
        let mut log = lock(&self.log);
        if log.status != WriterStatus::Unknown {
            bail!("writer already started ({:?})", log.status);
        }
        log.status = WriterStatus::Writing;
        Ok(())
    }

    fn start_session(&mut self, at: MediaTime) -> Result<()> {
        let mut log = lock(&self.log);
        if log.status != WriterStatus::Writing {
            bail!("cannot start session while {:?}", log.status);
        }
        log.session_start = Some(at);
        Ok(())
    }

    fn append(&mut self, buffer: EncodeBuffer, presentation_time: MediaTime) -> Result<()> {
        let mut log = lock(&self.log);
        if self.behavior.fail_append {
            bail!("append rejected at {:?}", presentation_time);
        }
        if log.status != WriterStatus::Writing || log.session_start.is_none() {
            bail!("cannot append while {:?}", log.status);
        }
        if (buffer.width, buffer.height) != (log.settings.width, log.settings.height) {
            bail!(
                "buffer is {}x{}, writer expects {}x{}",
                buffer.width,
                buffer.height,
                log.settings.width,
                log.settings.height
            );
        }
        log.presentation_times.push(presentation_time);
        Ok(())
    }

    fn mark_as_finished(&mut self) {
        lock(&self.log).marked_finished = true;
    }

    async fn finish_writing(&mut self) -> Result<()> {
        let mut log = lock(&self.log);
        if self.behavior.fail_finish {
            log.status = WriterStatus::Failed;
            return Err(anyhow!("failed to finalize {}", log.output_path.display()));
        }
        log.status = WriterStatus::Completed;
        Ok(())
    }
}

/// Produces [`MemoryVideoWriter`]s, each with its container file created, and keeps
/// a handle to each one's log.
#[derive(Default)]
pub struct MemoryWriterFactory {
    behavior: MemoryWriterBehavior,
    created: Mutex<Vec<SharedWriterLog>>,
}

impl MemoryWriterFactory {
    pub fn new(behavior: MemoryWriterBehavior) -> Self {
        Self {
            behavior,
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn last_writer(&self) -> Option<SharedWriterLog> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn writer_count(&self) -> usize {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl VideoWriterFactory for MemoryWriterFactory {
    fn create(&self, output_path: &Path, settings: &EncodeSettings) -> Result<Box<dyn VideoWriter>> {
        if self.behavior.fail_create {
            bail!("cannot create container at {}", output_path.display());
        }
        File::create(output_path)
            .with_context(|| format!("cannot create container at {}", output_path.display()))?;

        let writer = MemoryVideoWriter::new(output_path, settings, self.behavior);
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(writer.log());
        Ok(Box::new(writer))
    }
}

mod types;

pub use types::{CaptureSample, DropReason, MetricsSnapshot};

const MAX_RECENT_CAPTURES: usize = 20;

/// Per-recording counters for the capture pipeline.
#[derive(Debug, Clone, Default)]
pub struct CaptureMetrics {
    snapshot: MetricsSnapshot,
}

impl CaptureMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_capture(&mut self, sample: CaptureSample) {
        let state = &mut self.snapshot;
        state.frames_recorded += 1;

        match sample.dropped {
            None if sample.appended => state.video_frames_appended += 1,
            None => {}
            Some(DropReason::NotReady) => state.dropped_not_ready += 1,
            Some(DropReason::ConversionFailed) => state.dropped_conversion_failed += 1,
            Some(DropReason::AppendFailed) => state.dropped_append_failed += 1,
            Some(DropReason::DuplicateTime) => state.dropped_duplicate_time += 1,
        }

        state.recent_captures.push(sample);
        if state.recent_captures.len() > MAX_RECENT_CAPTURES {
            state.recent_captures.remove(0);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp: f64, dropped: Option<DropReason>) -> CaptureSample {
        CaptureSample {
            timestamp,
            conversion_ms: Some(2),
            appended: dropped.is_none(),
            dropped,
        }
    }

    #[test]
    fn counts_appended_and_dropped_frames() {
        let mut metrics = CaptureMetrics::new();
        metrics.record_capture(sample(0.0, None));
        metrics.record_capture(sample(0.1, Some(DropReason::NotReady)));
        metrics.record_capture(sample(0.2, Some(DropReason::ConversionFailed)));
        metrics.record_capture(sample(0.3, None));
        metrics.record_capture(sample(0.3005, Some(DropReason::DuplicateTime)));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_recorded, 5);
        assert_eq!(snapshot.video_frames_appended, 2);
        assert_eq!(snapshot.dropped_duplicate_time, 1);
        assert_eq!(snapshot.video_frames_dropped(), 3);
        assert_eq!(snapshot.drift(), 3);
    }

    #[test]
    fn keeps_only_recent_samples() {
        let mut metrics = CaptureMetrics::new();
        for i in 0..(MAX_RECENT_CAPTURES + 5) {
            metrics.record_capture(sample(i as f64, None));
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.recent_captures.len(), MAX_RECENT_CAPTURES);
        assert_eq!(snapshot.recent_captures[0].timestamp, 5.0);
    }
}

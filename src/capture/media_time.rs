use serde::{Deserialize, Serialize};

/// Presentation timestamps use 1/600 s ticks, which divide evenly into common frame rates.
pub const PRESENTATION_TIMESCALE: i32 = 600;

/// A rational media timestamp: `value / timescale` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaTime {
    pub value: i64,
    pub timescale: i32,
}

impl MediaTime {
    pub const ZERO: MediaTime = MediaTime {
        value: 0,
        timescale: PRESENTATION_TIMESCALE,
    };

    /// Rounds `seconds` to the nearest tick. Negative or non-finite input maps to zero.
    pub fn from_seconds(seconds: f64, timescale: i32) -> Self {
        let ticks = (seconds * f64::from(timescale)).round();
        let value = if ticks.is_finite() && ticks > 0.0 {
            ticks as i64
        } else {
            0
        };

        Self { value, timescale }
    }

    pub fn seconds(&self) -> f64 {
        self.value as f64 / f64::from(self.timescale)
    }
}

impl Default for MediaTime {
    fn default() -> Self {
        MediaTime::ZERO
    }
}

/// Maps source frame timestamps onto zero-based presentation times for one recording.
#[derive(Debug, Clone, Default)]
pub struct PresentationClock {
    reference_timestamp: Option<f64>,
    last: MediaTime,
}

impl PresentationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first timestamp seen, latched on the first call to [`Self::presentation_time`].
    pub fn reference_timestamp(&self) -> Option<f64> {
        self.reference_timestamp
    }

    /// Presentation time for a source timestamp. The first call always yields zero and
    /// results never decrease.
    pub fn presentation_time(&mut self, timestamp: f64) -> MediaTime {
        let reference = *self.reference_timestamp.get_or_insert(timestamp);
        let time = MediaTime::from_seconds(timestamp - reference, PRESENTATION_TIMESCALE);

        if time.value < self.last.value {
            return self.last;
        }
        self.last = time;
        time
    }
}

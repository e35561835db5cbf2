// clock.rs - Frame clock
//
// Converts host timestamps (ms) into simulation deltas measured in frames.

use super::{FRAME_MS, MAX_FRAME_STEP};

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta in frames since the previous tick, clamped to `MAX_FRAME_STEP`.
    ///
    /// The first tick, non-finite timestamps and timestamps that go backwards
    /// all yield zero. A backgrounded tab resumes with a single bounded step.
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        if !timestamp_ms.is_finite() { return 0.0; }

        let prev = self.last.replace(timestamp_ms);
        let Some(prev) = prev else { return 0.0 };

        let frames = (timestamp_ms - prev) / FRAME_MS;
        if frames <= 0.0 { return 0.0; }
        if frames > MAX_FRAME_STEP {
            log::debug!("frame delta {frames:.1} clamped to {MAX_FRAME_STEP}");
            return MAX_FRAME_STEP;
        }
        frames
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

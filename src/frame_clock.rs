//! Frame Clock — Fixed-Step Accumulator
//!
//! Decouples the synthesis step rate from the caller's tick rate. Each
//! tick adds the caller's elapsed time to an accumulator; one synthesis
//! step is owed for every whole step interval accumulated, so a fast
//! caller gets zero-step ticks and a slow caller gets catch-up bursts.
//!
//! Catch-up is capped: at most `max_catchup` steps are returned per tick,
//! and whole intervals beyond the cap are dropped from the accumulator
//! (and logged). An uncapped clock would owe unbounded work after a
//! stalled caller resumes.
//!
//! ## Example
//!
//! ```rust
//! use phase_scramble::frame_clock::FrameClock;
//!
//! let mut clock = FrameClock::new(60.0, 8).unwrap();
//! assert_eq!(clock.tick(0.001), 0);   // under one interval: accumulate
//! assert_eq!(clock.tick(0.050), 3);   // 51 ms at 60 Hz: three steps owed
//! ```

use crate::types::{EngineError, EngineResult};

/// Fixed-step clock with capped catch-up.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Seconds per synthesis step (1 / target rate).
    interval: f64,
    /// Unspent elapsed time, always in [0, interval) after a tick.
    accumulator: f64,
    /// Most steps a single tick may return.
    max_catchup: u32,
}

impl FrameClock {
    /// Create a clock targeting `step_rate_hz` steps per second.
    ///
    /// `max_catchup` must be at least 1; a zero cap could never pay off
    /// accumulated time.
    pub fn new(step_rate_hz: f64, max_catchup: u32) -> EngineResult<Self> {
        if !(step_rate_hz > 0.0) || !step_rate_hz.is_finite() {
            return Err(EngineError::InvalidStepRate(step_rate_hz));
        }
        if max_catchup == 0 {
            return Err(EngineError::InvalidCatchupCap);
        }
        Ok(Self {
            interval: 1.0 / step_rate_hz,
            accumulator: 0.0,
            max_catchup,
        })
    }

    /// Seconds per step.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Add `dt` seconds and return how many steps to execute now.
    ///
    /// Negative `dt` is treated as zero.
    pub fn tick(&mut self, dt: f64) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0u32;
        while self.accumulator >= self.interval && steps < self.max_catchup {
            self.accumulator -= self.interval;
            steps += 1;
        }
        if self.accumulator >= self.interval {
            let dropped = (self.accumulator / self.interval).floor();
            self.accumulator -= dropped * self.interval;
            tracing::warn!(
                dropped_steps = dropped as u64,
                "frame clock catch-up cap hit, dropping accumulated time"
            );
        }
        steps
    }

    /// Discard any accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

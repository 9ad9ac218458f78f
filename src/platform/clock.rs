//! Frame-rate governor
//!
//! One simulation tick per frame, so the loop is capped at the tick rate by
//! sleeping off whatever is left of each frame.

use std::time::{Duration, Instant};

use crate::consts::TICKS_PER_SECOND;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_time: Duration,
    last: Instant,
    frame_times: [Duration; FPS_WINDOW],
    frame_index: usize,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TICKS_PER_SECOND)
    }
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            frame_time: Duration::from_secs(1) / fps.max(1),
            last: Instant::now(),
            frame_times: [Duration::ZERO; FPS_WINDOW],
            frame_index: 0,
            frames: 0,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Block until the current frame's slot is over
    pub fn wait(&mut self) {
        let elapsed = self.last.elapsed();
        if let Some(remaining) = self.frame_time.checked_sub(elapsed) {
            std::thread::sleep(remaining);
        }
        let now = Instant::now();
        self.record(now - self.last);
        self.last = now;
    }

    fn record(&mut self, frame: Duration) {
        self.frame_times[self.frame_index] = frame;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames += 1;
    }

    /// Average rate over the recent frames
    pub fn fps(&self) -> f32 {
        let count = (self.frames as usize).min(FPS_WINDOW);
        if count == 0 {
            return 0.0;
        }
        let total: Duration = self.frame_times.iter().take(count).sum();
        if total.is_zero() {
            return 0.0;
        }
        count as f32 / total.as_secs_f32()
    }
}

//! Wall-clock frame pacing
use shade3d_core::FrameClock;
use std::time::{Duration, Instant};

/// Sleeps out the remainder of each frame and reports real elapsed time.
#[derive(Debug)]
pub struct WallClock {
    last_tick: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for WallClock {
    fn tick(&mut self, target_fps: u32) -> f64 {
        let target_frame_time = Duration::from_secs_f64(1.0 / target_fps.max(1) as f64);

        let elapsed = self.last_tick.elapsed();
        if elapsed < target_frame_time {
            std::thread::sleep(target_frame_time - elapsed);
        }

        let now = Instant::now();
        let delta = now - self.last_tick;
        self.last_tick = now;
        delta.as_secs_f64()
    }
}

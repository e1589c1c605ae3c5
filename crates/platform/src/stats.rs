//! Frame-rate sampling for `--show-fps`.

use std::time::{Duration, Instant};

const REPORT_EVERY: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct FrameStats {
    window_start: Instant,
    frames_in_window: u32,
    total_frames: u64,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            total_frames: 0,
        }
    }

    /// Count a presented frame. Returns the average FPS once a full second
    /// has passed since the last report.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames_in_window += 1;
        self.total_frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < REPORT_EVERY {
            return None;
        }
        let fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
        self.window_start = now;
        self.frames_in_window = 0;
        Some(fps)
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let t0 = Instant::now();
        let mut stats = FrameStats::new(t0);
        for i in 1..60 {
            assert_eq!(stats.tick(t0 + Duration::from_millis(i * 16)), None);
        }
        let fps = stats.tick(t0 + Duration::from_secs(1)).expect("report due");
        assert!((fps - 60.0).abs() < 1e-3);
        assert_eq!(stats.total_frames(), 60);
        // window restarted
        assert_eq!(stats.tick(t0 + Duration::from_millis(1100)), None);
    }
}

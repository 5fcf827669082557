use web_time::{Duration, Instant};

/// Frame timing with smoothed FPS and the raw duration of the most
/// recent frame (consumed by the LOD manager's timing adjustment).
#[derive(Debug)]
pub struct FrameTiming {
    /// Last frame timestamp.
    last_frame: Instant,
    /// Duration of the most recently completed frame.
    last_duration: Option<Duration>,
    /// Smoothed FPS using exponential moving average.
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0).
    smoothing: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a new frame timer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            last_duration: None,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Call after rendering each frame to update timing.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.last_duration = Some(elapsed);

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Duration of the most recently completed frame, if any.
    #[must_use]
    pub fn last_frame_duration(&self) -> Option<Duration> {
        self.last_duration
    }

    /// Get the current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_frame_records_a_duration() {
        let mut timing = FrameTiming::new();
        assert!(timing.last_frame_duration().is_none());
        timing.end_frame();
        assert!(timing.last_frame_duration().is_some());
        assert!(timing.fps() > 0.0);
    }
}

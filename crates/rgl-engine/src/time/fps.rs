/// Averages frame rate over fixed-size windows of frames.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: u32,
    frames: u32,
    seconds: f32,
}

impl FpsCounter {
    /// Reports once every `interval` frames (at least one).
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            frames: 0,
            seconds: 0.0,
        }
    }

    /// Records one frame of `dt` seconds; returns the window's average FPS
    /// when the window completes.
    pub fn record(&mut self, dt: f32) -> Option<f32> {
        self.frames += 1;
        self.seconds += dt;
        if self.frames < self.interval {
            return None;
        }

        let fps = if self.seconds > 0.0 {
            self.frames as f32 / self.seconds
        } else {
            0.0
        };
        self.frames = 0;
        self.seconds = 0.0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_interval() {
        let mut fps = FpsCounter::new(4);
        assert_eq!(fps.record(0.25), None);
        assert_eq!(fps.record(0.25), None);
        assert_eq!(fps.record(0.25), None);
        assert_eq!(fps.record(0.25), Some(4.0));
        assert_eq!(fps.record(0.5), None);
    }

    #[test]
    fn zero_interval_reports_each_frame() {
        let mut fps = FpsCounter::new(0);
        assert_eq!(fps.record(0.5), Some(2.0));
    }
}

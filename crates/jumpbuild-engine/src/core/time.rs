use std::time::{Duration, Instant};

/// One simulation tick handed to the per-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTick {
    /// Seconds elapsed since the previous timestamp.
    pub delta_seconds: f32,
    /// True exactly once per elapsed second of wall time.
    pub second_boundary: bool,
    /// Frames counted during the second that just ended (0 unless on a boundary).
    pub frames_last_second: u32,
}

/// Source of monotonic timestamps, one read per frame.
pub trait TimeSource {
    /// Time elapsed since an arbitrary fixed epoch.
    fn now(&mut self) -> Duration;
}

/// Wall clock backed by [`Instant`].
pub struct MonotonicTime {
    epoch: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&mut self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Turns raw timestamps into frame deltas plus a once-per-second boundary.
pub struct FrameClock {
    /// Timestamp of the previous frame.
    last_frame: Option<Duration>,
    /// Timestamp of the last second boundary.
    second_mark: Option<Duration>,
    /// Frames counted since `second_mark`.
    frame_count: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            second_mark: None,
            frame_count: 0,
        }
    }

    /// Forget all timing history. The next timestamp yields a zero delta.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance the clock to `now`.
    pub fn tick(&mut self, now: Duration) -> FrameTick {
        let delta = match self.last_frame {
            Some(last) => now.saturating_sub(last),
            None => Duration::ZERO,
        };

        let mut tick = FrameTick {
            delta_seconds: delta.as_secs_f32(),
            second_boundary: false,
            frames_last_second: 0,
        };

        match self.second_mark {
            None => self.second_mark = Some(now),
            Some(mark) if now.saturating_sub(mark) >= Duration::from_secs(1) => {
                log::info!("framerate: {}fps", self.frame_count);
                log::debug!("frametime: {:.3}ms", delta.as_secs_f64() * 1e3);
                tick.second_boundary = true;
                tick.frames_last_second = self.frame_count;
                self.frame_count = 0;
                self.second_mark = Some(now);
            }
            Some(_) => {}
        }

        self.frame_count += 1;
        self.last_frame = Some(now);
        tick
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

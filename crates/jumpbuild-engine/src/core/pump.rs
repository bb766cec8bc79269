//! Frame pump: paces a per-frame callback to a target rate.
//!
//! The pump owns no game state. Each iteration it reads a timestamp, feeds it
//! through a [`FrameClock`], calls the callback, then waits for the frame
//! interval on a cancellation channel. Waiting on the channel keeps the thread
//! parked instead of spinning, and any [`PumpHandle`] can wake it to cancel.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::core::time::{FrameClock, FrameTick, TimeSource};

/// What the callback wants the pump to do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep pumping.
    Continue,
    /// The session restarted itself; start timing afresh.
    Restarted,
    /// Leave the loop.
    Stop,
}

/// Why [`FramePump::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpExit {
    /// The callback asked to stop.
    Stopped,
    /// A pacing wait was interrupted through a [`PumpHandle`].
    Cancelled,
}

/// Cancels a running pump from any thread.
#[derive(Debug, Clone)]
pub struct PumpHandle {
    cancel: Sender<()>,
}

impl PumpHandle {
    /// Interrupt the pump's current (or next) wait.
    pub fn cancel(&self) {
        // A full channel already carries a pending cancellation.
        let _ = self.cancel.try_send(());
    }
}

pub struct FramePump {
    clock: FrameClock,
    frame_interval: Duration,
    cancel_tx: Sender<()>,
    cancel_rx: Receiver<()>,
}

impl FramePump {
    /// Create a pump targeting `target_fps` callbacks per second.
    pub fn new(target_fps: u32) -> Self {
        let (cancel_tx, cancel_rx) = crossbeam_channel::bounded(1);
        Self {
            clock: FrameClock::new(),
            frame_interval: Self::interval_for(target_fps),
            cancel_tx,
            cancel_rx,
        }
    }

    /// Whole milliseconds to wait between frames.
    pub fn interval_for(target_fps: u32) -> Duration {
        Duration::from_millis(1_000 / u64::from(target_fps.max(1)))
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn handle(&self) -> PumpHandle {
        PumpHandle {
            cancel: self.cancel_tx.clone(),
        }
    }

    /// Pump frames until the callback stops, fails, or the wait is cancelled.
    ///
    /// A callback error halts the pump and is returned unchanged.
    pub fn run<T, F, E>(&mut self, time: &mut T, mut on_frame: F) -> Result<PumpExit, E>
    where
        T: TimeSource,
        F: FnMut(FrameTick) -> Result<FrameControl, E>,
    {
        // Drop a cancellation left over from a previous run.
        while self.cancel_rx.try_recv().is_ok() {}
        self.clock.reset();

        loop {
            let tick = self.clock.tick(time.now());
            match on_frame(tick)? {
                FrameControl::Continue => {}
                FrameControl::Restarted => self.clock.reset(),
                FrameControl::Stop => return Ok(PumpExit::Stopped),
            }

            match self.cancel_rx.recv_timeout(self.frame_interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    log::error!("Game loop frame limiter interrupted. Stopping.");
                    return Ok(PumpExit::Cancelled);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// Advances by a fixed step on every read.
    struct SteppedTime {
        now: Duration,
        step: Duration,
    }

    impl TimeSource for SteppedTime {
        fn now(&mut self) -> Duration {
            let now = self.now;
            self.now += self.step;
            now
        }
    }

    fn stepped(step_ms: u64) -> SteppedTime {
        SteppedTime {
            now: Duration::ZERO,
            step: Duration::from_millis(step_ms),
        }
    }

    #[test]
    fn interval_targets_frame_rate() {
        assert_eq!(FramePump::interval_for(120), Duration::from_millis(8));
        assert_eq!(FramePump::interval_for(0), Duration::from_secs(1));
    }

    #[test]
    fn stops_when_callback_asks() {
        let mut pump = FramePump::new(1_000);
        let mut time = stepped(250);
        let mut ticks = Vec::new();
        let exit = pump
            .run(&mut time, |tick| {
                ticks.push(tick);
                Ok::<_, Infallible>(if ticks.len() == 6 {
                    FrameControl::Stop
                } else {
                    FrameControl::Continue
                })
            })
            .unwrap();
        assert_eq!(exit, PumpExit::Stopped);
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].delta_seconds, 0.0);
        assert!((ticks[1].delta_seconds - 0.25).abs() < 1e-6);
        assert_eq!(ticks.iter().filter(|t| t.second_boundary).count(), 1);
    }

    #[test]
    fn callback_error_halts_pump() {
        let mut pump = FramePump::new(1_000);
        let mut time = stepped(1);
        let mut frames = 0;
        let result = pump.run(&mut time, |_| {
            frames += 1;
            if frames == 3 {
                Err("boom")
            } else {
                Ok(FrameControl::Continue)
            }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(frames, 3);
    }

    #[test]
    fn cancellation_interrupts_wait() {
        let mut pump = FramePump::new(1);
        let handle = pump.handle();
        let mut time = stepped(1);
        let mut frames = 0;
        let exit = pump
            .run(&mut time, |_| {
                frames += 1;
                handle.cancel();
                Ok::<_, Infallible>(FrameControl::Continue)
            })
            .unwrap();
        assert_eq!(exit, PumpExit::Cancelled);
        assert_eq!(frames, 1);
    }

    #[test]
    fn cancel_from_another_thread() {
        let mut pump = FramePump::new(1_000);
        let handle = pump.handle();
        let worker = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            handle.cancel();
        });
        let mut time = stepped(1);
        let exit = pump
            .run(&mut time, |_| Ok::<_, Infallible>(FrameControl::Continue))
            .unwrap();
        worker.join().unwrap();
        assert_eq!(exit, PumpExit::Cancelled);
    }

    #[test]
    fn restart_resets_clock() {
        let mut pump = FramePump::new(1_000);
        let mut time = stepped(100);
        let mut ticks = Vec::new();
        pump.run(&mut time, |tick| {
            ticks.push(tick);
            Ok::<_, Infallible>(match ticks.len() {
                3 => FrameControl::Restarted,
                5 => FrameControl::Stop,
                _ => FrameControl::Continue,
            })
        })
        .unwrap();
        assert_eq!(ticks[3].delta_seconds, 0.0);
        assert!(ticks[4].delta_seconds > 0.0);
    }
}

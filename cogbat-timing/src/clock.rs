//! Monotonic trial clock.
//!
//! All readings share one origin until [`TrialClock::reset`]; readings from
//! two different clocks are never comparable. Built on `tokio::time::Instant`
//! so it is the std monotonic clock in production and the virtual clock under
//! `start_paused` tests, immune to wall-clock adjustment either way.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Duration, Instant, sleep};

use cogbat_core::Millis;

use crate::frame::FrameListener;

pub struct TrialClock {
    origin: Mutex<Instant>,
    frames: Option<FrameListener>,
    /// Set when the frame driver disappears mid-run; presentation then falls
    /// back to immediate execution instead of failing.
    degraded: AtomicBool,
}

impl TrialClock {
    /// Clock with frame-aligned presentation.
    pub fn new(frames: FrameListener) -> Self {
        Self {
            origin: Mutex::new(Instant::now()),
            frames: Some(frames),
            degraded: AtomicBool::new(false),
        }
    }

    /// Clock for hosts without a refresh-aligned primitive. Presentation runs
    /// immediately; callers get reduced precision, not errors.
    pub fn without_frames() -> Self {
        Self {
            origin: Mutex::new(Instant::now()),
            frames: None,
            degraded: AtomicBool::new(true),
        }
    }

    fn origin(&self) -> Instant {
        *self.origin.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Milliseconds since the last reset.
    pub fn now(&self) -> Millis {
        Instant::now().duration_since(self.origin()).as_secs_f64() * 1000.0
    }

    /// Rebase the origin to the current instant. Done once per run so
    /// reaction times are small positive numbers, not session offsets.
    pub fn reset(&self) {
        *self.origin.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    /// Convert a timestamp sampled from the same clock domain (e.g. an input
    /// event) to clock-relative time. Timestamps before the origin clamp
    /// to 0; no other validation is performed.
    pub fn from_external(&self, ts: Instant) -> Millis {
        ts.saturating_duration_since(self.origin()).as_secs_f64() * 1000.0
    }

    /// Best-effort coarse delay. Not frame-accurate; used for fixation,
    /// feedback and inter-trial intervals where sub-frame precision is not
    /// required.
    pub async fn delay(&self, ms: Millis) {
        if ms > 0.0 {
            sleep(Duration::from_secs_f64(ms / 1000.0)).await;
        }
    }

    /// Whether frame-aligned presentation is unavailable.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Run `render` aligned to the next display refresh and return the onset
    /// reading taken after the following refresh.
    ///
    /// One tick only proves the mutation was requested before a refresh;
    /// waiting one further tick proves the refresh containing it has been
    /// committed, so the returned reading is a true onset. Sole source of
    /// stimulus-onset timestamps when visual precision matters.
    pub async fn present_on_next_frame<F: FnOnce()>(&self, render: F) -> Millis {
        let Some(frames) = self.frames.as_ref().filter(|_| !self.is_degraded()) else {
            render();
            return self.now();
        };

        let mut ticks = frames.subscribe();
        if self.recv_tick(&mut ticks).await.is_err() {
            render();
            return self.now();
        }
        render();
        let _ = self.recv_tick(&mut ticks).await;
        self.now()
    }

    async fn recv_tick(&self, rx: &mut tokio::sync::broadcast::Receiver<()>) -> Result<(), ()> {
        match rx.recv().await {
            Ok(()) => Ok(()),
            // Missed ticks still mean a refresh happened.
            Err(RecvError::Lagged(_)) => Ok(()),
            Err(RecvError::Closed) => {
                tracing::warn!("frame driver gone; presentation degraded to immediate");
                self.degraded.store(true, Ordering::Relaxed);
                Err(())
            }
        }
    }
}

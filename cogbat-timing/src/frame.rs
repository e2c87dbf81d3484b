//! Display-refresh alignment.
//!
//! The host's render loop owns a [`FrameDriver`] and calls [`FrameDriver::tick`]
//! once per committed refresh; the paired [`FrameListener`] is what a
//! [`crate::TrialClock`] consumes to align stimulus presentation with paint.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::broadcast;
use tokio::time::Instant;

const TICK_CAPACITY: usize = 64;
const INTERVAL_SAMPLES: usize = 240;
const MIN_INTERVALS: usize = 10;

/// Create a connected driver/listener pair.
pub fn frame_channel() -> (FrameDriver, FrameListener) {
    let (tx, rx) = broadcast::channel(TICK_CAPACITY);
    let listener = FrameListener { rx };
    let driver = FrameDriver {
        tx,
        ticks: Mutex::new(VecDeque::with_capacity(INTERVAL_SAMPLES)),
    };
    (driver, listener)
}

/// Host side of the frame channel. Dropping it leaves listeners in degraded
/// mode rather than failing them.
pub struct FrameDriver {
    tx: broadcast::Sender<()>,
    ticks: Mutex<VecDeque<Instant>>,
}

impl FrameDriver {
    /// Signal that a display refresh has just been committed.
    pub fn tick(&self) {
        let now = Instant::now();
        {
            let mut ticks = self.ticks.lock().unwrap_or_else(|e| e.into_inner());
            if ticks.len() == INTERVAL_SAMPLES {
                ticks.pop_front();
            }
            ticks.push_back(now);
        }
        // No receivers is fine: nothing is presenting right now.
        let _ = self.tx.send(());
    }

    /// Estimated refresh rate in Hz from the median inter-tick interval,
    /// or `None` until enough ticks have been observed.
    pub fn refresh_rate(&self) -> Option<f64> {
        let ticks = self.ticks.lock().unwrap_or_else(|e| e.into_inner());
        if ticks.len() < MIN_INTERVALS + 1 {
            return None;
        }
        let mut intervals: Vec<f64> = ticks
            .iter()
            .zip(ticks.iter().skip(1))
            .map(|(a, b)| b.duration_since(*a).as_secs_f64() * 1000.0)
            .collect();
        intervals.sort_by(|a, b| a.total_cmp(b));
        let median = intervals[intervals.len() / 2];
        if median > 0.0 { Some(1000.0 / median) } else { None }
    }
}

/// Presentation side of the frame channel. If the driver has been dropped,
/// subscriptions report a closed channel and the clock falls back to
/// degraded presentation.
pub struct FrameListener {
    rx: broadcast::Receiver<()>,
}

impl FrameListener {
    /// Subscribe to ticks. Only ticks after this call are delivered.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<()> {
        self.rx.resubscribe()
    }
}

impl Clone for FrameListener {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.resubscribe(),
        }
    }
}

/// Effective granularity of the monotonic clock in milliseconds: the median
/// of 100 minimal nonzero deltas. Uses the real clock, not virtual test time.
pub fn timer_resolution_ms() -> f64 {
    let mut samples = Vec::with_capacity(100);
    for _ in 0..100 {
        let t1 = std::time::Instant::now();
        let mut t2 = std::time::Instant::now();
        while t2 == t1 {
            t2 = std::time::Instant::now();
        }
        samples.push(t2.duration_since(t1).as_secs_f64() * 1000.0);
    }
    samples.sort_by(|a, b| a.total_cmp(b));
    samples[samples.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, advance};

    #[tokio::test(start_paused = true)]
    async fn refresh_rate_needs_enough_ticks() {
        let (driver, _listener) = frame_channel();
        for _ in 0..5 {
            driver.tick();
            advance(Duration::from_millis(16)).await;
        }
        assert!(driver.refresh_rate().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_rate_estimates_from_median_interval() {
        let (driver, _listener) = frame_channel();
        for _ in 0..30 {
            driver.tick();
            advance(Duration::from_millis(16)).await;
        }
        let hz = driver.refresh_rate().expect("enough ticks");
        assert!((hz - 62.5).abs() < 0.5, "estimated {hz} Hz");
    }

    #[test]
    fn timer_resolution_is_positive_and_finite() {
        let res = timer_resolution_ms();
        assert!(res.is_finite());
        assert!(res > 0.0);
    }
}

//! Response capture with clock-relative timestamps.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::time::{Duration, Instant, sleep_until};

use cogbat_core::{Millis, ResponseEvent, ResponseKind};
use cogbat_timing::TrialClock;

use crate::input::{InputHub, RawInput};

/// Which inputs qualify for a capture. Keyboard is always armed;
/// pointer/touch are opt-in. The identifier allow-set restricts keyboard
/// events only.
#[derive(Debug, Clone, Default)]
pub struct ResponseFilter {
    /// `None` = any key qualifies.
    pub valid_responses: Option<Vec<String>>,
    pub allow_pointer: bool,
    pub allow_touch: bool,
}

impl ResponseFilter {
    pub fn keys(valid: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            valid_responses: Some(valid.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    fn qualify(&self, clock: &TrialClock, raw: &RawInput) -> Option<ResponseEvent> {
        if raw.repeat {
            return None;
        }
        match raw.kind {
            ResponseKind::Keyboard => {
                if let Some(valid) = &self.valid_responses {
                    let matches = raw
                        .identifier
                        .as_deref()
                        .is_some_and(|id| valid.iter().any(|v| v == id));
                    if !matches {
                        return None;
                    }
                }
            }
            ResponseKind::Pointer if !self.allow_pointer => return None,
            ResponseKind::Touch if !self.allow_touch => return None,
            _ => {}
        }
        Some(ResponseEvent {
            kind: raw.kind,
            identifier: raw.identifier.clone(),
            timestamp: clock.from_external(raw.timestamp),
            coordinates: raw.coordinates,
        })
    }
}

/// Captures the first qualifying input after arming, or every qualifying
/// input in continuous mode. One `wait_for_response` at a time per collector;
/// the trial runner never overlaps them.
pub struct ResponseCollector {
    clock: Arc<TrialClock>,
    hub: InputHub,
    /// Edge-triggered teardown signal: bumping the counter cancels exactly
    /// the waits and continuous tasks armed before the bump.
    cancel: watch::Sender<u32>,
}

impl ResponseCollector {
    pub fn new(clock: Arc<TrialClock>, hub: InputHub) -> Self {
        let (cancel, _) = watch::channel(0);
        Self { clock, hub, cancel }
    }

    /// Resolve with the first qualifying event, or `None` once `timeout`
    /// milliseconds (measured from arming) elapse. The subscription is
    /// dropped the instant either happens, so a near-simultaneous second
    /// event can neither resolve nor leak.
    pub async fn wait_for_response(
        &self,
        filter: &ResponseFilter,
        timeout: Option<Millis>,
    ) -> Option<ResponseEvent> {
        let mut events = self.hub.subscribe();
        let mut cancel = self.cancel.subscribe();
        cancel.mark_unchanged();
        let deadline = timeout.map(|ms| Instant::now() + Duration::from_secs_f64(ms.max(0.0) / 1000.0));

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    tracing::trace!("response wait torn down");
                    return None;
                }
                _ = until(deadline) => {
                    tracing::trace!(?timeout, "response window elapsed");
                    return None;
                }
                received = events.recv() => match received {
                    Ok(raw) => {
                        if let Some(event) = filter.qualify(&self.clock, &raw) {
                            return Some(event);
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "input events dropped under load");
                    }
                    Err(RecvError::Closed) => {
                        tracing::warn!("input hub closed while waiting for a response");
                        return None;
                    }
                },
            }
        }
    }

    /// Invoke `callback` for every qualifying event until the handle is
    /// stopped (or this collector is destroyed). For free-response phases
    /// where multiple inputs matter, e.g. typed recall.
    ///
    /// Not supported concurrently with an active `wait_for_response`.
    pub fn start_continuous<F>(&self, filter: ResponseFilter, mut callback: F) -> ContinuousHandle
    where
        F: FnMut(ResponseEvent) + Send + 'static,
    {
        let mut events = self.hub.subscribe();
        let mut cancel = self.cancel.subscribe();
        cancel.mark_unchanged();
        let (stop, mut stopped) = watch::channel(());
        stopped.mark_unchanged();
        let clock = Arc::clone(&self.clock);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.changed() => break,
                    // Err means the handle was dropped; stop either way.
                    _ = stopped.changed() => break,
                    received = events.recv() => match received {
                        Ok(raw) => {
                            if let Some(event) = filter.qualify(&clock, &raw) {
                                callback(event);
                            }
                        }
                        Err(RecvError::Lagged(missed)) => {
                            tracing::warn!(missed, "input events dropped under load");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            tracing::trace!("continuous collection stopped");
        });

        ContinuousHandle { stop }
    }

    /// Tear down every outstanding wait and continuous task. Idempotent;
    /// waits armed after this call are unaffected.
    pub fn destroy(&self) {
        self.cancel.send_modify(|generation| *generation += 1);
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(instant) => sleep_until(instant).await,
        None => std::future::pending().await,
    }
}

/// Stops a continuous collection. Dropping the handle stops it too.
pub struct ContinuousHandle {
    stop: watch::Sender<()>,
}

impl ContinuousHandle {
    pub fn stop(&self) {
        let _ = self.stop.send(());
    }
}

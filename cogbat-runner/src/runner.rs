//! Phase state machine driving a sequence of trials.
//!
//! One runner instance drives one run of N trials, strictly sequentially:
//! phase k+1 of trial i never starts before phase k has resolved, and trial
//! i+1 never starts before trial i's inter-trial interval has elapsed.
//! Concurrent trials would corrupt response arming and attribute responses
//! to the wrong trial, so `run` is not re-entrant.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use cogbat_core::{
    EngineError, Evaluation, ResponseEvent, TrialConfig, TrialOutcome, TrialPhase,
};
use cogbat_response::{InputHub, ResponseCollector, ResponseFilter};
use cogbat_timing::TrialClock;

/// Live view of a run for progress display. Published through a watch
/// channel; observers read, only the runner writes.
#[derive(Debug, Clone, Default)]
pub struct RunStatus {
    pub phase: TrialPhase,
    /// Zero-based index of the trial currently in flight.
    pub current_trial: usize,
    pub total_trials: usize,
    /// Fully completed trials, in order. Append-only.
    pub results: Vec<TrialOutcome>,
    pub last_outcome: Option<TrialOutcome>,
}

impl RunStatus {
    pub fn completed(&self) -> usize {
        self.results.len()
    }
}

pub struct TrialRunner {
    clock: Arc<TrialClock>,
    collector: ResponseCollector,
    status: watch::Sender<RunStatus>,
    aborted: AtomicBool,
    destroyed: AtomicBool,
    running: AtomicBool,
}

impl TrialRunner {
    pub fn new(clock: Arc<TrialClock>, hub: InputHub) -> Self {
        let collector = ResponseCollector::new(Arc::clone(&clock), hub);
        let (status, _) = watch::channel(RunStatus::default());
        Self {
            clock,
            collector,
            status,
            aborted: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            running: AtomicBool::new(false),
        }
    }

    /// The clock shared with this runner. Paradigms that need pixel-accurate
    /// onsets render through `present_on_next_frame` on this clock; the
    /// runner records onset time, it does not render.
    pub fn clock(&self) -> &Arc<TrialClock> {
        &self.clock
    }

    /// The collector, for free-response phases a paradigm drives itself
    /// (continuous capture between runs).
    pub fn collector(&self) -> &ResponseCollector {
        &self.collector
    }

    /// Snapshot of the current run status.
    pub fn status(&self) -> RunStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to status changes; for rendering collaborators that track
    /// phase transitions without polling.
    pub fn watch_status(&self) -> watch::Receiver<RunStatus> {
        self.status.subscribe()
    }

    /// Run trials with a per-trial completion callback.
    ///
    /// `evaluate` receives the stimulus and the captured response (or `None`
    /// on timeout) and judges correctness only; the runner computes reaction
    /// time from its own timestamps. Returns the outcomes accumulated so
    /// far, which on abort means every fully completed trial.
    pub async fn run_with<S, E, C>(
        &self,
        trials: Vec<TrialConfig<S>>,
        mut evaluate: E,
        mut on_trial_complete: C,
    ) -> Result<Vec<TrialOutcome>, EngineError>
    where
        E: FnMut(&S, Option<&ResponseEvent>) -> Evaluation,
        C: FnMut(&TrialOutcome, usize),
    {
        if self.destroyed.load(Ordering::Acquire) {
            return Err(EngineError::Destroyed);
        }
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(EngineError::AlreadyRunning);
        }
        let _guard = RunGuard(&self.running);

        self.aborted.store(false, Ordering::Release);
        self.clock.reset();
        let total = trials.len();
        self.status.send_modify(|s| {
            *s = RunStatus {
                total_trials: total,
                ..RunStatus::default()
            }
        });
        tracing::debug!(total, "run started");

        let mut results: Vec<TrialOutcome> = Vec::with_capacity(total);
        for (index, trial) in trials.into_iter().enumerate() {
            self.enter_phase(index, TrialPhase::Fixation);
            if trial.fixation_duration > 0.0 {
                self.clock.delay(trial.fixation_duration).await;
            }
            if self.aborted.load(Ordering::Acquire) {
                break;
            }

            self.enter_phase(index, TrialPhase::Stimulus);
            let stimulus_onset = self.clock.now();

            self.enter_phase(index, TrialPhase::Response);
            let filter = ResponseFilter {
                valid_responses: trial.valid_responses.clone(),
                ..ResponseFilter::default()
            };
            let response = self
                .collector
                .wait_for_response(&filter, trial.response_deadline())
                .await;
            if self.aborted.load(Ordering::Acquire) {
                break;
            }

            let evaluation = evaluate(&trial.stimulus, response.as_ref());
            let outcome = TrialOutcome {
                correct: evaluation.correct,
                reaction_time: response.as_ref().map(|r| r.timestamp - stimulus_onset),
                response_identifier: response.as_ref().and_then(|r| r.identifier.clone()),
                stimulus_onset,
                response_timestamp: response.as_ref().map(|r| r.timestamp),
                custom_data: evaluation.custom_data,
            };
            tracing::debug!(
                trial = index,
                correct = outcome.correct,
                rt = ?outcome.reaction_time,
                "trial evaluated"
            );

            if trial.show_feedback {
                self.enter_phase(index, TrialPhase::Feedback);
                self.clock.delay(trial.feedback_duration).await;
                if self.aborted.load(Ordering::Acquire) {
                    break;
                }
            }

            self.enter_phase(index, TrialPhase::Iti);
            self.clock.delay(trial.iti.resolve()).await;
            if self.aborted.load(Ordering::Acquire) {
                break;
            }

            results.push(outcome.clone());
            self.status.send_modify(|s| {
                s.results.push(outcome.clone());
                s.last_outcome = Some(outcome.clone());
            });
            on_trial_complete(&outcome, index);
        }

        self.status.send_modify(|s| s.phase = TrialPhase::Idle);
        tracing::debug!(completed = results.len(), "run finished");
        Ok(results)
    }

    /// Run trials without a completion callback.
    pub async fn run<S, E>(
        &self,
        trials: Vec<TrialConfig<S>>,
        evaluate: E,
    ) -> Result<Vec<TrialOutcome>, EngineError>
    where
        E: FnMut(&S, Option<&ResponseEvent>) -> Evaluation,
    {
        self.run_with(trials, evaluate, |_, _| {}).await
    }

    /// Cancel the run cooperatively. The flag is observed at the next
    /// suspension-point boundary; the in-flight trial's partial state is
    /// discarded, completed outcomes are kept, and the phase returns to
    /// `Idle`. Synchronous evaluation code is never interrupted.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
        self.collector.destroy();
        tracing::debug!("run aborted");
    }

    /// `abort` plus permanent disposal: `run` is no longer permitted.
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::Release);
        self.abort();
    }

    fn enter_phase(&self, index: usize, phase: TrialPhase) {
        self.status.send_modify(|s| {
            s.current_trial = index;
            s.phase = phase;
        });
        tracing::trace!(trial = index, ?phase, "phase entered");
    }
}

/// Clears the running flag on every exit path of `run_with`.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

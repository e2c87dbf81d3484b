use std::fmt;
use std::sync::Arc;

/// Milliseconds on the trial clock. Sub-millisecond precision is carried in
/// the fraction.
pub type Millis = f64;

/// Inter-trial interval: a fixed duration or a generator drawn once per
/// trial, which is how paradigms express jittered ISIs.
#[derive(Clone)]
pub enum ItiSpec {
    Fixed(Millis),
    Generator(Arc<dyn Fn() -> Millis + Send + Sync>),
}

impl ItiSpec {
    /// Draw the interval for one trial.
    pub fn resolve(&self) -> Millis {
        match self {
            ItiSpec::Fixed(ms) => *ms,
            ItiSpec::Generator(f) => f(),
        }
    }
}

impl fmt::Debug for ItiSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItiSpec::Fixed(ms) => f.debug_tuple("Fixed").field(ms).finish(),
            ItiSpec::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

impl From<f64> for ItiSpec {
    fn from(ms: f64) -> Self {
        ItiSpec::Fixed(ms)
    }
}

/// Immutable per-trial specification. The stimulus payload `S` is opaque to
/// the engine; each paradigm brings its own shape and its own correctness
/// predicate.
///
/// If both `stimulus_duration` and `response_window` are `None` the response
/// phase waits indefinitely. That is allowed: self-paced paradigms rely on it.
#[derive(Debug, Clone)]
pub struct TrialConfig<S> {
    pub fixation_duration: Millis,
    /// `None` = stimulus persists until a response arrives.
    pub stimulus_duration: Option<Millis>,
    /// `None` = no response timeout.
    pub response_window: Option<Millis>,
    pub feedback_duration: Millis,
    pub show_feedback: bool,
    pub iti: ItiSpec,
    pub stimulus: S,
    /// `None` = any response identifier qualifies.
    pub valid_responses: Option<Vec<String>>,
}

impl<S> TrialConfig<S> {
    /// A config with conventional defaults; paradigms override per field.
    pub fn new(stimulus: S) -> Self {
        Self {
            fixation_duration: 500.0,
            stimulus_duration: Some(200.0),
            response_window: Some(2000.0),
            feedback_duration: 500.0,
            show_feedback: false,
            iti: ItiSpec::Fixed(1000.0),
            stimulus,
            valid_responses: None,
        }
    }

    /// Timeout for the response wait, measured from stimulus onset.
    ///
    /// Both durations finite: their sum (the stimulus may stay up through
    /// part of the response window, and both sub-phases are timed from onset
    /// as one wait). One finite: that one. Neither: no timeout.
    pub fn response_deadline(&self) -> Option<Millis> {
        match (self.stimulus_duration, self.response_window) {
            (Some(stim), Some(window)) => Some(stim + window),
            (Some(stim), None) => Some(stim),
            (None, Some(window)) => Some(window),
            (None, None) => None,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Phase of the trial state machine.
///
/// `Idle` is both the initial state and the terminal state after a run
/// finishes or is aborted. Exactly one trial's phase is active at any time;
/// the runner owns all transitions and observers only read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    #[default]
    Idle,
    Fixation,
    Stimulus,
    Response,
    Feedback,
    Iti,
}

impl TrialPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, TrialPhase::Idle)
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::trial::Millis;

/// What a paradigm's correctness predicate returns for one trial.
///
/// The predicate judges correctness only; the runner computes reaction time
/// from its own timestamps.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub correct: bool,
    pub custom_data: Map<String, Value>,
}

impl Evaluation {
    pub fn new(correct: bool) -> Self {
        Self {
            correct,
            custom_data: Map::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_data.insert(key.into(), value.into());
        self
    }
}

/// Record of one completed trial. Created once by the runner after the
/// correctness predicate fires, appended to the run's result list, never
/// mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub correct: bool,
    /// `response_timestamp - stimulus_onset`, or `None` on timeout.
    pub reaction_time: Option<Millis>,
    pub response_identifier: Option<String>,
    pub stimulus_onset: Millis,
    pub response_timestamp: Option<Millis>,
    /// Paradigm-defined annotations (e.g. "hit" / "commission").
    pub custom_data: Map<String, Value>,
}

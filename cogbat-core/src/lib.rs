pub mod error;
pub mod outcome;
pub mod phase;
pub mod response;
pub mod sequence;
pub mod trial;

pub use error::EngineError;
pub use outcome::{Evaluation, TrialOutcome};
pub use phase::TrialPhase;
pub use response::{ResponseEvent, ResponseKind};
pub use trial::{ItiSpec, Millis, TrialConfig};

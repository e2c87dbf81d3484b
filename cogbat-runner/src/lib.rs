pub mod runner;

pub use runner::{RunStatus, TrialRunner};

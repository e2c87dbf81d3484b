pub mod collector;
pub mod input;

pub use collector::{ContinuousHandle, ResponseCollector, ResponseFilter};
pub use input::{InputHub, RawInput};

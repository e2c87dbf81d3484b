pub mod clock;
pub mod frame;

pub use clock::TrialClock;
pub use frame::{FrameDriver, FrameListener, frame_channel, timer_resolution_ms};

/// Programming errors in how a paradigm drives the engine. Signaled
/// synchronously and never retried. A response timeout is not an error; it
/// is the expected `None` outcome.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `run` was called while a run is already in progress. Trials are never
    /// run concurrently: overlapping runs would corrupt response arming and
    /// misattribute responses across trials.
    #[error("a run is already in progress; wait for it to finish or call abort()")]
    AlreadyRunning,

    /// `run` was called after `destroy`.
    #[error("runner has been destroyed; create a new one to run again")]
    Destroyed,
}

use serde::{Deserialize, Serialize};

use crate::trial::Millis;

/// Input device a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Keyboard,
    Pointer,
    Touch,
}

/// One captured response. At most one per response-capture arming; `None`
/// at the call site means the window timed out.
///
/// `timestamp` is clock-relative (same origin as stimulus onsets), so
/// reaction time is a plain subtraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEvent {
    pub kind: ResponseKind,
    /// Key name for keyboard events; `None` for pointer/touch.
    pub identifier: Option<String>,
    pub timestamp: Millis,
    pub coordinates: Option<(f64, f64)>,
}

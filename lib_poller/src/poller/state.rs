use serde::Serialize;
use serde_json::Value;

/// The externally visible snapshot of a polled resource.
///
/// Consumers only ever read these three fields. `data` holds the last merged
/// value (`None` until the first successful cycle), `loading` is true while
/// the active-generation cycle is outstanding, and `error` carries the
/// surfaced message of the active-generation cycle's failure, if any.
///
/// Errors do not clear prior state: a failed cycle leaves `data` untouched so
/// a consumer can show stale-but-present data alongside an error banner.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceState {
    /// The last merged payload, or `None` if no cycle has succeeded yet.
    pub data: Option<Value>,
    /// True while the active-generation cycle is outstanding.
    pub loading: bool,
    /// The surfaced error message of the last completed cycle, if it failed.
    pub error: Option<String>,
}

impl ResourceState {
    /// The state a consumer sees immediately after mounting: no data yet,
    /// first fetch in progress.
    pub fn initial() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

impl Default for ResourceState {
    fn default() -> Self {
        Self::initial()
    }
}

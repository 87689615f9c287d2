use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// The merge function folding a new payload into the existing snapshot.
///
/// Invoked exactly once per successful, non-superseded response, with the
/// previously published value as its first argument. The poller requires
/// neither associativity nor idempotence from it.
pub type MergeFn = Arc<dyn Fn(Option<&Value>, Value) -> Value + Send + Sync>;

/// Extra transport options merged into every request of a poller instance.
///
/// `BTreeMap` keeps the header order stable so that two structurally equal
/// option sets always produce the same fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Additional request headers. May override the default
    /// `Accept: application/json`.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Per-request timeout in milliseconds. `None` leaves the client default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Immutable configuration for one poller instance.
///
/// A configuration is never mutated in place; a structurally different value
/// is treated as a parameter change and makes the reconciliation layer tear
/// down the old instance and create a fresh one.
#[derive(Clone)]
pub struct PollerConfig {
    /// Extra transport options applied to every request.
    pub extra_options: TransportOptions,
    /// Milliseconds between cycles. `0` means single fetch, no repetition.
    pub poll_interval_ms: u64,
    /// When true, requests carry a `since=<cursor>` query parameter.
    pub incremental: bool,
    /// Folds a new payload into the previous snapshot. Defaults to replacement.
    pub merge: MergeFn,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            extra_options: TransportOptions::default(),
            poll_interval_ms: 0,
            incremental: false,
            merge: Arc::new(replace_merge),
        }
    }
}

/// The default merge behavior: the incoming payload replaces the snapshot.
fn replace_merge(_previous: Option<&Value>, incoming: Value) -> Value {
    incoming
}

impl PollerConfig {
    /// A repeating configuration with the given interval and defaults otherwise.
    pub fn polling(poll_interval_ms: u64) -> Self {
        Self {
            poll_interval_ms,
            ..Self::default()
        }
    }

    /// Replaces the merge function, consuming `self` for chaining.
    pub fn with_merge(mut self, merge: MergeFn) -> Self {
        self.merge = merge;
        self
    }

    /// Structural identity of this configuration, used by the reconciliation
    /// layer to detect parameter changes by value.
    ///
    /// The merge closure is deliberately excluded: functions cannot be
    /// compared for equality, so swapping only the merge function does not
    /// count as a configuration change.
    pub fn fingerprint(&self) -> String {
        serde_json::json!({
            "pollIntervalMs": self.poll_interval_ms,
            "incremental": self.incremental,
            "extraOptions": &self.extra_options,
        })
        .to_string()
    }
}

impl fmt::Debug for PollerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollerConfig")
            .field("extra_options", &self.extra_options)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("incremental", &self.incremental)
            .field("merge", &"<merge fn>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_merge_replaces() {
        let config = PollerConfig::default();
        let merged = (config.merge)(Some(&json!({"value": 1})), json!({"value": 5}));
        assert_eq!(merged, json!({"value": 5}));

        let merged = (config.merge)(None, json!({"value": 7}));
        assert_eq!(merged, json!({"value": 7}));
    }

    #[test]
    fn test_fingerprint_is_structural() {
        let mut headers = BTreeMap::new();
        headers.insert("X-Token".to_string(), "abc".to_string());

        let first = PollerConfig {
            extra_options: TransportOptions {
                headers: headers.clone(),
                timeout_ms: Some(1000),
            },
            poll_interval_ms: 500,
            incremental: true,
            ..PollerConfig::default()
        };
        let second = PollerConfig {
            extra_options: TransportOptions {
                headers,
                timeout_ms: Some(1000),
            },
            poll_interval_ms: 500,
            incremental: true,
            ..PollerConfig::default()
        };

        // Equal by value, even though they are distinct instances.
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn test_fingerprint_detects_changes() {
        let base = PollerConfig::polling(500);

        let different_interval = PollerConfig::polling(1000);
        assert_ne!(base.fingerprint(), different_interval.fingerprint());

        let mut incremental = PollerConfig::polling(500);
        incremental.incremental = true;
        assert_ne!(base.fingerprint(), incremental.fingerprint());

        let mut with_header = PollerConfig::polling(500);
        with_header
            .extra_options
            .headers
            .insert("X-Token".to_string(), "abc".to_string());
        assert_ne!(base.fingerprint(), with_header.fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_merge_fn() {
        let base = PollerConfig::polling(500);
        let custom = PollerConfig::polling(500)
            .with_merge(Arc::new(|_previous, incoming| json!({ "wrapped": incoming })));

        // Swapping only the merge function is not a parameter change.
        assert_eq!(base.fingerprint(), custom.fingerprint());
    }
}

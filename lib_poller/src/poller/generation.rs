//! # Cancellation / Generation Tracker
//!
//! Enforces "only the latest cycle wins". Every cycle starts by asking the
//! tracker for a generation number and a cancellation token; completing
//! cycles must check `is_current` before touching cursor or snapshot state.

use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Tracks the active generation and the single live cancellation handle for
/// one poller instance.
pub struct GenerationTracker {
    // Explicitly defining the tuple-ish inner state behind one lock keeps
    // counter, token, and teardown flag consistent with each other.
    inner: Mutex<TrackerInner>,
}

struct TrackerInner {
    generation: u64,
    live: Option<CancellationToken>,
    torn_down: bool,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TrackerInner {
                generation: 0,
                live: None,
                torn_down: false,
            }),
        }
    }

    /// Starts a new cycle: increments the counter, cancels the previously
    /// live token, and returns the new generation with its token.
    ///
    /// Returns `None` once the tracker has been torn down; no further cycles
    /// may start.
    pub fn begin_cycle(&self) -> Option<(u64, CancellationToken)> {
        let mut inner = self.inner.lock().expect("Tracker lock poisoned");

        if inner.torn_down {
            return None;
        }

        // Starting a new cycle unconditionally revokes the previous one's
        // ability to publish.
        if let Some(previous) = inner.live.take() {
            previous.cancel();
        }

        inner.generation += 1;
        let token = CancellationToken::new();
        inner.live = Some(token.clone());

        Some((inner.generation, token))
    }

    /// True iff `generation` is still the most recently started cycle and the
    /// tracker has not been torn down.
    pub fn is_current(&self, generation: u64) -> bool {
        let inner = self.inner.lock().expect("Tracker lock poisoned");
        !inner.torn_down && inner.generation == generation
    }

    /// Cancels the live token and invalidates the counter so that no future
    /// completion of an old cycle can ever publish.
    pub fn teardown(&self) {
        let mut inner = self.inner.lock().expect("Tracker lock poisoned");
        inner.torn_down = true;
        if let Some(live) = inner.live.take() {
            live.cancel();
        }
    }
}

impl Default for GenerationTracker {
    fn default() -> Self {
        Self::new()
    }
}

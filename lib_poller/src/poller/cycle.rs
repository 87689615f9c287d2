//! # Poll Cycle Driver
//!
//! A self-scheduling fetch-merge-publish loop for REST resources. Each
//! `ResourcePoller` owns exactly one async task that runs cycles against a
//! fixed (identity, configuration) pair.
//!
//! ## Key Design Principles:
//! - **Self-Scheduling**: the loop performs one cycle, then sleeps for the
//!   configured interval before the next one. An interval of zero makes the
//!   poller single-shot.
//! - **Only the latest cycle wins**: every cycle registers with the
//!   `GenerationTracker` before fetching and re-checks `is_current` before
//!   publishing. A superseded or torn-down cycle publishes nothing, advances
//!   no cursor, and schedules nothing.
//! - **Advisory cancellation**: dropping the in-flight request aborts the
//!   transfer where possible, but correctness never depends on the abort
//!   succeeding. The generation check is the true guard.
//! - **Errors keep data**: a failed cycle surfaces its message but leaves the
//!   previously merged snapshot in place, and still schedules the next poll,
//!   giving natural retry-on-interval behavior.

#![doc(html_logo_url = "https://example.com/logo.png")] // Placeholder
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use crate::poller::config::PollerConfig;
use crate::poller::error::{ConfigError, PollError};
use crate::poller::generation::GenerationTracker;
use crate::poller::state::ResourceState;
use crate::retrieve::http::PollTransport;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use url::Url;

/// # Resource Poller
///
/// One polling instance for one (identity, configuration) pair. Created by
/// `ResourcePoller::spawn`, destroyed by `teardown` (or drop); parameter
/// changes are expressed by creating a fresh instance, never by mutation.
pub struct ResourcePoller {
    /// The cancellation/generation tracker shared with the poll task.
    tracker: Arc<GenerationTracker>,
    /// Receiver side of the published snapshot channel.
    state_rx: watch::Receiver<ResourceState>,
    /// The spawned poll loop. Held so the instance owns its task; the task
    /// exits on its own once the tracker is torn down.
    _task: tokio::task::JoinHandle<()>,
}

impl ResourcePoller {
    /// Validates the parameters and spawns the poll loop.
    ///
    /// Malformed configuration (empty identity, unparseable base URL or
    /// headers) fails fast here and never surfaces as a runtime snapshot
    /// error. The first cycle starts immediately.
    pub fn spawn(
        base_url: &str,
        identity: &str,
        config: PollerConfig,
    ) -> Result<Self, ConfigError> {
        if identity.trim().is_empty() {
            return Err(ConfigError::EmptyIdentity);
        }
        let transport = PollTransport::new(base_url, &config.extra_options)?;
        let target = transport.target(identity)?;

        let tracker = Arc::new(GenerationTracker::new());
        let (state_tx, state_rx) = watch::channel(ResourceState::initial());

        let task = tokio::spawn(run_poll_loop(
            transport,
            target,
            config,
            Arc::clone(&tracker),
            state_tx,
        ));

        Ok(Self {
            tracker,
            state_rx,
            _task: task,
        })
    }

    /// A receiver over the published snapshots. The current value is always
    /// available immediately via `borrow`.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState> {
        self.state_rx.clone()
    }

    /// The currently published snapshot.
    pub fn state(&self) -> ResourceState {
        self.state_rx.borrow().clone()
    }

    /// Cancels the in-flight cycle, clears any pending timer, and prevents
    /// every future publish from this instance.
    pub fn teardown(&self) {
        self.tracker.teardown();
    }
}

impl Drop for ResourcePoller {
    fn drop(&mut self) {
        self.tracker.teardown();
    }
}

/// The poll loop: one cycle per iteration, self-scheduled by the configured
/// interval. Exits when the tracker is torn down, when this instance's cycle
/// is superseded, or after a single-shot fetch.
async fn run_poll_loop(
    transport: PollTransport,
    target: Url,
    config: PollerConfig,
    tracker: Arc<GenerationTracker>,
    state_tx: watch::Sender<ResourceState>,
) {
    let mut cursor: Option<String> = None;

    loop {
        // --- Phase 1: Register the cycle ---
        let Some((generation, token)) = tracker.begin_cycle() else {
            break; // Torn down between cycles.
        };

        // --- Phase 2: Announce "in progress" before the call goes out ---
        state_tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        // --- Phase 3: Build the request target ---
        let mut url = target.clone();
        if config.incremental {
            if let Some(since) = &cursor {
                url.query_pairs_mut().append_pair("since", since);
            }
        }
        log::debug!("Cycle {} fetching {}", generation, url);

        // --- Phase 4: Execute and classify ---
        let outcome = run_cycle(&transport, url, &token).await;

        // A cycle that is no longer current must not touch cursor or
        // snapshot state, whatever its outcome was.
        if !tracker.is_current(generation) {
            log::debug!("Cycle {} superseded. Discarding its result.", generation);
            break;
        }

        match outcome {
            Ok(payload) => {
                if config.incremental {
                    cursor = Some(next_cursor(&payload));
                }
                state_tx.send_modify(|state| {
                    let merged = (config.merge)(state.data.as_ref(), payload);
                    state.data = Some(merged);
                    state.loading = false;
                    state.error = None;
                });
            }
            Err(PollError::Cancelled) => {
                // Superseded or torn down mid-flight: publish nothing.
                break;
            }
            Err(error) => {
                log::warn!("Cycle {} failed: {}", generation, error);
                state_tx.send_modify(|state| {
                    // Previous data is retained alongside the error.
                    state.loading = false;
                    state.error = Some(error.to_string());
                });
            }
        }

        // --- Phase 5: Self-schedule the next cycle ---
        if config.poll_interval_ms == 0 {
            break; // Single-shot.
        }
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_millis(config.poll_interval_ms)) => {}
        }
    }
}

/// Runs one network round trip and classifies the result.
async fn run_cycle(
    transport: &PollTransport,
    url: Url,
    token: &CancellationToken,
) -> Result<Value, PollError> {
    let response = tokio::select! {
        _ = token.cancelled() => return Err(PollError::Cancelled),
        result = transport.fetch(url) => result?,
    };

    if !response.success {
        return Err(PollError::http(response.status, response.body.as_deref()));
    }

    match response.body {
        // 204: an empty body is a valid "nothing changed" payload.
        None => Ok(Value::Null),
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| PollError::MalformedResponse(e.to_string())),
    }
}

/// The cursor carried into the next incremental request: the server-supplied
/// `lastUpdated` marker if present, else the current wall-clock time.
fn next_cursor(payload: &Value) -> String {
    payload
        .get("lastUpdated")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().to_rfc3339())
}

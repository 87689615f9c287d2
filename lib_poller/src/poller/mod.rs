//! # Resource Poller Module
//!
//! This module forms the heart of the PollStream polling engine. It contains
//! every component needed to repeatedly retrieve a remote JSON resource, fold
//! successive responses into a running local snapshot, and guarantee that a
//! stale network response can never corrupt newer state.
//!
//! ## Core Components:
//!
//! - **`config`**: The immutable per-poller configuration: transport options,
//!   poll interval, incremental-fetch flag, and the consumer-supplied merge
//!   function, plus the structural fingerprint used to detect configuration
//!   changes by value.
//!
//! - **`generation`**: The cancellation/generation tracker. It hands out
//!   monotonically increasing generation numbers paired with cancellation
//!   tokens and is the single authority on which cycle is allowed to publish.
//!
//! - **`state`**: The externally visible snapshot: last merged value, loading
//!   flag, and error message.
//!
//! - **`cycle`**: The cycle driver. One fetch-merge-publish step per cycle,
//!   cursor bookkeeping for incremental fetches, and the self-scheduling loop
//!   that arranges the next cycle when polling is enabled.
//!
//! - **`observer`**: The explicit reconciliation step. It compares
//!   `(identity, configuration)` by value on every observation and tears
//!   down / recreates the underlying poller when either changes.
//!
//! - **`error`**: The error taxonomy surfaced by the poller.
//!
//! By declaring and re-exporting these components, the `poller` module
//! provides a unified public API for consumers (dashboard cards, monitors,
//! test runners) that only ever read three outputs: data, loading, error.

#![doc(html_logo_url = "https://example.com/logo.png")] // Placeholder
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Per-poller configuration, merge function type, and change fingerprinting.
pub mod config;
/// The cycle driver and the `ResourcePoller` instance that owns one poll loop.
pub mod cycle;
/// Error taxonomy for cycles (`PollError`) and construction (`ConfigError`).
pub mod error;
/// The cancellation/generation tracker enforcing "only the latest cycle wins".
pub mod generation;
/// By-value reconciliation of `(identity, config)` observations.
pub mod observer;
/// The externally observable snapshot state.
pub mod state;

// --- Public API Re-exports ---
// Make the primary structs directly accessible under the `poller` namespace.
pub use config::{MergeFn, PollerConfig, TransportOptions};
pub use cycle::ResourcePoller;
pub use error::{ConfigError, PollError};
pub use generation::GenerationTracker;
pub use observer::ResourceObserver;
pub use state::ResourceState;

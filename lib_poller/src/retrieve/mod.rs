//! # Data Retrieval Module
//!
//! This module provides the transport layer the poller sits on top of,
//! focused on HTTP-based interactions.
//!
//! ## Purpose:
//! The goal of the `retrieve` module is to offer a consistent way to fetch
//! data from external services, encapsulating request building (base-URL
//! joining, cursor query parameter, headers) and raw response capture, so
//! that the cycle driver can focus on classification, merging, and
//! scheduling.
//!
//! ## Contained Modules:
//!
//! - **`http`**: A thin `PollTransport` built on `reqwest`. It owns the
//!   configured client (timeout, default headers including
//!   `Accept: application/json`) and returns raw status/body pairs without
//!   interpreting them; interpretation belongs to the cycle driver.

#![doc(html_logo_url = "https://example.com/logo.png")] // Placeholder
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// HTTP transport for the poller, built on `reqwest`.
pub mod http;

pub use http::{PollResponse, PollTransport};

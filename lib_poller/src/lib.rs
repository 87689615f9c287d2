// Declare the modules to re-export
pub mod poller;
pub mod retrieve;

// Re-export the primary types
pub use poller::config::*;
pub use poller::cycle::*;
pub use poller::error::*;
pub use poller::generation::*;
pub use poller::observer::*;
pub use poller::state::*;
pub use retrieve::http::*;

// Shared mock HTTP server used by the in-crate tests.
#[cfg(test)]
pub(crate) mod testsupport;

//! Runtime facade, configuration, and asynchronous request tracking.

mod config;
mod host;
mod tracker;

pub use config::FaunConfig;
pub use host::FaunRuntime;
pub use tracker::{RequestStatus, RequestTracker};

//! Runtime integration layer.
//!
//! Owns the thread and Tokio runtime the dispatcher runs on, so callers can
//! hold a service from synchronous or asynchronous code alike.

pub(crate) mod worker_runtime;
